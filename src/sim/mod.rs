//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each entity Vec)
//! - No rendering, input or file dependencies

pub mod collision;
pub mod level;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{bounce_off_walls, bounce_velocity, paddle_bounce, paddle_offset};
pub use level::{ItemTable, candidate_positions, generate_stage, stage_band};
pub use rect::Rect;
pub use state::{Ball, Block, GameEvent, GamePhase, GameState, Item, ItemKind, Paddle, Rgb};
pub use tick::{TickInput, tick};
