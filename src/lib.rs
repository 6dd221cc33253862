//! Block Breaker - a single-screen breakout game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scoring, stages)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Flat-file high score persistence
//! - `shell`: Presentation/input collaborator trait, HUD text and the frame runner

pub mod error;
pub mod highscores;
pub mod shell;
pub mod sim;
pub mod tuning;

pub use error::{GameError, GameResult};
pub use highscores::HighScoreStore;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 1000.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_SPEED: f32 = 15.0;

    /// Ball defaults (speeds are units per tick)
    pub const BALL_SIZE: f32 = 20.0;
    pub const BALL_BASE_SPEED: f32 = 3.0;
    pub const MIN_BOUNCE_SPEED: f32 = 3.0;
    pub const MAX_BOUNCE_ANGLE_DEG: f32 = 60.0;
    pub const MIN_TRAJECTORY_ANGLE_DEG: f32 = 10.0;
    pub const MAX_TRAJECTORY_ANGLE_DEG: f32 = 60.0;

    /// Block layout
    pub const BLOCK_WIDTH: f32 = 80.0;
    pub const BLOCK_HEIGHT: f32 = 30.0;
    pub const BLOCK_GAP: f32 = 10.0;
    pub const BLOCKS_PER_STAGE: usize = 40;
    pub const STAGE_BAND_TOP: f32 = 50.0;
    pub const STAGE_BAND_HEIGHT: f32 = 300.0;
    pub const STAGE_BAND_SHIFT: f32 = 100.0;
    pub const MIN_PADDLE_CLEARANCE: f32 = 200.0;

    /// Falling items
    pub const ITEM_SIZE: f32 = 20.0;
    pub const ITEM_FALL_SPEED: f32 = 3.0;
    /// none, PowerUp, SpeedDown, MultiBall, ExtraLife
    pub const ITEM_WEIGHTS: [u32; 5] = [65, 10, 10, 10, 5];
    pub const POWERUP_WIDEN: f32 = 25.0;
    pub const SPEED_DOWN_FACTOR: f32 = 0.7;

    /// Session
    pub const START_LIVES: u32 = 3;
    pub const COMBO_WINDOW_MS: u64 = 1000;
    /// Base points per block, multiplied by (combo + 1) and the stage
    pub const BLOCK_POINTS: u64 = 10;
}

/// Angle of travel from horizontal, in degrees within [0, 90]
#[inline]
pub fn trajectory_angle_deg(vel: Vec2) -> f32 {
    vel.y.abs().atan2(vel.x.abs()).to_degrees()
}

/// Clamp the travel angle from horizontal into [min_deg, max_deg]
///
/// Speed and the sign of each component are preserved. A zero vector is
/// returned unchanged.
pub fn clamp_trajectory(vel: Vec2, min_deg: f32, max_deg: f32) -> Vec2 {
    let speed = vel.length();
    if speed <= f32::EPSILON {
        return vel;
    }

    let angle = vel.y.abs().atan2(vel.x.abs());
    let clamped = angle.clamp(min_deg.to_radians(), max_deg.to_radians());
    if clamped == angle {
        return vel;
    }

    let sign_x = if vel.x >= 0.0 { 1.0 } else { -1.0 };
    let sign_y = if vel.y >= 0.0 { 1.0 } else { -1.0 };
    Vec2::new(
        sign_x * speed * clamped.cos(),
        sign_y * speed * clamped.sin(),
    )
}

/// Push a component up to `min` magnitude, keeping its sign (zero goes negative)
#[inline]
pub fn enforce_min_component(value: f32, min: f32) -> f32 {
    if value.abs() >= min {
        value
    } else if value > 0.0 {
        min
    } else {
        -min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clamp_shallow_trajectory() {
        let vel = Vec2::new(5.0, 0.1);
        let clamped = clamp_trajectory(vel, 10.0, 60.0);
        assert!((trajectory_angle_deg(clamped) - 10.0).abs() < 1e-3);
        assert!((clamped.length() - vel.length()).abs() < 1e-4);
        assert!(clamped.x > 0.0 && clamped.y > 0.0);
    }

    #[test]
    fn test_clamp_steep_trajectory_keeps_signs() {
        let vel = Vec2::new(-0.5, -6.0);
        let clamped = clamp_trajectory(vel, 10.0, 60.0);
        assert!((trajectory_angle_deg(clamped) - 60.0).abs() < 1e-3);
        assert!(clamped.x < 0.0 && clamped.y < 0.0);
    }

    #[test]
    fn test_clamp_leaves_valid_and_zero_untouched() {
        let vel = Vec2::new(4.0, -4.0);
        assert_eq!(clamp_trajectory(vel, 10.0, 60.0), vel);
        assert_eq!(clamp_trajectory(Vec2::ZERO, 10.0, 60.0), Vec2::ZERO);
    }

    #[test]
    fn test_enforce_min_component() {
        assert_eq!(enforce_min_component(1.0, 3.0), 3.0);
        assert_eq!(enforce_min_component(-1.0, 3.0), -3.0);
        assert_eq!(enforce_min_component(0.0, 3.0), -3.0);
        assert_eq!(enforce_min_component(7.0, 3.0), 7.0);
    }

    proptest! {
        #[test]
        fn prop_clamped_angle_in_range(x in -50.0f32..50.0, y in -50.0f32..50.0) {
            prop_assume!(x.hypot(y) > 0.01);
            let clamped = clamp_trajectory(Vec2::new(x, y), 10.0, 60.0);
            let angle = trajectory_angle_deg(clamped);
            prop_assert!(angle >= 10.0 - 1e-2 && angle <= 60.0 + 1e-2);
            prop_assert!((clamped.length() - x.hypot(y)).abs() < 1e-3 * x.hypot(y).max(1.0));
        }
    }
}
