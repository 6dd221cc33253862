//! Game state and core simulation types
//!
//! The session owns every entity collection; stage transitions replace them
//! wholesale.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::level::{ItemTable, generate_stage};
use super::rect::Rect;
use crate::error::GameResult;
use crate::tuning::Tuning;

/// RGB color for the shell to draw with
pub type Rgb = [u8; 3];

pub const GREEN: Rgb = [0, 255, 0];
pub const LIGHT_GREEN: Rgb = [144, 238, 144];
pub const LIGHT_BLUE: Rgb = [173, 216, 230];
pub const WHITE: Rgb = [255, 255, 255];
pub const RED: Rgb = [255, 0, 0];
pub const YELLOW: Rgb = [255, 255, 0];
pub const PURPLE: Rgb = [128, 0, 128];
pub const PINK: Rgb = [255, 192, 203];

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for confirm
    StartScreen,
    /// Active gameplay
    Playing,
    /// Frozen until resumed; simulation time does not advance
    Paused,
    /// All blocks destroyed, waiting for confirm to start the next stage
    StageClear,
    /// Out of lives, waiting for retry
    GameOver,
    /// Player quit; terminal
    Quit,
}

/// Notable things that happened during a tick, drained by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    BlockDestroyed { points: u64, combo: u32 },
    ItemCollected(ItemKind),
    BallLost,
    LifeLost { lives_left: u32 },
    StageCleared { stage: u32 },
    GameOver { score: u64 },
    NewHighScore { score: u64 },
    Quit,
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Paddle {
    pub rect: Rect,
}

impl Paddle {
    /// Paddle centered horizontally, two heights above the floor
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            rect: Rect::new(
                (tuning.screen_width - tuning.paddle_width) / 2.0,
                tuning.paddle_top(),
                tuning.paddle_width,
                tuning.paddle_height,
            ),
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.rect.x + self.rect.w / 2.0
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.rect.w
    }

    /// Move horizontally, staying within [0, screen_width - width]
    pub fn move_by(&mut self, dx: f32, screen_width: f32) {
        self.rect.x = (self.rect.x + dx).clamp(0.0, (screen_width - self.rect.w).max(0.0));
    }

    /// Widen around the current center, capped at `max_width`
    pub fn widen(&mut self, amount: f32, max_width: f32, screen_width: f32) {
        let center = self.center_x();
        self.rect.w = (self.rect.w + amount).min(max_width);
        self.rect.x = center - self.rect.w / 2.0;
        self.move_by(0.0, screen_width);
    }

    pub fn color(&self) -> Rgb {
        LIGHT_BLUE
    }
}

/// A ball entity; `pos` is the center
#[derive(Debug, Clone)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub launched: bool,
    /// Simulation time of this ball's previous block hit
    pub last_hit_ms: Option<f64>,
    /// First ball of a stage; only changes the draw color
    pub primary: bool,
}

impl Ball {
    pub fn new(id: u32, size: f32, primary: bool) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size,
            launched: false,
            last_hit_ms: None,
            primary,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size, self.size)
    }

    /// Rest on top of the paddle at its horizontal center
    pub fn follow_paddle(&mut self, paddle: &Paddle) {
        if !self.launched {
            self.pos = Vec2::new(paddle.center_x(), paddle.rect.top() - self.size / 2.0);
        }
    }

    /// Leave the paddle at `speed` per axis, up and to the right
    pub fn launch(&mut self, speed: f32) {
        if !self.launched {
            self.vel = Vec2::new(speed, -speed);
            self.launched = true;
        }
    }

    pub fn color(&self) -> Rgb {
        if self.primary { GREEN } else { LIGHT_GREEN }
    }
}

/// A destructible block
#[derive(Debug, Clone)]
pub struct Block {
    pub id: u32,
    pub rect: Rect,
    /// Item dropped when destroyed
    pub item: Option<ItemKind>,
}

impl Block {
    pub fn color(&self) -> Rgb {
        WHITE
    }
}

/// Falling item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Widens the paddle
    PowerUp,
    /// Slows every ball
    SpeedDown,
    /// Spawns an extra ball
    MultiBall,
    /// Adds a life
    ExtraLife,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::PowerUp,
        ItemKind::SpeedDown,
        ItemKind::MultiBall,
        ItemKind::ExtraLife,
    ];

    pub fn color(&self) -> Rgb {
        match self {
            ItemKind::PowerUp => RED,
            ItemKind::SpeedDown => YELLOW,
            ItemKind::MultiBall => PURPLE,
            ItemKind::ExtraLife => PINK,
        }
    }
}

/// A falling item; `pos` is the center
#[derive(Debug, Clone)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
}

impl Item {
    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size, self.size)
    }
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub item_table: ItemTable,
    /// Current stage (1-based)
    pub stage: u32,
    pub lives: u32,
    pub score: u64,
    /// Best score seen, including previous sessions
    pub high_score: u64,
    /// Combo counter
    pub combo: u32,
    /// Time left before the combo expires (ms)
    pub combo_timer_ms: f32,
    /// Simulation clock (ms); only advances while playing
    pub time_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub blocks: Vec<Block>,
    pub items: Vec<Item>,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a session on the start screen with stage 1 laid out
    pub fn new(tuning: Tuning, seed: u64, high_score: u64) -> GameResult<Self> {
        let item_table = ItemTable::new(tuning.item_weights)?;
        let mut state = Self {
            paddle: Paddle::new(&tuning),
            lives: tuning.start_lives,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            item_table,
            stage: 1,
            score: 0,
            high_score,
            combo: 0,
            combo_timer_ms: 0.0,
            time_ms: 0.0,
            time_ticks: 0,
            phase: GamePhase::StartScreen,
            balls: Vec::new(),
            blocks: Vec::new(),
            items: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        generate_stage(&mut state);
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Spawn an unlaunched ball resting on the paddle
    pub fn spawn_ball_attached(&mut self, primary: bool) {
        let id = self.next_entity_id();
        let mut ball = Ball::new(id, self.tuning.ball_size, primary);
        ball.follow_paddle(&self.paddle);
        self.balls.push(ball);
    }

    /// Fresh session at stage 1; the high score carries over
    pub fn reset_session(&mut self) {
        self.stage = 1;
        self.lives = self.tuning.start_lives;
        self.score = 0;
        self.combo = 0;
        self.combo_timer_ms = 0.0;
        generate_stage(self);
    }

    /// Per-axis ball speed at the current stage
    pub fn ball_speed(&self) -> f32 {
        self.tuning.ball_speed_for_stage(self.stage)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
