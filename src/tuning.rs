//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults come from
//! [`crate::consts`]; a JSON file can override any subset of fields because
//! the struct is `#[serde(default)]`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

/// Runtime-tunable gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Screen
    pub screen_width: f32,
    pub screen_height: f32,

    // Paddle
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,

    // Ball
    pub ball_size: f32,
    /// Per-axis ball speed before the stage bonus is added
    pub ball_base_speed: f32,
    /// Per-axis speed floor after a paddle bounce
    pub min_bounce_speed: f32,
    /// Maximum paddle deflection from vertical (degrees)
    pub max_bounce_angle_deg: f32,
    /// Shallowest allowed trajectory from horizontal (degrees)
    pub min_trajectory_angle_deg: f32,
    /// Steepest allowed trajectory from horizontal (degrees)
    pub max_trajectory_angle_deg: f32,

    // Blocks
    pub block_width: f32,
    pub block_height: f32,
    pub block_gap: f32,
    pub blocks_per_stage: usize,
    pub stage_band_top: f32,
    pub stage_band_height: f32,
    pub stage_band_shift: f32,
    /// Space kept free between the lowest block row and the paddle
    pub min_paddle_clearance: f32,

    // Items
    pub item_size: f32,
    pub item_fall_speed: f32,
    /// Weights for none, PowerUp, SpeedDown, MultiBall, ExtraLife
    pub item_weights: [u32; 5],
    pub powerup_widen: f32,
    pub speed_down_factor: f32,

    // Session
    pub start_lives: u32,
    pub combo_window_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,

            ball_size: BALL_SIZE,
            ball_base_speed: BALL_BASE_SPEED,
            min_bounce_speed: MIN_BOUNCE_SPEED,
            max_bounce_angle_deg: MAX_BOUNCE_ANGLE_DEG,
            min_trajectory_angle_deg: MIN_TRAJECTORY_ANGLE_DEG,
            max_trajectory_angle_deg: MAX_TRAJECTORY_ANGLE_DEG,

            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            block_gap: BLOCK_GAP,
            blocks_per_stage: BLOCKS_PER_STAGE,
            stage_band_top: STAGE_BAND_TOP,
            stage_band_height: STAGE_BAND_HEIGHT,
            stage_band_shift: STAGE_BAND_SHIFT,
            min_paddle_clearance: MIN_PADDLE_CLEARANCE,

            item_size: ITEM_SIZE,
            item_fall_speed: ITEM_FALL_SPEED,
            item_weights: ITEM_WEIGHTS,
            powerup_widen: POWERUP_WIDEN,
            speed_down_factor: SPEED_DOWN_FACTOR,

            start_lives: START_LIVES,
            combo_window_ms: COMBO_WINDOW_MS,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> GameResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Tuning file {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(GameError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let tuning = Self::from_json(&text).map_err(|source| GameError::TuningParse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Parse tuning JSON without validating it
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> GameResult<()> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_size", self.ball_size),
            ("ball_base_speed", self.ball_base_speed),
            ("block_width", self.block_width),
            ("block_height", self.block_height),
            ("item_size", self.item_size),
            ("item_fall_speed", self.item_fall_speed),
        ];
        for (name, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(GameError::InvalidTuning {
                    name,
                    value,
                    reason: "must be positive",
                });
            }
        }

        if self.paddle_width > self.max_paddle_width() {
            return Err(GameError::InvalidTuning {
                name: "paddle_width",
                value: self.paddle_width,
                reason: "must not exceed half the screen width",
            });
        }
        if self.block_width > self.screen_width {
            return Err(GameError::InvalidTuning {
                name: "block_width",
                value: self.block_width,
                reason: "must fit on screen",
            });
        }
        if self.block_gap < 0.0 {
            return Err(GameError::InvalidTuning {
                name: "block_gap",
                value: self.block_gap,
                reason: "must not be negative",
            });
        }
        if !(0.0..90.0).contains(&self.min_trajectory_angle_deg)
            || self.max_trajectory_angle_deg <= self.min_trajectory_angle_deg
            || self.max_trajectory_angle_deg >= 90.0
        {
            return Err(GameError::InvalidTuning {
                name: "max_trajectory_angle_deg",
                value: self.max_trajectory_angle_deg,
                reason: "need 0 <= min < max < 90",
            });
        }
        if !(0.0..90.0).contains(&self.max_bounce_angle_deg) {
            return Err(GameError::InvalidTuning {
                name: "max_bounce_angle_deg",
                value: self.max_bounce_angle_deg,
                reason: "must be in [0, 90)",
            });
        }
        if !(self.speed_down_factor > 0.0 && self.speed_down_factor <= 1.0) {
            return Err(GameError::InvalidTuning {
                name: "speed_down_factor",
                value: self.speed_down_factor,
                reason: "must be in (0, 1]",
            });
        }
        if self.item_weights.iter().all(|&w| w == 0) {
            return Err(GameError::ItemWeights("all weights are zero".to_string()));
        }
        if self.start_lives == 0 {
            return Err(GameError::InvalidTuning {
                name: "start_lives",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Paddle width cap for PowerUp pickups
    #[inline]
    pub fn max_paddle_width(&self) -> f32 {
        self.screen_width / 2.0
    }

    /// Paddle top edge (paddle rests two heights above the floor)
    #[inline]
    pub fn paddle_top(&self) -> f32 {
        self.screen_height - 2.0 * self.paddle_height
    }

    /// Per-axis ball speed for a stage (base + stage)
    #[inline]
    pub fn ball_speed_for_stage(&self, stage: u32) -> f32 {
        self.ball_base_speed + stage as f32
    }
}
