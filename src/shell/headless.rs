//! Display-less shell with an autopilot player
//!
//! Decides its next input from the last rendered frame: confirms screens,
//! launches immediately, keeps the paddle under the most dangerous ball and
//! grabs items when every ball is safely high up.

use glam::Vec2;

use super::{Command, Frame, InputSet, Shell};
use crate::sim::GamePhase;

/// Paddle dead zone so the autopilot does not jitter around its target
const TRACK_TOLERANCE: f32 = 8.0;
/// Balls above this line leave the autopilot free to chase items
const SAFE_BALL_Y: f32 = 500.0;
/// Frames between HUD log lines
const LOG_EVERY_FRAMES: u64 = 600;

/// What the autopilot last saw
#[derive(Debug, Clone, Copy)]
struct Observation {
    phase: GamePhase,
    paddle_center: f32,
    paddle_half_width: f32,
    target_x: Option<f32>,
    has_unlaunched: bool,
}

/// Autopilot shell that plays a fixed number of games, then quits
#[derive(Debug)]
pub struct HeadlessShell {
    games_to_play: u32,
    games_finished: u32,
    max_frames: u64,
    frames: u64,
    seen: Option<Observation>,
}

impl HeadlessShell {
    pub fn new(games_to_play: u32, max_frames: u64) -> Self {
        Self {
            games_to_play,
            games_finished: 0,
            max_frames,
            frames: 0,
            seen: None,
        }
    }

    /// Where the paddle should be for this frame
    fn pick_target(frame: &Frame<'_>, tick: u64) -> Option<f32> {
        let paddle_top = frame.paddle.rect.top();

        // Most dangerous: the lowest ball that is still coming down
        let falling = frame
            .balls
            .iter()
            .filter(|b| b.launched && b.vel.y > 0.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let all_safe = frame
            .balls
            .iter()
            .filter(|b| b.launched)
            .all(|b| b.pos.y < SAFE_BALL_Y || b.vel.y < 0.0);

        if all_safe {
            let nearest_item = frame
                .items
                .iter()
                .filter(|i| i.pos.y < paddle_top)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
            if let Some(item) = nearest_item {
                return Some(item.pos.x);
            }
        }

        falling.map(|ball| {
            // Lead the ball to where it will cross the paddle line
            let frames_left = ((paddle_top - ball.pos.y) / ball.vel.y).max(0.0);
            let landing = predict_x(ball.pos, ball.vel, frames_left, frame.screen_width);
            // Vary the contact point so rallies do not loop forever
            let wobble = (tick as f32 * 0.013).sin() * frame.paddle.rect.w * 0.3;
            landing + wobble
        })
    }
}

/// Straight-line prediction with side-wall reflections folded in
fn predict_x(pos: Vec2, vel: Vec2, frames: f32, width: f32) -> f32 {
    if width <= 0.0 {
        return pos.x;
    }
    let period = 2.0 * width;
    let raw = (pos.x + vel.x * frames).rem_euclid(period);
    if raw > width { period - raw } else { raw }
}

impl Shell for HeadlessShell {
    fn render_frame(&mut self, frame: &Frame<'_>) {
        let previous = self.seen.map(|s| s.phase);
        if frame.phase == GamePhase::GameOver && previous != Some(GamePhase::GameOver) {
            self.games_finished += 1;
            log::info!(
                "Autopilot game {} over: score {}, stage {}",
                self.games_finished,
                frame.hud.score,
                frame.hud.stage
            );
        }
        if frame.phase == GamePhase::StageClear && previous != Some(GamePhase::StageClear) {
            for line in frame.overlay() {
                log::info!("{}", line);
            }
        }
        if self.frames > 0 && self.frames.is_multiple_of(LOG_EVERY_FRAMES) {
            log::debug!("[frame {}] {}", self.frames, frame.hud.lines().join(" | "));
        }

        self.seen = Some(Observation {
            phase: frame.phase,
            paddle_center: frame.paddle.center_x(),
            paddle_half_width: frame.paddle.width() / 2.0,
            target_x: Self::pick_target(frame, self.frames),
            has_unlaunched: frame.balls.iter().any(|b| !b.launched),
        });
    }

    fn poll_input(&mut self) -> InputSet {
        self.frames += 1;
        let mut input = InputSet::default();
        if self.frames > self.max_frames {
            input.insert(Command::Quit);
            return input;
        }

        let Some(seen) = self.seen else {
            return input;
        };

        match seen.phase {
            GamePhase::StartScreen | GamePhase::StageClear => input.insert(Command::Confirm),
            GamePhase::Paused => input.insert(Command::Resume),
            GamePhase::GameOver => {
                if self.games_finished >= self.games_to_play {
                    input.insert(Command::Quit);
                } else {
                    input.insert(Command::Retry);
                }
            }
            GamePhase::Playing => {
                if seen.has_unlaunched {
                    input.insert(Command::Launch);
                }
                if let Some(target) = seen.target_x {
                    let tolerance = TRACK_TOLERANCE.min(seen.paddle_half_width);
                    if target < seen.paddle_center - tolerance {
                        input.insert(Command::MoveLeft);
                    } else if target > seen.paddle_center + tolerance {
                        input.insert(Command::MoveRight);
                    }
                }
            }
            GamePhase::Quit => input.insert(Command::Quit),
        }
        input
    }
}
