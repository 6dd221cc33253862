//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session one frame at a time.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::collision::{bounce_off_walls, fell_out, paddle_bounce};
use super::level::generate_stage;
use super::state::{Ball, Block, GameEvent, GamePhase, GameState, Item, ItemKind};
use crate::clamp_trajectory;
use crate::consts::BLOCK_POINTS;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held left (continuous)
    pub move_left: bool,
    /// Held right (continuous)
    pub move_right: bool,
    /// Launch every unlaunched ball
    pub launch: bool,
    /// Pause toggle
    pub pause: bool,
    /// Advance from the start or stage-clear screen
    pub confirm: bool,
    /// New session after game over
    pub retry: bool,
    pub quit: bool,
}

/// Advance the game state by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if input.quit {
        if state.phase != GamePhase::Quit {
            log::info!("Quit requested at stage {}", state.stage);
            state.phase = GamePhase::Quit;
            state.events.push(GameEvent::Quit);
        }
        return;
    }

    match state.phase {
        GamePhase::StartScreen => {
            if input.confirm {
                log::info!("Game started");
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::Paused => {
            if input.pause {
                log::debug!("Resumed at tick {}", state.time_ticks);
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::StageClear => {
            if input.confirm {
                generate_stage(state);
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::GameOver => {
            if input.retry {
                log::info!("Starting a new session");
                state.reset_session();
                state.phase = GamePhase::Playing;
            }
        }
        GamePhase::Playing => {
            if input.pause {
                log::debug!("Paused at tick {}", state.time_ticks);
                state.phase = GamePhase::Paused;
                return;
            }
            step_playing(state, input, dt_ms);
        }
        GamePhase::Quit => {}
    }
}

fn step_playing(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    state.time_ticks += 1;
    state.time_ms += dt_ms as f64;
    update_combo_timer(state, dt_ms);

    // Paddle follows held keys directly
    let dir = input.move_right as i32 - input.move_left as i32;
    state
        .paddle
        .move_by(dir as f32 * state.tuning.paddle_speed, state.tuning.screen_width);

    for ball in &mut state.balls {
        ball.follow_paddle(&state.paddle);
    }

    if input.launch {
        let speed = state.ball_speed();
        for ball in state.balls.iter_mut().filter(|b| !b.launched) {
            ball.launch(speed);
        }
    }

    move_balls(state);
    move_items(state);
    resolve_paddle_hits(state);
    resolve_block_hits(state);
    resolve_pickups(state);
    check_progress(state);
}

/// Count the combo window down; an expired window drops the combo to zero
fn update_combo_timer(state: &mut GameState, dt_ms: f32) {
    if state.combo_timer_ms > 0.0 {
        state.combo_timer_ms -= dt_ms;
        if state.combo_timer_ms <= 0.0 {
            state.combo_timer_ms = 0.0;
            if state.combo > 0 {
                log::debug!("Combo x{} expired", state.combo);
            }
            state.combo = 0;
        }
    }
}

fn move_balls(state: &mut GameState) {
    let tuning = &state.tuning;
    for ball in state.balls.iter_mut().filter(|b| b.launched) {
        ball.pos += ball.vel;
        bounce_off_walls(ball, tuning.screen_width);
        ball.vel = clamp_trajectory(
            ball.vel,
            tuning.min_trajectory_angle_deg,
            tuning.max_trajectory_angle_deg,
        );
    }

    let before = state.balls.len();
    let floor = state.tuning.screen_height;
    state.balls.retain(|b| !fell_out(b, floor));
    let lost = before - state.balls.len();
    if lost > 0 {
        log::debug!("{} ball(s) fell out, {} left", lost, state.balls.len());
        state
            .events
            .extend(std::iter::repeat_n(GameEvent::BallLost, lost));
    }
}

fn move_items(state: &mut GameState) {
    for item in &mut state.items {
        item.pos += item.vel;
    }
    let floor = state.tuning.screen_height;
    state.items.retain(|i| i.rect().top() <= floor);
}

fn resolve_paddle_hits(state: &mut GameState) {
    let tuning = &state.tuning;
    let paddle = state.paddle.rect;
    for ball in state.balls.iter_mut().filter(|b| b.launched) {
        if !ball.rect().overlaps(&paddle) {
            continue;
        }
        let speed = ball.vel.length();
        let vel = paddle_bounce(
            ball.pos.x,
            &paddle,
            speed,
            tuning.max_bounce_angle_deg,
            tuning.min_bounce_speed,
        );
        ball.vel = clamp_trajectory(
            vel,
            tuning.min_trajectory_angle_deg,
            tuning.max_trajectory_angle_deg,
        );
        // Rest just above the paddle so the next tick cannot re-trigger
        ball.pos.y = paddle.top() - 1.0 - ball.size / 2.0;
    }
}

/// Destroy every block a ball overlaps; the ball flips vertically once
fn resolve_block_hits(state: &mut GameState) {
    for ball_idx in 0..state.balls.len() {
        if !state.balls[ball_idx].launched {
            continue;
        }
        let rect = state.balls[ball_idx].rect();
        if !state.blocks.iter().any(|b| b.rect.overlaps(&rect)) {
            continue;
        }

        let (hit, kept): (Vec<Block>, Vec<Block>) = std::mem::take(&mut state.blocks)
            .into_iter()
            .partition(|b| b.rect.overlaps(&rect));
        state.blocks = kept;
        state.balls[ball_idx].vel.y = -state.balls[ball_idx].vel.y;

        for block in &hit {
            register_block_hit(state, ball_idx, block);
        }
    }
}

/// Combo and score bookkeeping for one destroyed block
fn register_block_hit(state: &mut GameState, ball_idx: usize, block: &Block) {
    let now = state.time_ms;
    let window = state.tuning.combo_window_ms as f64;

    let ball = &mut state.balls[ball_idx];
    let in_window = ball.last_hit_ms.is_some_and(|t| now - t <= window);
    ball.last_hit_ms = Some(now);

    state.combo = if in_window { state.combo + 1 } else { 1 };
    state.combo_timer_ms = window as f32;

    let points = BLOCK_POINTS * (state.combo as u64 + 1) * state.stage as u64;
    state.score += points;
    state.events.push(GameEvent::BlockDestroyed {
        points,
        combo: state.combo,
    });

    if let Some(kind) = block.item {
        let id = state.next_entity_id();
        state.items.push(Item {
            id,
            kind,
            pos: block.rect.center(),
            vel: Vec2::new(0.0, state.tuning.item_fall_speed),
            size: state.tuning.item_size,
        });
    }
}

fn resolve_pickups(state: &mut GameState) {
    let paddle = state.paddle.rect;
    if !state.items.iter().any(|i| i.rect().overlaps(&paddle)) {
        return;
    }

    let (caught, falling): (Vec<Item>, Vec<Item>) = std::mem::take(&mut state.items)
        .into_iter()
        .partition(|i| i.rect().overlaps(&paddle));
    state.items = falling;

    for item in caught {
        item.kind.apply(state);
        state.events.push(GameEvent::ItemCollected(item.kind));
    }
}

impl ItemKind {
    /// Apply this item's effect to the session
    pub fn apply(self, state: &mut GameState) {
        match self {
            ItemKind::PowerUp => {
                let tuning = &state.tuning;
                state.paddle.widen(
                    tuning.powerup_widen,
                    tuning.max_paddle_width(),
                    tuning.screen_width,
                );
                log::debug!("Paddle widened to {}", state.paddle.width());
            }
            ItemKind::SpeedDown => {
                let factor = state.tuning.speed_down_factor;
                for ball in state.balls.iter_mut().filter(|b| b.launched) {
                    ball.vel *= factor;
                }
                log::debug!("Balls slowed by {}", factor);
            }
            ItemKind::MultiBall => spawn_extra_ball(state),
            ItemKind::ExtraLife => {
                state.lives += 1;
                log::debug!("Extra life, now {}", state.lives);
            }
        }
    }
}

/// Launched, non-primary ball at a random existing ball with a random upward velocity
fn spawn_extra_ball(state: &mut GameState) {
    let size = state.tuning.ball_size;
    let origin = state
        .balls
        .choose(&mut state.rng)
        .map(|b| b.pos)
        .unwrap_or_else(|| Vec2::new(state.paddle.center_x(), state.paddle.rect.top() - size / 2.0));

    let speed = state.ball_speed();
    let vx = state.rng.random_range(-1.0f32..=1.0) * speed;
    let vy = -state.rng.random_range(0.5f32..=1.0) * speed;

    let id = state.next_entity_id();
    let mut ball = Ball::new(id, size, false);
    ball.pos = origin;
    ball.vel = clamp_trajectory(
        Vec2::new(vx, vy),
        state.tuning.min_trajectory_angle_deg,
        state.tuning.max_trajectory_angle_deg,
    );
    ball.launched = true;
    state.balls.push(ball);
    log::debug!("Multi-ball: {} balls in play", state.balls.len());
}

/// Life loss, game over and stage clear checks
fn check_progress(state: &mut GameState) {
    if state.balls.is_empty() {
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::LifeLost {
            lives_left: state.lives,
        });
        if state.lives > 0 {
            log::info!("Ball lost, {} lives left", state.lives);
            state.spawn_ball_attached(false);
        } else {
            enter_game_over(state);
            return;
        }
    }

    if state.blocks.is_empty() {
        let cleared = state.stage;
        state.stage += 1;
        state.phase = GamePhase::StageClear;
        state.events.push(GameEvent::StageCleared { stage: cleared });
        log::info!("Stage {} clear, score {}", cleared, state.score);
    }
}

fn enter_game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.balls.clear();
    state.events.push(GameEvent::GameOver { score: state.score });
    log::info!("Game over at stage {} with score {}", state.stage, state.score);

    if state.score > state.high_score {
        state.high_score = state.score;
        state.events.push(GameEvent::NewHighScore { score: state.score });
        log::info!("New high score: {}", state.score);
    }
}
