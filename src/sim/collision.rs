//! Collision response for balls against the paddle and the screen edges
//!
//! Overlap tests themselves are plain [`Rect::overlaps`] calls; this module
//! holds the parts that decide new velocities.

use glam::Vec2;

use super::rect::Rect;
use super::state::Ball;
use crate::enforce_min_component;

/// Ball offset from the paddle center, normalized to [-1, 1]
pub fn paddle_offset(ball_x: f32, paddle: &Rect) -> f32 {
    let half = paddle.w / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    ((ball_x - paddle.center().x) / half).clamp(-1.0, 1.0)
}

/// Reflection off the paddle before the speed floor is applied
///
/// The angle from vertical is `offset * max_angle_deg`; the vertical
/// component always points up.
pub fn bounce_velocity(offset: f32, speed: f32, max_angle_deg: f32) -> Vec2 {
    let angle = (offset * max_angle_deg).to_radians();
    Vec2::new(speed * angle.sin(), -(speed * angle.cos()).abs())
}

/// Full paddle response: reflection plus the per-axis speed floor
pub fn paddle_bounce(
    ball_x: f32,
    paddle: &Rect,
    speed: f32,
    max_angle_deg: f32,
    min_speed: f32,
) -> Vec2 {
    let vel = bounce_velocity(paddle_offset(ball_x, paddle), speed, max_angle_deg);
    let vy = if vel.y.abs() < min_speed { -min_speed } else { vel.y };
    Vec2::new(enforce_min_component(vel.x, min_speed), vy)
}

/// Reflect off the left, right and top edges
///
/// The ball is pushed back inside the screen and its velocity is pointed
/// away from the wall, so a ball cannot stick to an edge.
pub fn bounce_off_walls(ball: &mut Ball, screen_width: f32) {
    let half = ball.size / 2.0;

    if ball.pos.x - half <= 0.0 {
        ball.pos.x = half;
        ball.vel.x = ball.vel.x.abs();
    } else if ball.pos.x + half >= screen_width {
        ball.pos.x = screen_width - half;
        ball.vel.x = -ball.vel.x.abs();
    }

    if ball.pos.y - half <= 0.0 {
        ball.pos.y = half;
        ball.vel.y = ball.vel.y.abs();
    }
}

/// True once the ball's top edge is below the screen
#[inline]
pub fn fell_out(ball: &Ball, screen_height: f32) -> bool {
    ball.rect().top() > screen_height
}
