//! Unit-step simulation tick
//!
//! Advances the session by exactly one frame: paddle steering, brick
//! resolution, wall/paddle bounces, miss handling, then integration. The
//! source of velocity is one step per rendered frame, so there is no dt -
//! speeds are expressed in units per tick.

use glam::Vec2;
use rand::Rng;

use super::geom::{Axis, contact_side};
use super::state::{Ball, GamePhase, GameSession, Outcome};
use crate::consts::*;

/// Input intents for a single tick
///
/// `launch` and `cheat_clear` are one-shot and consumed by exactly one tick;
/// `target_x` is consumed once; `steer` is held-key state.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Absolute pointer position; centers the paddle under it
    pub target_x: Option<f32>,
    /// Keyboard steering: -1.0 left, +1.0 right, 0.0 released
    pub steer: f32,
    /// Release the stuck ball
    pub launch: bool,
    /// Destroy every remaining brick (debug cheat, gated by the caller)
    pub cheat_clear: bool,
}

/// What happened during a tick, consumed by the cosmetic subsystem and host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball released from the paddle
    Launched { pos: Vec2 },
    /// Bounced off the left/right/top bounds
    WallBounce,
    /// Bounced off the paddle
    PaddleBounce,
    /// A brick died; `pos` is its center
    BrickBroken { pos: Vec2, color: u32 },
    /// Ball crossed the bottom bound without paddle contact
    LifeLost { pos: Vec2 },
    /// Every brick destroyed - session won
    Cleared,
    /// Lives exhausted - session lost
    Defeated,
}

/// Advance the session by one tick and report what happened.
///
/// A no-op (empty event list) outside the `Serve`/`Playing` phases, so a
/// stale scheduled callback can never advance a finished session.
pub fn tick(session: &mut GameSession, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !session.phase.is_active() {
        return events;
    }
    session.tick_count += 1;

    // Paddle control: pointer target wins over held keys
    if let Some(x) = input.target_x {
        session.paddle.target(x);
    } else if input.steer != 0.0 {
        session.paddle.steer(input.steer.signum());
    }

    if session.phase == GamePhase::Serve && input.launch {
        session.ball.launch(&session.paddle, session.base_speed());
        session.phase = GamePhase::Playing;
        events.push(GameEvent::Launched {
            pos: session.ball.pos,
        });
        log::debug!("ball launched at tick {}", session.tick_count);
    }

    if input.cheat_clear && session.phase == GamePhase::Playing {
        clear_field(session, &mut events);
        return events;
    }

    collide_bricks(session, &mut events);

    // Win check runs after the brick pass and supersedes the remaining
    // collision checks this tick
    if session.phase == GamePhase::Playing && session.score == session.bricks.total() {
        session.phase = GamePhase::Won;
        session.outcome = Outcome::Won;
        events.push(GameEvent::Cleared);
        log::info!(
            "field cleared: score {} in {}s",
            session.score,
            session.elapsed_secs
        );
        return events;
    }

    if session.ball.stuck {
        session.ball.follow(&session.paddle);
        return events;
    }

    collide_bounds(session, &mut events);

    // Integrate, unless a miss just re-stuck the ball or ended the session
    if session.phase == GamePhase::Playing && !session.ball.stuck {
        let vel = session.ball.vel;
        session.ball.pos += vel;
    }

    events
}

/// Debug cheat: credit and kill every remaining brick, winning the session
fn clear_field(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    for brick in session.bricks.iter_mut() {
        if brick.alive {
            brick.alive = false;
            session.score += 1;
        }
    }
    session.phase = GamePhase::Won;
    session.outcome = Outcome::Won;
    events.push(GameEvent::Cleared);
    log::info!("cheat: field cleared instantly");
}

/// AABB sweep over the grid in column-major order. Each overlapping brick is
/// resolved on its own: the minimum-penetration side flips exactly one
/// velocity axis, the brick dies, the score credits one.
fn collide_bricks(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let ball_box = session.ball.bbox();
    for brick in session.bricks.iter_mut() {
        if !brick.alive {
            continue;
        }
        let rect = brick.rect();
        if !ball_box.overlaps(&rect) {
            continue;
        }
        match contact_side(&ball_box, &rect).axis() {
            Axis::Horizontal => session.ball.vel.x = -session.ball.vel.x,
            Axis::Vertical => session.ball.vel.y = -session.ball.vel.y,
        }
        brick.alive = false;
        session.score += 1;
        events.push(GameEvent::BrickBroken {
            pos: rect.center(),
            color: brick.color,
        });
    }
}

/// Wall, paddle and floor checks against the ball's next position
fn collide_bounds(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let base = session.base_speed();
    let ticks = session.tick_count;
    let GameSession {
        ball,
        paddle,
        rng,
        lives,
        phase,
        outcome,
        ..
    } = session;

    let radius = ball.radius;
    let next = ball.pos + ball.vel;

    // Side walls reflect horizontally
    if next.x > FIELD_WIDTH - radius || next.x < radius {
        ball.vel.x = -ball.vel.x;
        events.push(GameEvent::WallBounce);
    }

    if next.y < radius {
        // Top wall: reflect and inject a small horizontal perturbation so a
        // perfectly vertical trajectory cannot loop forever
        ball.vel.y = -ball.vel.y;
        let jitter = (rng.random::<f32>() - 0.5) * 0.5;
        ball.vel.x += jitter;

        let max_dx = base * 2.0;
        if ball.vel.x.abs() > max_dx {
            ball.vel.x = max_dx.copysign(ball.vel.x);
        }
        if ball.vel.x.abs() < BALL_MIN_DX {
            ball.vel.x = BALL_MIN_DX.copysign(ball.vel.x);
        }
        events.push(GameEvent::WallBounce);
    } else if next.y > FIELD_HEIGHT - radius - PADDLE_HEIGHT {
        if paddle.spans(ball.pos.x) && ball.vel.y > 0.0 {
            // Paddle bounce: reflect up, angle proportional to the offset
            // from the paddle center
            ball.vel.y = -ball.vel.y;
            let offset = ball.pos.x - paddle.center_x();
            ball.vel.x = offset * PADDLE_BOUNCE_FACTOR;
            if ball.vel.x.abs() < BALL_MIN_DX {
                ball.vel.x = BALL_MIN_DX.copysign(ball.vel.x);
            }
            // Hold the ball above the paddle so it cannot sink through on
            // the same tick
            let ceiling = FIELD_HEIGHT - PADDLE_HEIGHT - radius - 1.0;
            if ball.pos.y > ceiling {
                ball.pos.y = ceiling;
            }
            events.push(GameEvent::PaddleBounce);
        } else if next.y > FIELD_HEIGHT - radius {
            // Miss: the ball crossed the bottom bound without a rebound
            *lives = lives.saturating_sub(1);
            events.push(GameEvent::LifeLost { pos: ball.pos });
            if *lives == 0 {
                *phase = GamePhase::Lost;
                *outcome = Outcome::Lost;
                events.push(GameEvent::Defeated);
                log::info!("out of lives at tick {ticks}");
            } else {
                paddle.recenter();
                *ball = Ball::resting_on(paddle);
                *phase = GamePhase::Serve;
                log::debug!("life lost, {} remaining", lives);
            }
        }
    }
}
