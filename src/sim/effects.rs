//! Cosmetic particles and ball trail
//!
//! Purely derived state: this subsystem consumes the tick's event list and
//! the ball position, and nothing here ever feeds back into the physics.
//! It owns its own RNG stream so cosmetic randomness cannot perturb the
//! deterministic simulation.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::Ball;
use super::tick::GameEvent;
use crate::consts::PARTICLES_PER_BURST;

/// Burst color for the launch flash
const LAUNCH_BURST_COLOR: u32 = 0x00e5ff;
/// Burst color when a life is lost
const MISS_BURST_COLOR: u32 = 0xff3860;

/// A short-lived spark with a polar velocity
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
    pub radius: f32,
    /// Color inherited from the event that spawned it (0xRRGGBB)
    pub color: u32,
    /// Ticks remaining; removed at <= 0
    pub life: f32,
}

impl Particle {
    /// Advance one tick. Returns false when expired.
    pub fn tick(&mut self) -> bool {
        self.pos += Vec2::new(self.angle.cos(), self.angle.sin()) * self.speed;
        self.life -= 1.0;
        self.life > 0.0
    }

    /// Render opacity, monotonic in the remaining life fraction
    #[inline]
    pub fn opacity(&self) -> f32 {
        (self.life / 50.0).clamp(0.0, 1.0)
    }
}

/// Position snapshot for the ball trail
#[derive(Debug, Clone, Copy)]
pub struct TrailPoint {
    pub pos: Vec2,
}

/// All cosmetic state for one session
#[derive(Debug)]
pub struct Effects {
    particles: Vec<Particle>,
    /// Trail history, newest first, capped at `trail_capacity`
    trail: Vec<TrailPoint>,
    trail_capacity: usize,
    rng: Pcg32,
}

impl Effects {
    pub fn new(seed: u64, trail_capacity: usize) -> Self {
        Self {
            particles: Vec::new(),
            trail: Vec::with_capacity(trail_capacity),
            trail_capacity,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn trail(&self) -> &[TrailPoint] {
        &self.trail
    }

    /// React to one collision event from the tick
    pub fn apply(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::BrickBroken { pos, color } => self.burst(pos, color),
            GameEvent::LifeLost { pos } => self.burst(pos, MISS_BURST_COLOR),
            GameEvent::Launched { pos } => self.burst(pos, LAUNCH_BURST_COLOR),
            _ => {}
        }
    }

    /// Advance particles and trail by one tick. `launched` is true while the
    /// ball is in free flight; the trail records only then and is dropped the
    /// moment the ball re-sticks.
    pub fn advance(&mut self, ball: &Ball, launched: bool) {
        self.particles.retain_mut(Particle::tick);

        if launched {
            self.record_trail(ball.pos);
        } else if ball.stuck && !self.trail.is_empty() {
            self.trail.clear();
        }
    }

    /// Drop all cosmetic state (session reset)
    pub fn clear(&mut self) {
        self.particles.clear();
        self.trail.clear();
    }

    /// Record current ball position, newest first, oldest evicted
    fn record_trail(&mut self, pos: Vec2) {
        if self.trail_capacity == 0 {
            return;
        }
        self.trail.insert(0, TrailPoint { pos });
        if self.trail.len() > self.trail_capacity {
            self.trail.pop();
        }
    }

    /// Fixed burst of sparks at `pos`
    fn burst(&mut self, pos: Vec2, color: u32) {
        for _ in 0..PARTICLES_PER_BURST {
            self.particles.push(Particle {
                pos,
                angle: self.rng.random_range(0.0..std::f32::consts::TAU),
                speed: self.rng.random_range(1.0..4.0),
                radius: self.rng.random_range(1.0..4.0),
                color,
                life: self.rng.random_range(30.0..50.0),
            });
        }
    }
}
