//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Unit timestep only (one velocity step per rendered frame)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod effects;
pub mod geom;
pub mod state;
pub mod tick;

pub use effects::{Effects, Particle, TrailPoint};
pub use geom::{Aabb, Axis, Side};
pub use state::{Ball, Brick, BrickGrid, GamePhase, GameSession, Outcome, Paddle};
pub use tick::{GameEvent, TickInput, tick};
