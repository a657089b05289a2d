//! Neon Breaker - a single-screen arcade brick breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, cosmetic effects)
//! - `game`: Game state machine, input adaptation and frame driving
//! - `render`: Render/display/overlay sink contracts
//! - `scheduler`: Frame ticker and wall-clock second timer
//! - `settings`: Speed selector, variant flags, preferences

pub mod game;
pub mod render;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use game::{Game, GameBuilder, GameError};
pub use settings::{GameConfig, Settings, SpeedLevel};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (logical units, origin top-left, y down)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults - slides along the bottom edge
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    /// Keyboard steering speed (units per tick)
    pub const PADDLE_STEER_SPEED: f32 = 4.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Gap between the paddle top and a stuck ball
    pub const BALL_STUCK_GAP: f32 = 2.0;
    /// Minimum horizontal speed after a bounce (prevents vertical dead loops)
    pub const BALL_MIN_DX: f32 = 0.5;

    /// Brick grid defaults
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_COLS: usize = 9;
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 30.0;
    pub const BRICK_OFFSET_LEFT: f32 = 30.0;

    /// Bounce angle factor for a live paddle hit
    pub const PADDLE_BOUNCE_FACTOR: f32 = 0.15;
    /// Gentler angle factor when launching off the paddle
    pub const LAUNCH_ANGLE_FACTOR: f32 = 0.1;

    /// Session defaults
    pub const INITIAL_LIVES: u8 = 3;

    /// Cosmetic defaults
    pub const PARTICLES_PER_BURST: usize = 10;
    pub const TRAIL_LENGTH: usize = 16;
}
