//! External collaborator contracts
//!
//! The core never touches a real canvas or DOM. Each frame it hands a
//! borrowed [`Frame`] snapshot to the render sink, pushes changed HUD values
//! to the display sink, and fires overlay hooks on terminal transitions.
//! Hosts implement these traits; tests use the null sinks.

use glam::Vec2;

use crate::sim::{BrickGrid, GamePhase, Particle, TrailPoint};

/// Everything a renderer needs for one frame, borrowed from the core
#[derive(Debug)]
pub struct Frame<'a> {
    pub phase: GamePhase,
    pub ball_pos: Vec2,
    pub ball_radius: f32,
    /// Render the stuck-ball pulse effect
    pub ball_stuck: bool,
    /// Paddle left edge (width/height are the configured constants)
    pub paddle_x: f32,
    pub bricks: &'a BrickGrid,
    pub trail: &'a [TrailPoint],
    pub particles: &'a [Particle],
    /// Show the "click or press any key to launch" hint
    pub show_launch_hint: bool,
}

/// Draws the playfield. Fire-and-forget, once per frame.
pub trait RenderSink {
    fn draw(&mut self, frame: &Frame<'_>);
}

/// Receives HUD values; called only when a value changes
pub trait DisplaySink {
    fn set_score(&mut self, score: u32);
    fn set_time(&mut self, secs: u32);
    fn set_lives(&mut self, lives: u8);
}

/// Cosmetic overlay hooks (confetti burst, backdrop blur)
///
/// Default impls are no-ops so hosts opt into each effect.
pub trait OverlaySink {
    /// The session was won - celebrate
    fn confetti(&mut self) {}

    /// Show or hide the end-of-session backdrop
    fn backdrop(&mut self, _visible: bool) {}
}

/// Render sink that discards every frame (headless runs)
#[derive(Debug, Default)]
pub struct NullRender;

impl RenderSink for NullRender {
    fn draw(&mut self, _frame: &Frame<'_>) {}
}

/// Display sink that ignores every update
#[derive(Debug, Default)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn set_score(&mut self, _score: u32) {}
    fn set_time(&mut self, _secs: u32) {}
    fn set_lives(&mut self, _lives: u8) {}
}

/// Overlay sink with every hook left at its no-op default
#[derive(Debug, Default)]
pub struct NullOverlay;

impl OverlaySink for NullOverlay {}
