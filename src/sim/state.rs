//! Game state and core simulation types
//!
//! Everything a running session owns lives on [`GameSession`]; there is no
//! module-level mutable state, so independent sessions can coexist and tests
//! build their own.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Aabb;
use crate::consts::*;
use crate::settings::SpeedLevel;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Bricks shown, ball resting on the paddle, no session running
    Idle,
    /// Session active, ball stuck to the paddle awaiting launch
    Serve,
    /// Ball in free flight, physics active
    Playing,
    /// Every brick destroyed
    Won,
    /// Out of lives
    Lost,
}

impl GamePhase {
    /// A session is underway (frame ticks are scheduled)
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, GamePhase::Serve | GamePhase::Playing)
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Session result, set exactly once when the session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    None,
    Won,
    Lost,
}

/// The ball
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// While stuck the position is derived from the paddle, never integrated
    pub stuck: bool,
}

impl Ball {
    /// Canonical resting y for a stuck ball (just above the paddle)
    #[inline]
    pub fn rest_y() -> f32 {
        FIELD_HEIGHT - PADDLE_HEIGHT - BALL_RADIUS - BALL_STUCK_GAP
    }

    /// A ball at rest on the given paddle
    pub fn resting_on(paddle: &Paddle) -> Self {
        Self {
            pos: Vec2::new(paddle.center_x(), Self::rest_y()),
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            stuck: true,
        }
    }

    /// Re-derive the stuck position from the paddle (call each tick)
    pub fn follow(&mut self, paddle: &Paddle) {
        if self.stuck {
            self.pos = Vec2::new(paddle.center_x(), Self::rest_y());
        }
    }

    /// Release the ball: straight up, with a gentle angle from the offset
    /// between ball and paddle center at release time
    pub fn launch(&mut self, paddle: &Paddle, base_speed: f32) {
        if !self.stuck {
            return;
        }
        let offset = self.pos.x - paddle.center_x();
        self.vel = Vec2::new(offset * LAUNCH_ANGLE_FACTOR, -base_speed);
        self.stuck = false;
    }

    /// Bounding box for brick collision tests
    #[inline]
    pub fn bbox(&self) -> Aabb {
        Aabb::around(self.pos, self.radius)
    }
}

/// The player's paddle, sliding along the bottom edge
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge, clamped to `[0, FIELD_WIDTH - PADDLE_WIDTH]`
    pub x: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: (FIELD_WIDTH - PADDLE_WIDTH) / 2.0,
        }
    }
}

impl Paddle {
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + PADDLE_WIDTH / 2.0
    }

    #[inline]
    pub fn top_y() -> f32 {
        FIELD_HEIGHT - PADDLE_HEIGHT
    }

    pub fn rect(&self) -> Aabb {
        Aabb::new(self.x, Self::top_y(), PADDLE_WIDTH, PADDLE_HEIGHT)
    }

    /// Whether a horizontal position lies within the paddle span
    #[inline]
    pub fn spans(&self, x: f32) -> bool {
        x > self.x && x < self.x + PADDLE_WIDTH
    }

    /// Center the paddle under a pointer position
    pub fn target(&mut self, pointer_x: f32) {
        self.x = clamp_x(pointer_x - PADDLE_WIDTH / 2.0);
    }

    /// Shift by one keyboard step (`dir` is -1, 0 or +1)
    pub fn steer(&mut self, dir: f32) {
        self.x = clamp_x(self.x + dir * PADDLE_STEER_SPEED);
    }

    /// Back to the center of the field (after a miss)
    pub fn recenter(&mut self) {
        self.x = (FIELD_WIDTH - PADDLE_WIDTH) / 2.0;
    }
}

#[inline]
fn clamp_x(x: f32) -> f32 {
    x.clamp(0.0, FIELD_WIDTH - PADDLE_WIDTH)
}

/// Neon palette, cycled per brick row
pub const BRICK_PALETTE: [u32; 5] = [
    0x00e5ff, // Cyan
    0x7c4dff, // Purple
    0x18ffff, // Light blue
    0xff00e5, // Magenta
    0x7700ff, // Violet
];

/// A single brick cell
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Brick {
    pub col: usize,
    pub row: usize,
    pub alive: bool,
    /// Cosmetic color tag (0xRRGGBB)
    pub color: u32,
}

impl Brick {
    fn new(col: usize, row: usize) -> Self {
        Self {
            col,
            row,
            alive: true,
            color: BRICK_PALETTE[row % BRICK_PALETTE.len()],
        }
    }

    /// Rectangle derived from the grid indices
    pub fn rect(&self) -> Aabb {
        Aabb::new(
            self.col as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT,
            self.row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
            BRICK_WIDTH,
            BRICK_HEIGHT,
        )
    }
}

/// Fixed 9x5 brick grid, column-major, created once per session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrickGrid {
    bricks: Vec<Brick>,
}

impl Default for BrickGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl BrickGrid {
    pub fn new() -> Self {
        let mut bricks = Vec::with_capacity(BRICK_COLS * BRICK_ROWS);
        for col in 0..BRICK_COLS {
            for row in 0..BRICK_ROWS {
                bricks.push(Brick::new(col, row));
            }
        }
        Self { bricks }
    }

    #[inline]
    pub fn total(&self) -> u32 {
        (BRICK_COLS * BRICK_ROWS) as u32
    }

    pub fn alive_count(&self) -> u32 {
        self.bricks.iter().filter(|b| b.alive).count() as u32
    }

    pub fn get(&self, col: usize, row: usize) -> &Brick {
        &self.bricks[col * BRICK_ROWS + row]
    }

    pub fn get_mut(&mut self, col: usize, row: usize) -> &mut Brick {
        &mut self.bricks[col * BRICK_ROWS + row]
    }

    /// Column-major iteration (the resolution order for collisions)
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Brick> {
        self.bricks.iter_mut()
    }
}

fn detached_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Physics RNG (top-wall jitter); not persisted - a restored session
    /// continues on a detached stream
    #[serde(skip, default = "detached_rng")]
    pub rng: Pcg32,
    pub speed: SpeedLevel,
    pub phase: GamePhase,
    pub outcome: Outcome,
    /// Broken bricks this session; monotonic while the session runs
    pub score: u32,
    pub lives: u8,
    /// Whole seconds in the launched state
    pub elapsed_secs: u32,
    /// The per-second clock starts on the first launch only
    pub timer_started: bool,
    pub tick_count: u64,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: BrickGrid,
}

impl GameSession {
    /// Create a session in the idle state (bricks shown, ball resting)
    pub fn new(seed: u64, speed: SpeedLevel) -> Self {
        let paddle = Paddle::default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            speed,
            phase: GamePhase::Idle,
            outcome: Outcome::None,
            score: 0,
            lives: INITIAL_LIVES,
            elapsed_secs: 0,
            timer_started: false,
            tick_count: 0,
            paddle,
            ball: Ball::resting_on(&paddle),
            bricks: BrickGrid::new(),
        }
    }

    /// Full reset into the serve state (the `start` transition)
    pub fn begin(&mut self) {
        self.phase = GamePhase::Serve;
        self.outcome = Outcome::None;
        self.score = 0;
        self.lives = INITIAL_LIVES;
        self.elapsed_secs = 0;
        self.timer_started = false;
        self.tick_count = 0;
        self.paddle = Paddle::default();
        self.ball = Ball::resting_on(&self.paddle);
        self.bricks = BrickGrid::new();
    }

    /// Full reset back to idle
    pub fn to_idle(&mut self) {
        self.begin();
        self.phase = GamePhase::Idle;
    }

    #[inline]
    pub fn base_speed(&self) -> f32 {
        self.speed.base_speed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_is_column_major() {
        let grid = BrickGrid::new();
        let mut it = grid.iter();
        let first = it.next().unwrap();
        let second = it.next().unwrap();
        // Walking the flat order advances rows within a column first
        assert_eq!((first.col, first.row), (0, 0));
        assert_eq!((second.col, second.row), (0, 1));
        assert_eq!(grid.total(), 45);
        assert_eq!(grid.alive_count(), 45);
    }

    #[test]
    fn test_brick_rect_from_indices() {
        let grid = BrickGrid::new();
        let b = grid.get(0, 0);
        assert_eq!(b.rect().min, Vec2::new(30.0, 30.0));
        let b = grid.get(2, 1);
        // col 2: 30 + 2*(75+10), row 1: 30 + 1*(20+10)
        assert_eq!(b.rect().min, Vec2::new(200.0, 60.0));
    }

    #[test]
    fn test_brick_colors_cycle_per_row() {
        let grid = BrickGrid::new();
        assert_eq!(grid.get(0, 0).color, BRICK_PALETTE[0]);
        assert_eq!(grid.get(3, 4).color, BRICK_PALETTE[4]);
        assert_eq!(grid.get(5, 2).color, grid.get(8, 2).color);
    }

    #[test]
    fn test_paddle_clamped_to_field() {
        let mut p = Paddle::default();
        p.target(-500.0);
        assert_eq!(p.x, 0.0);
        p.target(FIELD_WIDTH + 500.0);
        assert_eq!(p.x, FIELD_WIDTH - PADDLE_WIDTH);
        p.recenter();
        assert_eq!(p.center_x(), FIELD_WIDTH / 2.0);
    }

    #[test]
    fn test_stuck_ball_follows_paddle() {
        let mut p = Paddle::default();
        let mut ball = Ball::resting_on(&p);
        p.target(150.0);
        ball.follow(&p);
        assert_eq!(ball.pos.x, p.center_x());
        assert_eq!(ball.pos.y, Ball::rest_y());
    }

    #[test]
    fn test_launch_sets_upward_velocity_once() {
        let p = Paddle::default();
        let mut ball = Ball::resting_on(&p);
        ball.launch(&p, 2.0);
        assert!(!ball.stuck);
        assert_eq!(ball.vel.y, -2.0);
        // A second launch on a free ball is a no-op
        let vel = ball.vel;
        ball.launch(&p, 3.0);
        assert_eq!(ball.vel, vel);
    }

    #[test]
    fn test_session_begin_resets_everything() {
        let mut s = GameSession::new(7, SpeedLevel::Fast);
        s.score = 12;
        s.lives = 1;
        s.elapsed_secs = 99;
        s.bricks.get_mut(0, 0).alive = false;
        s.begin();
        assert_eq!(s.phase, GamePhase::Serve);
        assert_eq!(s.score, 0);
        assert_eq!(s.lives, INITIAL_LIVES);
        assert_eq!(s.elapsed_secs, 0);
        assert_eq!(s.bricks.alive_count(), 45);
        assert!(s.ball.stuck);
    }
}
