//! Game state machine and frame driver
//!
//! [`Game`] owns the session, the cosmetic effects, both schedulers and the
//! host sinks. Input adapter events arrive as method calls; the host's
//! display-refresh callback drives [`Game::frame`], which runs one
//! simulation tick, feeds the event list to the effects, and pushes the
//! results out through the sinks.

use std::fmt;

use crate::render::{DisplaySink, Frame, NullDisplay, NullOverlay, OverlaySink, RenderSink};
use crate::scheduler::{FrameOutcome, FrameTicker, SecondTimer};
use crate::settings::{CheatMode, GameConfig, SpeedLevel};
use crate::sim::{self, Effects, GamePhase, GameSession, Outcome, TickInput};

/// Initialization failures surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// No render sink was attached; the game cannot start without one
    NoRenderSurface,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::NoRenderSurface => write!(f, "no render surface available"),
        }
    }
}

impl std::error::Error for GameError {}

/// Builder for [`Game`]; the render sink is mandatory
pub struct GameBuilder {
    config: GameConfig,
    seed: u64,
    render: Option<Box<dyn RenderSink>>,
    display: Option<Box<dyn DisplaySink>>,
    overlay: Option<Box<dyn OverlaySink>>,
}

impl GameBuilder {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            seed: 0,
            render: None,
            display: None,
            overlay: None,
        }
    }

    /// Session seed (hosts usually pass wall-clock milliseconds)
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn render(mut self, sink: impl RenderSink + 'static) -> Self {
        self.render = Some(Box::new(sink));
        self
    }

    pub fn display(mut self, sink: impl DisplaySink + 'static) -> Self {
        self.display = Some(Box::new(sink));
        self
    }

    pub fn overlay(mut self, sink: impl OverlaySink + 'static) -> Self {
        self.overlay = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> Result<Game, GameError> {
        let render = self.render.ok_or(GameError::NoRenderSurface)?;
        Ok(Game {
            session: GameSession::new(self.seed, self.config.speed),
            effects: Effects::new(self.seed ^ 0x5eed, self.config.trail_length),
            config: self.config,
            input: TickInput::default(),
            ticker: FrameTicker::new(),
            clock: SecondTimer::new(),
            render,
            display: self.display.unwrap_or_else(|| Box::new(NullDisplay)),
            overlay: self.overlay.unwrap_or_else(|| Box::new(NullOverlay)),
            hud: Hud::default(),
        })
    }
}

/// Last values pushed to the display sink, so it only hears about changes
#[derive(Debug, Default)]
struct Hud {
    score: Option<u32>,
    time: Option<u32>,
    lives: Option<u8>,
}

/// One independent game instance
pub struct Game {
    config: GameConfig,
    session: GameSession,
    effects: Effects,
    /// Pending intents; one-shots are cleared after the tick that saw them
    input: TickInput,
    ticker: FrameTicker,
    clock: SecondTimer,
    render: Box<dyn RenderSink>,
    display: Box<dyn DisplaySink>,
    overlay: Box<dyn OverlaySink>,
    hud: Hud,
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("config", &self.config)
            .field("session", &self.session)
            .field("effects", &self.effects)
            .field("input", &self.input)
            .field("ticker", &self.ticker)
            .field("clock", &self.clock)
            .field("hud", &self.hud)
            .finish_non_exhaustive()
    }
}

impl Game {
    pub fn builder(config: GameConfig) -> GameBuilder {
        GameBuilder::new(config)
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Mutable session access for hosts (save restore, test setup)
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    // --- Input adapter -----------------------------------------------------

    /// Continuous pointer target for the paddle center
    pub fn pointer_move(&mut self, x: f32) {
        self.input.target_x = Some(x);
    }

    /// Keyboard steering: -1.0 left, +1.0 right, 0.0 released
    pub fn steer(&mut self, dir: f32) {
        self.input.steer = dir.clamp(-1.0, 1.0);
    }

    /// Click or keypress; semantics depend on the current state
    pub fn launch_or_start(&mut self) {
        match self.session.phase {
            GamePhase::Idle | GamePhase::Won | GamePhase::Lost => self.start(),
            GamePhase::Serve => self.input.launch = true,
            GamePhase::Playing => {}
        }
    }

    /// Change the speed selector; honored only while no session is running
    pub fn set_speed(&mut self, level: SpeedLevel) {
        if self.session.phase.is_active() {
            log::debug!("speed change ignored while playing");
            return;
        }
        self.session.speed = level;
    }

    /// Queue the instant-clear debug input (ignored unless cheats are on)
    pub fn cheat_clear(&mut self) {
        if self.config.cheats == CheatMode::Enabled {
            self.input.cheat_clear = true;
        }
    }

    // --- Transitions -------------------------------------------------------

    /// Begin a session. A no-op while one is already running.
    pub fn start(&mut self) {
        if self.session.phase.is_active() {
            log::debug!("start ignored - session already running");
            return;
        }

        if self.session.outcome == Outcome::Won
            && let Some(next) = self.config.progression.next_speed(self.session.speed)
        {
            log::info!("progression: raising speed to {}", next.as_str());
            self.session.speed = next;
        }

        self.begin_session();
    }

    /// Full reinit straight into the serve state, from any state
    /// (the host's restart button)
    pub fn restart(&mut self) {
        self.begin_session();
    }

    fn begin_session(&mut self) {
        self.session.begin();
        self.effects.clear();
        self.input = TickInput::default();
        self.clock.cancel();
        self.ticker.start();
        self.overlay.backdrop(false);
        self.sync_hud();
        self.render_frame();
        log::info!(
            "session started (speed {}, seed {})",
            self.session.speed.as_str(),
            self.session.seed
        );
    }

    /// Tear everything down to the idle state
    pub fn reset(&mut self) {
        self.session.to_idle();
        self.effects.clear();
        self.input = TickInput::default();
        self.clock.cancel();
        self.ticker.stop();
        self.overlay.backdrop(false);
        self.sync_hud();
        self.render_frame();
    }

    // --- Frame driver ------------------------------------------------------

    /// Display-refresh callback: at most one tick-and-render pass.
    ///
    /// Returns [`FrameOutcome::Stop`] the moment the machine is outside a
    /// playing state, so the host exits instead of rescheduling.
    pub fn frame(&mut self, now: f64) -> FrameOutcome {
        if !self.ticker.is_active() || !self.session.phase.is_active() {
            self.ticker.stop();
            return FrameOutcome::Stop;
        }

        let before = self.session.phase;
        let events = sim::tick(&mut self.session, &self.input);

        // One-shot intents are consumed by exactly one tick
        self.input.launch = false;
        self.input.cheat_clear = false;
        self.input.target_x = None;

        for event in &events {
            self.effects.apply(event);
        }
        self.effects
            .advance(&self.session.ball, self.session.phase == GamePhase::Playing);

        // Whole seconds accrued while launched
        for _ in 0..self.clock.poll(now) {
            self.session.elapsed_secs += 1;
        }

        if self.session.phase != before {
            self.on_phase_change(now);
        }

        self.sync_hud();
        self.render_frame();

        if self.session.phase.is_active() {
            FrameOutcome::Continue
        } else {
            self.ticker.stop();
            FrameOutcome::Stop
        }
    }

    /// Draw one frame outside the scheduled loop (initial paint)
    pub fn draw(&mut self) {
        self.render_frame();
    }

    fn on_phase_change(&mut self, now: f64) {
        match self.session.phase {
            GamePhase::Playing => {
                // The elapsed clock arms on the first launch only; later
                // launches resume it where the last miss paused it
                if !self.session.timer_started {
                    self.session.timer_started = true;
                }
                self.clock.start(now);
            }
            GamePhase::Serve => {
                // Re-stuck after a miss: seconds accrue only while launched
                self.clock.pause(now);
            }
            GamePhase::Won => {
                self.clock.cancel();
                self.overlay.confetti();
                self.overlay.backdrop(true);
            }
            GamePhase::Lost => {
                self.clock.cancel();
                self.overlay.backdrop(true);
            }
            GamePhase::Idle => {}
        }
    }

    fn sync_hud(&mut self) {
        let score = self.session.score;
        if self.hud.score != Some(score) {
            self.hud.score = Some(score);
            self.display.set_score(score);
        }
        let time = self.session.elapsed_secs;
        if self.hud.time != Some(time) {
            self.hud.time = Some(time);
            self.display.set_time(time);
        }
        let lives = self.session.lives;
        if self.hud.lives != Some(lives) {
            self.hud.lives = Some(lives);
            self.display.set_lives(lives);
        }
    }

    fn render_frame(&mut self) {
        let frame = Frame {
            phase: self.session.phase,
            ball_pos: self.session.ball.pos,
            ball_radius: self.session.ball.radius,
            ball_stuck: self.session.ball.stuck,
            paddle_x: self.session.paddle.x,
            bricks: &self.session.bricks,
            trail: self.effects.trail(),
            particles: self.effects.particles(),
            show_launch_hint: self.session.phase == GamePhase::Serve,
        };
        self.render.draw(&frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::ProgressionPolicy;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct SinkLog {
        scores: Vec<u32>,
        times: Vec<u32>,
        lives: Vec<u8>,
        confetti: u32,
        backdrops: Vec<bool>,
        frames: u32,
    }

    #[derive(Clone)]
    struct Recorder(Rc<RefCell<SinkLog>>);

    impl crate::render::RenderSink for Recorder {
        fn draw(&mut self, _frame: &Frame<'_>) {
            self.0.borrow_mut().frames += 1;
        }
    }

    impl DisplaySink for Recorder {
        fn set_score(&mut self, score: u32) {
            self.0.borrow_mut().scores.push(score);
        }
        fn set_time(&mut self, secs: u32) {
            self.0.borrow_mut().times.push(secs);
        }
        fn set_lives(&mut self, lives: u8) {
            self.0.borrow_mut().lives.push(lives);
        }
    }

    impl OverlaySink for Recorder {
        fn confetti(&mut self) {
            self.0.borrow_mut().confetti += 1;
        }
        fn backdrop(&mut self, visible: bool) {
            self.0.borrow_mut().backdrops.push(visible);
        }
    }

    fn recording_game(config: GameConfig) -> (Game, Rc<RefCell<SinkLog>>) {
        let log = Rc::new(RefCell::new(SinkLog::default()));
        let game = Game::builder(config)
            .seed(42)
            .render(Recorder(log.clone()))
            .display(Recorder(log.clone()))
            .overlay(Recorder(log.clone()))
            .build()
            .unwrap();
        (game, log)
    }

    #[test]
    fn test_builder_requires_render_surface() {
        let err = Game::builder(GameConfig::default()).build().unwrap_err();
        assert_eq!(err, GameError::NoRenderSurface);
        assert_eq!(err.to_string(), "no render surface available");
    }

    #[test]
    fn test_start_is_noop_while_running() {
        let (mut game, _) = recording_game(GameConfig::default());
        game.launch_or_start(); // Idle -> Serve
        assert_eq!(game.session().phase, GamePhase::Serve);

        game.launch_or_start(); // queue launch
        game.frame(0.0);
        assert_eq!(game.session().phase, GamePhase::Playing);

        game.start(); // must not restart the running session
        assert_eq!(game.session().phase, GamePhase::Playing);
        assert!(!game.session().ball.stuck);
    }

    #[test]
    fn test_frame_is_noop_outside_playing() {
        let (mut game, log) = recording_game(GameConfig::default());
        assert_eq!(game.frame(0.0), FrameOutcome::Stop);
        assert_eq!(game.session().tick_count, 0);
        assert_eq!(log.borrow().frames, 0);
    }

    #[test]
    fn test_speed_change_only_when_not_playing() {
        let (mut game, _) = recording_game(GameConfig::default());
        game.set_speed(SpeedLevel::Fast);
        assert_eq!(game.session().speed, SpeedLevel::Fast);

        game.launch_or_start();
        game.set_speed(SpeedLevel::Slow); // ignored while serving
        assert_eq!(game.session().speed, SpeedLevel::Fast);
    }

    #[test]
    fn test_hud_hears_only_changes() {
        let (mut game, log) = recording_game(GameConfig::default());
        game.launch_or_start();
        game.launch_or_start();
        for i in 0..10 {
            game.frame(i as f64 / 60.0);
        }
        // Score never changed after the initial 0, so one push
        assert_eq!(log.borrow().scores, vec![0]);
        assert_eq!(log.borrow().lives, vec![INITIAL_LIVES]);
    }

    #[test]
    fn test_elapsed_seconds_follow_wall_clock() {
        let (mut game, log) = recording_game(GameConfig::default());
        game.launch_or_start();
        game.launch_or_start();
        game.frame(0.0); // launch tick, clock armed
        game.frame(0.5);
        assert_eq!(game.session().elapsed_secs, 0);
        game.frame(1.1);
        assert_eq!(game.session().elapsed_secs, 1);
        game.frame(3.6);
        assert_eq!(game.session().elapsed_secs, 3);
        assert_eq!(log.borrow().times, vec![0, 1, 3]);
    }

    #[test]
    fn test_clock_pauses_while_restuck() {
        let (mut game, _) = recording_game(GameConfig::default());
        game.launch_or_start();
        game.launch_or_start();
        game.frame(0.0);
        game.frame(2.0);
        assert_eq!(game.session().elapsed_secs, 2);

        // Force a miss: ball at the floor, paddle far away
        {
            let s = game.session_mut();
            s.paddle.x = 0.0;
            s.ball.pos = Vec2::new(600.0, FIELD_HEIGHT - BALL_RADIUS - 0.5);
            s.ball.vel = Vec2::new(0.0, 2.0);
        }
        game.frame(2.1);
        assert_eq!(game.session().phase, GamePhase::Serve);

        // Stuck time does not count
        game.frame(10.0);
        game.frame(20.0);
        assert_eq!(game.session().elapsed_secs, 2);

        // Relaunch resumes the clock
        game.launch_or_start();
        game.frame(20.1);
        game.frame(21.2);
        assert_eq!(game.session().elapsed_secs, 3);
    }

    #[test]
    fn test_win_fires_confetti_and_stops() {
        let config = GameConfig {
            cheats: CheatMode::Enabled,
            ..Default::default()
        };
        let (mut game, log) = recording_game(config);
        game.launch_or_start();
        game.launch_or_start();
        game.frame(0.0);
        game.cheat_clear();
        assert_eq!(game.frame(0.1), FrameOutcome::Stop);
        assert_eq!(game.session().phase, GamePhase::Won);
        assert_eq!(game.session().outcome, Outcome::Won);
        assert_eq!(log.borrow().confetti, 1);
        assert_eq!(log.borrow().backdrops.last(), Some(&true));

        // Frozen: further frames change nothing
        assert_eq!(game.frame(0.2), FrameOutcome::Stop);
        assert_eq!(log.borrow().confetti, 1);
    }

    #[test]
    fn test_cheat_ignored_when_disabled() {
        let (mut game, _) = recording_game(GameConfig::default());
        game.launch_or_start();
        game.launch_or_start();
        game.frame(0.0);
        game.cheat_clear();
        game.frame(0.1);
        assert_eq!(game.session().phase, GamePhase::Playing);
        assert_eq!(game.session().score, 0);
    }

    #[test]
    fn test_progression_raises_speed_after_win() {
        let config = GameConfig {
            cheats: CheatMode::Enabled,
            progression: ProgressionPolicy::RaiseSpeed,
            ..Default::default()
        };
        let (mut game, _) = recording_game(config);
        game.launch_or_start();
        game.launch_or_start();
        game.frame(0.0);
        game.cheat_clear();
        game.frame(0.1);
        assert_eq!(game.session().phase, GamePhase::Won);

        game.launch_or_start(); // play again
        assert_eq!(game.session().phase, GamePhase::Serve);
        assert_eq!(game.session().speed, SpeedLevel::Medium);
        assert_eq!(game.session().score, 0);
        assert!(game.effects().particles().is_empty());
    }

    #[test]
    fn test_loss_ends_exactly_once() {
        let (mut game, log) = recording_game(GameConfig::default());
        game.launch_or_start();
        game.launch_or_start();
        game.frame(0.0);
        {
            let s = game.session_mut();
            s.lives = 1;
            s.paddle.x = 0.0;
            s.ball.pos = Vec2::new(600.0, FIELD_HEIGHT - BALL_RADIUS - 0.5);
            s.ball.vel = Vec2::new(0.0, 2.0);
        }
        assert_eq!(game.frame(0.1), FrameOutcome::Stop);
        assert_eq!(game.session().phase, GamePhase::Lost);
        assert_eq!(game.session().outcome, Outcome::Lost);

        let ends = log.borrow().backdrops.iter().filter(|v| **v).count();
        game.frame(0.2);
        game.frame(0.3);
        assert_eq!(
            log.borrow().backdrops.iter().filter(|v| **v).count(),
            ends
        );
    }

    #[test]
    fn test_restart_mid_session_returns_to_serve() {
        let (mut game, _) = recording_game(GameConfig::default());
        game.launch_or_start();
        game.launch_or_start();
        game.frame(0.0);
        assert_eq!(game.session().phase, GamePhase::Playing);

        game.restart();
        assert_eq!(game.session().phase, GamePhase::Serve);
        assert_eq!(game.session().lives, INITIAL_LIVES);
        assert!(game.session().ball.stuck);
        assert_eq!(game.frame(0.1), FrameOutcome::Continue);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let (mut game, _) = recording_game(GameConfig::default());
        game.launch_or_start();
        game.launch_or_start();
        game.frame(0.0);
        game.reset();
        assert_eq!(game.session().phase, GamePhase::Idle);
        assert_eq!(game.frame(0.1), FrameOutcome::Stop);
        assert_eq!(game.session().tick_count, 0);
    }

    #[test]
    fn test_pointer_target_is_consumed_once() {
        let (mut game, _) = recording_game(GameConfig::default());
        game.launch_or_start();
        game.pointer_move(100.0);
        game.frame(0.0);
        assert_eq!(game.session().paddle.center_x(), 100.0);

        // No new pointer events: steering takes over cleanly
        game.steer(1.0);
        game.frame(0.1);
        assert_eq!(
            game.session().paddle.center_x(),
            100.0 + PADDLE_STEER_SPEED
        );
    }
}
