//! Neon Breaker entry point
//!
//! Headless demo: an autopilot plays one session to completion and the
//! result lands in the log. Pass a speed selector ("1".."3" or
//! "slow"/"medium"/"fast") as the first argument.

use neon_breaker::render::{DisplaySink, Frame, RenderSink};
use neon_breaker::scheduler::FrameOutcome;
use neon_breaker::sim::GamePhase;
use neon_breaker::{Game, GameConfig, SpeedLevel};

/// Synthetic display refresh rate for the autopilot clock
const DEMO_FPS: f64 = 60.0;
/// Bail out if a session somehow never ends
const MAX_FRAMES: u64 = 1_000_000;

struct HeadlessRender;

impl RenderSink for HeadlessRender {
    fn draw(&mut self, _frame: &Frame<'_>) {}
}

/// HUD values go to the log instead of a DOM
struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn set_score(&mut self, score: u32) {
        log::info!("score: {score}");
    }

    fn set_time(&mut self, secs: u32) {
        log::debug!("elapsed: {secs}s");
    }

    fn set_lives(&mut self, lives: u8) {
        log::info!("lives: {lives}");
    }
}

fn main() {
    env_logger::init();

    let speed = std::env::args()
        .nth(1)
        .map(|arg| SpeedLevel::parse(&arg))
        .unwrap_or_default();
    log::info!("Neon Breaker (headless) starting at {} speed", speed.as_str());

    let config = GameConfig {
        speed,
        ..Default::default()
    };
    let mut game = Game::builder(config)
        .seed(0xBADC0FFE)
        .render(HeadlessRender)
        .display(LogDisplay)
        .build()
        .expect("render sink attached");

    game.launch_or_start();

    let mut frames: u64 = 0;
    loop {
        let now = frames as f64 / DEMO_FPS;

        // Autopilot: keep the paddle under the ball, relaunch after a miss
        game.pointer_move(game.session().ball.pos.x);
        if game.session().phase == GamePhase::Serve {
            game.launch_or_start();
        }

        match game.frame(now) {
            FrameOutcome::Continue => frames += 1,
            FrameOutcome::Stop => break,
        }
        if frames >= MAX_FRAMES {
            log::warn!("frame limit reached, giving up");
            break;
        }
    }

    let session = game.session();
    log::info!(
        "finished after {} frames: {:?}, score {}, {}s elapsed, {} lives left",
        frames,
        session.outcome,
        session.score,
        session.elapsed_secs,
        session.lives
    );
}
