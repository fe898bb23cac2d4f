//! Yokero entry point
//!
//! Native headless runner: constructs the engine, plays demo rounds with the
//! autopilot through the fixed 60 Hz frame clock, and logs what a renderer
//! would show. Construct -> run loop -> teardown, no globals.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    use yokero::consts::FPS;
    use yokero::engine::{Engine, InputEvent, Screen, Snapshot};
    use yokero::highscores::{FileScoreStore, ScoreStore};
    use yokero::platform::{Autopilot, FrameClock, Presenter};
    use yokero::settings::{SETTINGS_FILE, Settings};

    /// Rounds longer than this are abandoned (10 minutes of game time)
    const MAX_ROUND_FRAMES: u64 = FPS as u64 * 60 * 10;

    /// Presenter that logs screen changes instead of drawing
    #[derive(Default)]
    pub struct LogPresenter {
        last_screen: Option<Screen>,
    }

    impl Presenter for LogPresenter {
        fn present(&mut self, frame: &Snapshot<'_>) {
            if self.last_screen == Some(frame.screen) {
                return;
            }
            self.last_screen = Some(frame.screen);

            match frame.screen {
                Screen::Start => log::info!("[title] best score {}", frame.high_score),
                Screen::Playing => log::info!("[playing] frame {}", frame.frame),
                Screen::Paused => log::info!("[paused]"),
                Screen::Result => {
                    if let Some(result) = frame.result {
                        log::info!(
                            "[result] score {}{}",
                            result.score,
                            if result.new_high { " - NEW HIGH SCORE!!!" } else { "" }
                        );
                    }
                }
            }
        }
    }

    /// Round bookkeeping for the demo loop
    pub struct DemoSession {
        rounds: u32,
        max_round_frames: u64,
        /// Rounds finished or abandoned so far
        pub played: u32,
        /// Frames the current round has been advancing
        round_frames: u64,
    }

    impl DemoSession {
        pub fn new(rounds: u32, max_round_frames: u64) -> Self {
            Self {
                rounds,
                max_round_frames,
                played: 0,
                round_frames: 0,
            }
        }

        /// React to the screen the engine landed on after a step
        pub fn after_step<S: ScoreStore>(&mut self, engine: &mut Engine<S>) {
            match engine.screen() {
                Screen::Playing => {
                    // Only a running round can be paused and abandoned; the
                    // ending window finishes on its own
                    if !engine.round().is_some_and(|r| r.is_advancing()) {
                        return;
                    }
                    self.round_frames += 1;
                    if self.round_frames > self.max_round_frames {
                        log::warn!("Round exceeded {} frames, abandoning", self.max_round_frames);
                        engine.handle(InputEvent::Pause);
                        engine.handle(InputEvent::QuitToTitle);
                        self.round_frames = 0;
                        self.played += 1;
                    }
                }
                Screen::Result => {
                    self.played += 1;
                    self.round_frames = 0;
                    if self.played >= self.rounds {
                        engine.handle(InputEvent::QuitApplication);
                    } else {
                        engine.handle(InputEvent::Replay);
                    }
                }
                Screen::Start => {
                    self.round_frames = 0;
                    if self.played >= self.rounds {
                        engine.handle(InputEvent::QuitApplication);
                    } else {
                        engine.handle(InputEvent::StartRound);
                    }
                }
                Screen::Paused => {}
            }
        }
    }

    fn time_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    pub fn run() {
        env_logger::init();
        log::info!("Yokero (headless) starting...");

        let settings = Settings::load(Path::new(SETTINGS_FILE));
        let seed = settings.seed.unwrap_or_else(time_seed);
        let store = FileScoreStore::open(&settings.score_file);

        let mut engine = Engine::with_settings(store, &settings, seed);
        let mut pilot = Autopilot::new();
        let mut presenter = LogPresenter::default();
        let mut clock = FrameClock::new();

        let mut session = DemoSession::new(settings.demo_rounds, MAX_ROUND_FRAMES);
        presenter.present(&engine.snapshot());
        engine.handle(InputEvent::StartRound);

        while !engine.should_quit() {
            let steps = if settings.realtime { clock.wait() } else { 1 };
            for _ in 0..steps {
                for event in pilot.events(&engine.snapshot()) {
                    engine.handle(event);
                }
                engine.step();
                presenter.present(&engine.snapshot());
                session.after_step(&mut engine);

                if engine.should_quit() {
                    break;
                }
            }
        }

        let scores = engine.store().load();
        log::info!("Top scores: {:?}", scores);
        log::info!("Yokero exiting after {} rounds", session.played);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}
