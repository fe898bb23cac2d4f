//! Screen state machine
//!
//! `Engine` owns the single running game: the current screen, the round being
//! played, live cues, held directions, the RNG and the score store. The frame
//! driver calls `handle` for each input event and `step` once per frame, then
//! hands `snapshot` to the presentation layer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::highscores::ScoreStore;
use crate::settings::Settings;
use crate::sim::{Cue, CueKind, Cues, RoundState, TickInput, TickOutcome, tick};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Title screen
    Start,
    /// A round is on screen (waiting for "go", running, or ending)
    Playing,
    /// Round suspended
    Paused,
    /// Final score of the last round
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

/// Semantic input events. Events that make no sense on the current screen
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A direction was pressed or released
    DirectionHeld(Direction, bool),
    /// Start a round from the title, or "go" in a waiting round
    StartRound,
    Pause,
    Resume,
    /// Abandon the paused round, or leave the result screen
    QuitToTitle,
    /// Play again from the result screen
    Replay,
    /// Acknowledge the result and return to the title
    ConfirmAtResult,
    /// Exit the process (title and result screens only)
    QuitApplication,
}

/// Outcome of a finished round, shown on the result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub score: u64,
    /// Beat every previously stored score
    pub new_high: bool,
    /// Leaderboard position after saving (1-indexed)
    pub rank: Option<usize>,
}

/// Read-only view of the engine handed to the presentation layer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub screen: Screen,
    /// Present while Playing or Paused
    pub round: Option<&'a RoundState>,
    pub cues: &'a [Cue],
    pub result: Option<&'a RoundResult>,
    pub high_score: u64,
    /// Engine steps since construction
    pub frame: u64,
}

/// The game engine
pub struct Engine<S: ScoreStore> {
    screen: Screen,
    round: Option<RoundState>,
    cues: Cues,
    input: TickInput,
    rng: Pcg32,
    store: S,
    last_result: Option<RoundResult>,
    quit_requested: bool,
    frame: u64,
}

impl<S: ScoreStore> Engine<S> {
    /// Create an engine on the title screen
    pub fn new(store: S, seed: u64) -> Self {
        log::info!("Engine created (seed {})", seed);
        Self {
            screen: Screen::Start,
            round: None,
            cues: Cues::default(),
            input: TickInput::default(),
            rng: Pcg32::seed_from_u64(seed),
            store,
            last_result: None,
            quit_requested: false,
            frame: 0,
        }
    }

    /// Create an engine configured from runner settings
    pub fn with_settings(store: S, settings: &Settings, seed: u64) -> Self {
        let mut engine = Self::new(store, seed);
        engine.cues.reduced_motion = settings.reduced_motion;
        engine
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn cues(&self) -> &[Cue] {
        self.cues.as_slice()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    /// Currently held directions
    pub fn held(&self) -> TickInput {
        self.input
    }

    /// A quit input was accepted; the frame driver should tear down
    pub fn should_quit(&self) -> bool {
        self.quit_requested
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Apply one input event. Returns whether the event was accepted.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        if let InputEvent::DirectionHeld(direction, held) = event {
            match direction {
                Direction::Up => self.input.up = held,
                Direction::Down => self.input.down = held,
            }
            return true;
        }

        match (self.screen, event) {
            (Screen::Start, InputEvent::StartRound) => {
                self.begin_round();
                true
            }
            (Screen::Start | Screen::Result, InputEvent::QuitApplication) => {
                log::info!("Quit requested");
                self.quit_requested = true;
                true
            }
            (Screen::Playing, InputEvent::StartRound) => self.go(),
            (Screen::Playing, InputEvent::Pause) => {
                let started = self.round.as_ref().is_some_and(|r| r.started);
                if started {
                    self.transition(Screen::Paused);
                }
                started
            }
            (Screen::Paused, InputEvent::Resume) => {
                self.transition(Screen::Playing);
                true
            }
            (Screen::Paused, InputEvent::QuitToTitle) => {
                self.round = None;
                self.transition(Screen::Start);
                true
            }
            (Screen::Result, InputEvent::Replay) => {
                self.begin_round();
                true
            }
            (Screen::Result, InputEvent::ConfirmAtResult | InputEvent::QuitToTitle) => {
                self.transition(Screen::Start);
                true
            }
            _ => {
                log::trace!("Ignoring {:?} on {:?}", event, self.screen);
                false
            }
        }
    }

    /// Advance one frame
    pub fn step(&mut self) {
        self.frame += 1;

        match self.screen {
            // The round and its cues hold still behind the pause box
            Screen::Paused => return,
            Screen::Start | Screen::Result => {
                self.cues.decay();
                return;
            }
            Screen::Playing => {}
        }
        let Some(round) = self.round.as_mut() else {
            self.cues.decay();
            return;
        };

        match tick(round, &self.input, &mut self.rng, &mut self.cues) {
            TickOutcome::Finished => self.finish_round(),
            TickOutcome::Waiting | TickOutcome::Advanced | TickOutcome::Collided => {}
        }
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            screen: self.screen,
            round: self.round.as_ref(),
            cues: self.cues.as_slice(),
            result: self.last_result.as_ref(),
            high_score: self.store.high_score(),
            frame: self.frame,
        }
    }

    /// Fresh round waiting for "go"
    fn begin_round(&mut self) {
        match self.round.as_mut() {
            Some(round) => round.reset(),
            None => self.round = Some(RoundState::new()),
        }
        self.cues.clear();
        self.last_result = None;
        self.transition(Screen::Playing);
    }

    /// Set the started flag on a waiting round
    fn go(&mut self) -> bool {
        let Some(round) = self.round.as_mut() else {
            return false;
        };
        if round.started || round.is_ending() {
            return false;
        }
        round.started = true;
        self.cues.push(
            CueKind::Go,
            Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
        );
        log::info!("Round started");
        true
    }

    /// Persist the score and move to the result screen
    fn finish_round(&mut self) {
        let Some(round) = self.round.take() else {
            return;
        };
        let score = round.score;
        let new_high = self.store.is_new_high(score);
        let rank = self.store.save(score);
        if new_high {
            self.cues.push(
                CueKind::NewHighScore,
                Vec2::new(SCREEN_WIDTH / 2.0, 200.0),
            );
        }
        log::info!(
            "Round over: score {} (new high: {}, rank: {:?})",
            score,
            new_high,
            rank
        );
        self.last_result = Some(RoundResult {
            score,
            new_high,
            rank,
        });
        self.transition(Screen::Result);
    }

    fn transition(&mut self, to: Screen) {
        log::info!("{:?} -> {:?}", self.screen, to);
        self.screen = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryScoreStore;
    use crate::sim::{Obstacle, ObstacleShape};

    /// Store that counts saves
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryScoreStore,
        saves: Vec<u64>,
    }

    impl ScoreStore for CountingStore {
        fn load(&self) -> Vec<u64> {
            self.inner.load()
        }

        fn save(&mut self, score: u64) -> Option<usize> {
            self.saves.push(score);
            self.inner.save(score)
        }
    }

    fn engine() -> Engine<CountingStore> {
        Engine::new(CountingStore::default(), 42)
    }

    /// Drop an obstacle right on top of the player
    fn force_collision(engine: &mut Engine<CountingStore>) {
        let round = engine.round.as_mut().unwrap();
        let id = round.next_entity_id();
        let y = round.player.pos.y;
        round.obstacles.push(Obstacle::new(
            id,
            ObstacleShape::Square,
            Vec2::new(60.0, y),
            Vec2::new(60.0, 60.0),
            3.0,
        ));
    }

    #[test]
    fn test_start_to_playing() {
        let mut engine = engine();
        assert_eq!(engine.screen(), Screen::Start);
        assert!(engine.round().is_none());

        assert!(engine.handle(InputEvent::StartRound));
        assert_eq!(engine.screen(), Screen::Playing);
        let round = engine.round().unwrap();
        assert!(!round.started);

        // Waiting round does not advance
        engine.step();
        assert_eq!(engine.round().unwrap().difficulty.game_time, 0);

        assert!(engine.handle(InputEvent::StartRound));
        assert!(engine.round().unwrap().started);
        assert!(engine.cues().iter().any(|c| c.kind == CueKind::Go));
        engine.step();
        assert_eq!(engine.round().unwrap().difficulty.game_time, 1);

        // Second "go" is a no-op
        assert!(!engine.handle(InputEvent::StartRound));
    }

    #[test]
    fn test_pause_requires_started_round() {
        let mut engine = engine();
        engine.handle(InputEvent::StartRound);
        assert!(!engine.handle(InputEvent::Pause));
        assert_eq!(engine.screen(), Screen::Playing);

        engine.handle(InputEvent::StartRound);
        assert!(engine.handle(InputEvent::Pause));
        assert_eq!(engine.screen(), Screen::Paused);

        // Paused rounds do not advance
        let time = engine.round().unwrap().difficulty.game_time;
        for _ in 0..10 {
            engine.step();
        }
        assert_eq!(engine.round().unwrap().difficulty.game_time, time);

        assert!(engine.handle(InputEvent::Resume));
        assert_eq!(engine.screen(), Screen::Playing);
        engine.step();
        assert_eq!(engine.round().unwrap().difficulty.game_time, time + 1);
    }

    #[test]
    fn test_pause_freezes_cues() {
        let mut engine = engine();
        engine.handle(InputEvent::StartRound);
        engine.handle(InputEvent::StartRound);
        engine.handle(InputEvent::Pause);

        let go_ttl = |engine: &Engine<CountingStore>| {
            engine
                .cues()
                .iter()
                .find(|c| c.kind == CueKind::Go)
                .map(|c| c.ttl)
        };
        let before = go_ttl(&engine);
        assert_eq!(before, Some(CueKind::Go.lifetime()));
        for _ in 0..30 {
            engine.step();
        }
        assert_eq!(go_ttl(&engine), before);

        engine.handle(InputEvent::Resume);
        engine.step();
        assert_eq!(go_ttl(&engine), Some(CueKind::Go.lifetime() - 1));
    }

    #[test]
    fn test_quit_from_pause_discards_round() {
        let mut engine = engine();
        engine.handle(InputEvent::StartRound);
        engine.handle(InputEvent::StartRound);
        engine.handle(InputEvent::Pause);

        assert!(engine.handle(InputEvent::QuitToTitle));
        assert_eq!(engine.screen(), Screen::Start);
        assert!(engine.round().is_none());
        assert!(engine.store().saves.is_empty());
    }

    #[test]
    fn test_collision_countdown_to_result() {
        let mut engine = engine();
        engine.handle(InputEvent::StartRound);
        engine.handle(InputEvent::StartRound);
        for _ in 0..30 {
            engine.step();
        }
        force_collision(&mut engine);
        engine.step();

        let round = engine.round().unwrap();
        assert_eq!(round.ending_ticks, ENDING_FRAMES);
        assert!(!round.started);
        let score = round.score;

        // Pause is ignored during the ending window
        assert!(!engine.handle(InputEvent::Pause));

        for _ in 0..ENDING_FRAMES - 1 {
            engine.step();
            assert_eq!(engine.screen(), Screen::Playing);
        }
        engine.step();

        assert_eq!(engine.screen(), Screen::Result);
        assert!(engine.round().is_none());
        assert_eq!(engine.store().saves, vec![score]);
        let result = engine.last_result().unwrap();
        assert_eq!(result.score, score);
        assert!(result.new_high);
        assert_eq!(result.rank, Some(1));
        assert!(engine.cues().iter().any(|c| c.kind == CueKind::NewHighScore));

        // Result screen keeps running without saving again
        for _ in 0..200 {
            engine.step();
        }
        assert_eq!(engine.store().saves.len(), 1);
    }

    #[test]
    fn test_score_not_new_high() {
        let store = CountingStore {
            inner: MemoryScoreStore::with_scores(vec![10_000]),
            saves: Vec::new(),
        };
        let mut engine = Engine::new(store, 7);
        engine.handle(InputEvent::StartRound);
        engine.handle(InputEvent::StartRound);
        force_collision(&mut engine);
        for _ in 0..=ENDING_FRAMES {
            engine.step();
        }

        assert_eq!(engine.screen(), Screen::Result);
        let result = engine.last_result().unwrap();
        assert!(!result.new_high);
        assert_eq!(result.rank, Some(2));
        assert_eq!(engine.store().saves.len(), 1);
    }

    #[test]
    fn test_replay_and_title_from_result() {
        let mut engine = engine();
        engine.handle(InputEvent::StartRound);
        engine.handle(InputEvent::StartRound);
        force_collision(&mut engine);
        for _ in 0..=ENDING_FRAMES {
            engine.step();
        }
        assert_eq!(engine.screen(), Screen::Result);

        assert!(engine.handle(InputEvent::Replay));
        assert_eq!(engine.screen(), Screen::Playing);
        assert_eq!(engine.round(), Some(&RoundState::new()));
        assert!(engine.last_result().is_none());

        engine.handle(InputEvent::StartRound);
        force_collision(&mut engine);
        for _ in 0..=ENDING_FRAMES {
            engine.step();
        }
        assert!(engine.handle(InputEvent::ConfirmAtResult));
        assert_eq!(engine.screen(), Screen::Start);
        assert_eq!(engine.store().saves.len(), 2);
    }

    #[test]
    fn test_invalid_events_are_ignored() {
        let mut engine = engine();
        assert!(!engine.handle(InputEvent::Pause));
        assert!(!engine.handle(InputEvent::Resume));
        assert!(!engine.handle(InputEvent::Replay));
        assert_eq!(engine.screen(), Screen::Start);

        engine.handle(InputEvent::StartRound);
        assert!(!engine.handle(InputEvent::QuitApplication));
        assert!(!engine.should_quit());
        assert!(!engine.handle(InputEvent::ConfirmAtResult));
        assert_eq!(engine.screen(), Screen::Playing);
    }

    #[test]
    fn test_quit_application() {
        let mut engine = engine();
        assert!(engine.handle(InputEvent::QuitApplication));
        assert!(engine.should_quit());
    }

    #[test]
    fn test_directions_drive_player() {
        let mut engine = engine();
        engine.handle(InputEvent::StartRound);
        engine.handle(InputEvent::StartRound);
        let y = engine.round().unwrap().player.pos.y;

        engine.handle(InputEvent::DirectionHeld(Direction::Up, true));
        engine.step();
        assert_eq!(engine.round().unwrap().player.pos.y, y - PLAYER_SPEED);

        engine.handle(InputEvent::DirectionHeld(Direction::Up, false));
        engine.handle(InputEvent::DirectionHeld(Direction::Down, true));
        engine.step();
        engine.step();
        assert_eq!(engine.round().unwrap().player.pos.y, y + PLAYER_SPEED);
    }

    #[test]
    fn test_snapshot_reflects_screen() {
        let mut engine = engine();
        let snap = engine.snapshot();
        assert_eq!(snap.screen, Screen::Start);
        assert!(snap.round.is_none());
        assert_eq!(snap.high_score, 0);

        engine.handle(InputEvent::StartRound);
        engine.handle(InputEvent::StartRound);
        engine.handle(InputEvent::Pause);
        let snap = engine.snapshot();
        assert_eq!(snap.screen, Screen::Paused);
        assert!(snap.round.is_some());
        assert!(!snap.cues.is_empty());
    }
}
