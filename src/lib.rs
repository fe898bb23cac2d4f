//! Yokero - an endless-dodge arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, effects, collisions)
//! - `engine`: Screen state machine driving rounds and the score store
//! - `highscores`: Top-10 leaderboard and its file-backed store
//! - `platform`: Frame clock, presenter trait and input mapping
//! - `settings`: Runner preferences

pub mod engine;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

pub use engine::{Engine, InputEvent, RoundResult, Screen, Snapshot};
pub use highscores::{FileScoreStore, HighScores, MemoryScoreStore, ScoreStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (one step per frame)
    pub const FPS: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / FPS as f32;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 1200.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;

    /// Player defaults - x never changes, only y moves
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_SPEED: f32 = 7.0;

    /// Obstacle speed at round start (pixels per frame)
    pub const OBSTACLE_START_SPEED: f32 = 3.0;

    /// Item defaults
    pub const ITEM_SIZE: f32 = 30.0;
    pub const ITEM_SPEED: f32 = 3.0;
    /// Items never spawn closer than this to the top/bottom edge
    pub const ITEM_MARGIN: f32 = 50.0;

    /// Points per item pickup
    pub const ITEM_BONUS: u64 = 100;
    /// Survival score ticks once every this many frames (0.1s)
    pub const SCORE_INTERVAL_FRAMES: u32 = 6;

    /// Post-collision grace period before the result screen (1.5s)
    pub const ENDING_FRAMES: u32 = 90;
}
