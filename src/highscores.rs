//! High score leaderboard system
//!
//! Persisted as a JSON array of integers, tracks the top 10 scores.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Failure reading or writing the score file
#[derive(Debug, Error)]
pub enum ScoreStoreError {
    #[error("score file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("score file is not a list of non-negative integers: {0}")]
    Format(#[from] serde_json::Error),
}

/// High score leaderboard, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<u64>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary scores (sorted and trimmed)
    pub fn from_scores(mut scores: Vec<u64>) -> Self {
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_HIGH_SCORES);
        Self { entries: scores }
    }

    /// Scores, best first
    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    /// Add a score.
    ///
    /// The score is placed after any equal scores and the board is cut back to
    /// ten. On a full board a score that ties an existing entry is not added,
    /// so the board stays as it was.
    ///
    /// Returns the rank achieved (1-indexed) or None if it didn't make the board.
    pub fn add_score(&mut self, score: u64) -> Option<usize> {
        if self.entries.len() >= MAX_HIGH_SCORES && self.entries.contains(&score) {
            return None;
        }

        let pos = self
            .entries
            .iter()
            .position(|&e| score > e)
            .unwrap_or(self.entries.len());
        if pos >= MAX_HIGH_SCORES {
            return None;
        }
        self.entries.insert(pos, score);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().copied()
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Read a leaderboard file
    pub fn read_file(path: &Path) -> Result<Self, ScoreStoreError> {
        let json = fs::read_to_string(path)?;
        let scores: Vec<u64> = serde_json::from_str(&json)?;
        Ok(Self::from_scores(scores))
    }

    /// Write a leaderboard file, creating parent directories
    pub fn write_file(&self, path: &Path) -> Result<(), ScoreStoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Ranked score persistence used by the engine
pub trait ScoreStore {
    /// Stored scores, best first
    fn load(&self) -> Vec<u64>;

    /// Record a finished round. Best-effort: failures are logged, not returned.
    /// Returns the rank achieved, if any.
    fn save(&mut self, score: u64) -> Option<usize>;

    /// Best stored score, or 0 when there is none
    fn high_score(&self) -> u64 {
        self.load().first().copied().unwrap_or(0)
    }

    /// Whether `score` strictly beats every stored score
    fn is_new_high(&self, score: u64) -> bool {
        score > self.high_score()
    }
}

/// Leaderboard kept in memory only
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    board: HighScores,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(scores: Vec<u64>) -> Self {
        Self {
            board: HighScores::from_scores(scores),
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> Vec<u64> {
        self.board.entries().to_vec()
    }

    fn save(&mut self, score: u64) -> Option<usize> {
        self.board.add_score(score)
    }

    fn high_score(&self) -> u64 {
        self.board.top_score().unwrap_or(0)
    }
}

/// Leaderboard backed by a JSON file.
///
/// The file is read once on open; an unreadable or corrupt file starts an
/// empty board. Every save rewrites the file.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
    board: HighScores,
}

impl FileScoreStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let board = if path.exists() {
            match HighScores::read_file(&path) {
                Ok(board) => {
                    log::info!("Loaded {} high scores from {}", board.len(), path.display());
                    board
                }
                Err(e) => {
                    log::warn!("Ignoring score file {}: {}", path.display(), e);
                    HighScores::new()
                }
            }
        } else {
            log::info!("No high scores found, starting fresh");
            HighScores::new()
        };
        Self { path, board }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn board(&self) -> &HighScores {
        &self.board
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> Vec<u64> {
        self.board.entries().to_vec()
    }

    fn save(&mut self, score: u64) -> Option<usize> {
        let rank = self.board.add_score(score);
        match self.board.write_file(&self.path) {
            Ok(()) => log::info!(
                "High scores saved ({} entries) to {}",
                self.board.len(),
                self.path.display()
            ),
            Err(e) => log::warn!("Could not save high scores: {}", e),
        }
        rank
    }

    fn high_score(&self) -> u64 {
        self.board.top_score().unwrap_or(0)
    }
}
