//! Runner settings and preferences
//!
//! Persisted as JSON next to the binary. The simulation itself never reads
//! this file; the runner turns it into engine construction parameters.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default settings file name
pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the top-10 leaderboard is stored
    pub score_file: PathBuf,
    /// Fixed RNG seed; a time-derived seed is used when unset
    pub seed: Option<u64>,

    // === Accessibility ===
    /// Reduced motion (no screen shake, no wind streaks)
    pub reduced_motion: bool,

    // === Runner ===
    /// Pace frames at 60 Hz wall-clock time instead of running flat out
    pub realtime: bool,
    /// Rounds the headless runner plays before exiting
    pub demo_rounds: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            score_file: PathBuf::from("scores.json"),
            seed: None,
            reduced_motion: false,
            realtime: false,
            demo_rounds: 3,
        }
    }
}

impl Settings {
    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("Using default settings");
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
