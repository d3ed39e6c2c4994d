//! Practice configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use xiangqi_rating::DEFAULT_RATING;

/// Errors that can occur when loading the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Settings for a practice session.
///
/// Every field has a default, so an empty or missing file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PracticeConfig {
    /// Rating used when the store holds none yet.
    pub initial_rating: i32,
    /// JSON file holding the persisted rating.
    pub rating_file: PathBuf,
    /// How long a restart or resign press waits for confirmation.
    pub confirm_window_ms: u64,
    /// Pause before the engine starts searching.
    pub ai_delay_ms: u64,
    /// Upper bound on a commentary request.
    pub commentary_timeout_ms: u64,
    /// Seed for the engine's move variance. Random when unset.
    pub seed: Option<u64>,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        PracticeConfig {
            initial_rating: DEFAULT_RATING,
            rating_file: PathBuf::from("rating.json"),
            confirm_window_ms: 3000,
            ai_delay_ms: 200,
            commentary_timeout_ms: 5000,
            seed: None,
        }
    }
}

impl PracticeConfig {
    /// Loads the configuration at `path`, or defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Default configuration file name.
    pub fn config_path() -> PathBuf {
        PathBuf::from("xiangqi.toml")
    }

    pub fn confirm_window(&self) -> Duration {
        Duration::from_millis(self.confirm_window_ms)
    }

    pub fn ai_delay(&self) -> Duration {
        Duration::from_millis(self.ai_delay_ms)
    }

    pub fn commentary_timeout(&self) -> Duration {
        Duration::from_millis(self.commentary_timeout_ms)
    }
}
