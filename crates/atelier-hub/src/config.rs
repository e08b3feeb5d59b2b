//! Configuration file management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Database file name inside the data directory.
pub const DB_FILE_NAME: &str = "atelier.db";

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Complete marketplace configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HubConfig {
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Event bus settings.
    #[serde(default)]
    pub events: EventConfig,
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = in-memory database (tests and demos).
    #[serde(default)]
    pub data_dir: String,
}

/// Event bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// Broadcast buffer capacity per subscriber.
    #[serde(default = "default_event_capacity")]
    pub buffer_capacity: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: default_event_capacity(),
        }
    }
}

fn default_event_capacity() -> usize {
    1024
}

impl HubConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Database path, or `None` for an in-memory database.
    pub fn db_path(&self) -> Option<PathBuf> {
        if self.storage.data_dir.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.storage.data_dir).join(DB_FILE_NAME))
        }
    }
}
