//! Configuration loading and management
//!
//! Handles parsing of `.tracker.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::history::DEFAULT_HISTORY_LIMIT;

pub const CONFIG_FILE: &str = ".tracker.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// View history configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Id allocation configuration
    #[serde(default)]
    pub ids: IdConfig,
}

/// View history configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of entries kept before the oldest is dropped
    #[serde(default = "default_history_max_entries")]
    pub max_entries: usize,
}

fn default_history_max_entries() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_history_max_entries(),
        }
    }
}

/// Id allocation configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdConfig {
    /// First id handed out by the store. Id 0 is reserved.
    #[serde(default = "default_first_id")]
    pub first: u64,
}

fn default_first_id() -> u64 {
    1
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            first: default_first_id(),
        }
    }
}

impl Config {
    /// Load configuration from a `.tracker.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.tracker.toml` from a directory if there is one
    pub fn discover(dir: &Path) -> crate::error::Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(None);
        }
        Self::load(&config_path).map(Some)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &Path) -> Self {
        match Self::discover(dir) {
            Ok(config) => config.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(dir = %dir.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.history.max_entries == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "history.max_entries must be at least 1".to_string(),
            ));
        }
        if self.ids.first == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "ids.first must be at least 1; 0 is reserved for unassigned".to_string(),
            ));
        }
        Ok(())
    }
}
