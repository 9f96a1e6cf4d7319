//! Configuration for the spatial memory index.
//!
//! Settings are loaded from a TOML file. Every field has a default, so a
//! partial file (or none at all) yields a usable configuration.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

use crate::error::{ConfigError, ConfigResult};

fn default_separator() -> String {
    ", ".to_string()
}

fn default_true() -> bool {
    true
}

fn default_level() -> String {
    "info".to_string()
}

/// Top-level configuration loaded from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialMemoryConfig {
    /// Query presentation and lookup behaviour
    #[serde(default)]
    pub query: QuerySettings,
    /// Snapshot file output
    #[serde(default)]
    pub snapshot: SnapshotSettings,
    /// Logging output
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// How enumeration queries look up and present names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySettings {
    /// String placed between names in summary strings
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Whether game-object lookup retries the arena name case-insensitively
    #[serde(default = "default_true")]
    pub arena_case_fallback: bool,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            arena_case_fallback: true,
        }
    }
}

/// How snapshots are written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotSettings {
    /// Indent the JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
    /// Write to a temporary sibling file and rename it into place
    #[serde(default = "default_true")]
    pub atomic_writes: bool,
}

impl Default for SnapshotSettings {
    fn default() -> Self {
        Self {
            pretty: true,
            atomic_writes: true,
        }
    }
}

/// Logging system configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json_format: false,
        }
    }
}

impl SpatialMemoryConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes a default configuration file at the
    /// given path and returns the defaults.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
            let config: SpatialMemoryConfig = toml::from_str(&content)
                .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
            config.validate()?;
            Ok(config)
        } else {
            let default_config = SpatialMemoryConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            fs::write(path, toml_content).map_err(|e| ConfigError::Write(path.to_path_buf(), e))?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Checks the configuration for values the index cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.query.separator.is_empty() {
            return Err(ConfigError::Invalid(
                "Query separator cannot be empty".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            )));
        }

        Ok(())
    }
}
