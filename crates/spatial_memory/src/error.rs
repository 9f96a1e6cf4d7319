//! Error types for the spatial memory index

use std::{io::Error as IoError, path::PathBuf};
use thiserror::Error;

use crate::types::Level;

/// Snapshot storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read file {0}: {1}")]
    FileRead(PathBuf, IoError),

    #[error("Failed to create file {0}: {1}")]
    FileCreate(PathBuf, IoError),

    #[error("Failed to write to file {0}: {1}")]
    FileWrite(PathBuf, IoError),

    #[error("Failed to sync file {0}: {1}")]
    FileSync(PathBuf, IoError),

    #[error("Failed to rename file from {0} to {1}: {2}")]
    FileRename(PathBuf, PathBuf, IoError),

    #[error("Failed to serialize snapshot for {0}: {1}")]
    Serialization(PathBuf, serde_json::Error),

    #[error("Failed to deserialize file {0}: {1}")]
    Deserialization(PathBuf, serde_json::Error),
}

/// Index lookup and update errors
#[derive(Debug, Error)]
pub enum SpatialMemoryError {
    #[error("No {level} named '{key}' in spatial memory")]
    MissingKey { level: Level, key: String },

    #[error("Malformed address '{address}': expected {expected} segments, found {found}")]
    MalformedAddress {
        address: String,
        expected: usize,
        found: usize,
    },

    #[error("Tile names a {level} but no {parent}")]
    MissingParent { level: Level, parent: Level },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SpatialMemoryError {
    pub(crate) fn missing(level: Level, key: &str) -> Self {
        SpatialMemoryError::MissingKey {
            level,
            key: key.to_string(),
        }
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {0}: {1}")]
    Read(PathBuf, IoError),

    #[error("Failed to write config {0}: {1}")]
    Write(PathBuf, IoError),

    #[error("Failed to parse config {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("Failed to serialize default config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Log subscriber installation errors
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to install log subscriber: {0}")]
    SubscriberInstall(#[from] tracing_subscriber::util::TryInitError),
}

// Result type aliases for convenience
pub type SpatialMemoryResult<T> = Result<T, SpatialMemoryError>;
pub type StorageResult<T> = Result<T, StorageError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type LoggingResult<T> = Result<T, LoggingError>;
