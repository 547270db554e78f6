//! Error types for configuration and backup handling.
//!
//! Save rejections live in [`crate::validation::SaveError`]; they are
//! expected outcomes shown to users rather than faults.

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or checking a [`crate::config::TimetableConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config parsed but violates a registry rule.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors reading a backup document.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Not JSON, or a group record has the wrong shape.
    #[error("backup is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no `groups` array.
    #[error("backup has no groups array")]
    MissingGroups,
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Backup(#[from] BackupError),
}

/// Result alias over [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
