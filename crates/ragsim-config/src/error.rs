//! Error types for file, settings, and scenario operations.

use std::path::PathBuf;

use ragsim_core::RagError;
use thiserror::Error;

/// Errors that can occur while loading or saving ragsim files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Failed to serialize JSON
    #[error("failed to serialize JSON: {0}")]
    JsonSerialize(#[source] serde_json::Error),

    /// A settings value is out of range
    #[error("invalid setting '{key}': {reason}")]
    InvalidSetting {
        /// Dotted key of the offending setting.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Scenario not found
    #[error("scenario not found: {0}")]
    ScenarioNotFound(String),

    /// The graph data is invalid
    #[error(transparent)]
    Graph(#[from] RagError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid-format error for a snapshot that could not be read.
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        ConfigError::Graph(RagError::invalid_format(reason))
    }

    /// Create an invalid-setting error.
    pub fn invalid_setting(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
