//! Structured error types for configuration and record handling.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, writing or bootstrapping configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a config file
    #[error("Failed to read configuration file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid INI
    #[error("Failed to parse configuration file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// Failed to create the parent directory or write the file
    #[error("Failed to write configuration file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single file copy failed while bootstrapping
    #[error("Failed to copy '{from}' to '{to}': {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A section, key or value that cannot be written as a single INI line
    #[error("Invalid entry [{section}] {key}: {reason}")]
    InvalidEntry {
        section: String,
        key: String,
        reason: String,
    },

    /// The template source is missing or is not a directory
    #[error("Template directory not found: {0}")]
    SourceNotDirectory(PathBuf),
}

impl ConfigError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while validating channel and test-result records.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),

    #[error("Invalid ipv_type: {0}")]
    InvalidIpvType(String),

    /// Carries both a channel `id` and a measurement `speed`
    #[error("Record is ambiguous: it has both 'id' and 'speed' keys")]
    Ambiguous,

    #[error("Record matches neither a channel nor a test result")]
    Unrecognized,

    #[error("Malformed record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;
