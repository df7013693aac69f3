//! Error types for the migration proxy
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

// == Storage Error Enum ==
/// Failure of a single bucket call.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The bucket answered that the key does not exist
    #[error("No such key {key} in bucket {bucket}")]
    NotFound { bucket: String, key: String },

    /// The request failed for any other reason (network, permissions, throttling)
    #[error("Request to bucket {bucket} failed: {message}")]
    Request { bucket: String, message: String },

    /// The object body could not be read to completion
    #[error("Failed to read body of {key} from bucket {bucket}: {message}")]
    Body {
        bucket: String,
        key: String,
        message: String,
    },
}

impl StorageError {
    /// True when the bucket positively reported the key as absent.
    ///
    /// The resolver does not branch on this today: every failed lookup is
    /// treated as a miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }

    /// Short label used in log records.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageError::NotFound { .. } => "not_found",
            StorageError::Request { .. } => "request",
            StorageError::Body { .. } => "body",
        }
    }
}

// == Config Error Enum ==
/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value {value:?} for environment variable {var}")]
    InvalidEnv { var: String, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// == Result Type Alias ==
/// Convenience Result type for bucket calls.
pub type Result<T> = std::result::Result<T, StorageError>;
