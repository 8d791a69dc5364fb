//! Custom error types for the common library
//!
//! This module defines the errors raised by the persistence and
//! configuration layers shared by the client crates.

use thiserror::Error;

/// Custom error type for key-value storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error occurred while reading or writing the backing medium
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store is in a state it cannot recover from on its own
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;

/// Custom error type for configuration loading
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A source could not be read or a value had the wrong shape
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is not acceptable
    #[error("Invalid configuration value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Type alias for Result with SettingsError
pub type SettingsResult<T> = Result<T, SettingsError>;
