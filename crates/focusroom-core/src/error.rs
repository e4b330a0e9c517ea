//! Core error types for focusroom-core.
//!
//! Every failure in the core is locally recoverable: a rejected start leaves
//! the engine untouched, and storage or calendar problems degrade the
//! application without stopping the countdown.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A preset label that is not part of the configured catalog.
    #[error("Unknown preset: '{label}'")]
    UnknownPreset { label: String },

    /// The preset catalog failed validation.
    #[error("Invalid preset catalog: {0}")]
    InvalidCatalog(String),

    /// Persistence-related errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Start was refused by the engine guard.
    #[error("Start rejected: {0}")]
    Rejected(#[from] GuardRejection),

    /// No session with the given id exists in the history.
    #[error("No session with id {0}")]
    SessionNotFound(String),

    /// Calendar link could not be built or opened.
    #[error("Calendar error: {0}")]
    Calendar(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why the engine refused to start a countdown.
///
/// This is a guard, not a fault: engine state is unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    #[error("task title is empty")]
    EmptyTitle,

    #[error("timer is already running")]
    AlreadyRunning,
}

/// Persistence collaborator errors.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to open the backing store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// Stored history could not be decoded
    #[error("Stored history is corrupt: {0}")]
    Decode(#[source] serde_json::Error),

    /// History could not be encoded for storage
    #[error("Failed to encode history: {0}")]
    Encode(#[source] serde_json::Error),

    /// Store was deliberately made unavailable (tests, read-only runs)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key is not part of the configuration
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked
                    || inner.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    PersistenceError::Locked
                } else {
                    PersistenceError::QueryFailed(err.to_string())
                }
            }
            _ => PersistenceError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
