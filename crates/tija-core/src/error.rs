//! Core error types for tija-core.
//!
//! This module defines the error hierarchy using thiserror. Ranking has no
//! error channel; everything else reports through [`CoreError`] or one of
//! the narrower enums below.

use std::path::PathBuf;
use thiserror::Error;

use crate::focus::TrackerStatus;

/// Core error type for tija-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Rejected focus tracker transition
    #[error("Focus tracker error: {0}")]
    Tracker(#[from] TrackerError),

    /// Insight generation errors
    #[error("Insight error: {0}")]
    Insight(#[from] InsightError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored record could not be decoded
    #[error("Corrupt record '{id}': {message}")]
    CorruptRecord { id: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Home or data directory could not be resolved
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty or whitespace-only string
    #[error("'{0}' must not be empty")]
    Empty(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Rejections from [`FocusSessionTracker`](crate::focus::FocusSessionTracker).
///
/// A rejected event leaves the tracker exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    /// `start` while a session is already open
    #[error("a focus session is already open ({session_id})")]
    SessionAlreadyOpen { session_id: String },

    /// Event not accepted in the current state
    #[error("cannot {event} while {from}")]
    InvalidTransition {
        from: TrackerStatus,
        event: &'static str,
    },

    /// `set_current_task` while a session is open
    #[error("cannot change the task of open session {session_id}")]
    SessionInProgress { session_id: String },

    /// `tick` with a value below the recorded elapsed time
    #[error("elapsed time went backwards: {given}s < {current}s")]
    ElapsedRegressed { current: u64, given: u64 },

    /// Focus duration must be positive
    #[error("focus duration must be at least one minute")]
    InvalidDuration,
}

/// Insight generation errors.
#[derive(Error, Debug)]
pub enum InsightError {
    /// Insights disabled in configuration
    #[error("insight generation is disabled")]
    Disabled,

    /// No API key in the configured environment variable
    #[error("no API key found in ${0}")]
    MissingApiKey(String),

    /// Transport-level failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the completion API
    #[error("completion API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response did not contain `choices[0].text`
    #[error("completion API response had no text")]
    EmptyCompletion,
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_error_converts_into_core_error() {
        let err: CoreError = TrackerError::InvalidDuration.into();
        assert!(matches!(err, CoreError::Tracker(TrackerError::InvalidDuration)));
        assert!(err.to_string().contains("at least one minute"));
    }

    #[test]
    fn invalid_transition_message_names_state_and_event() {
        let err = TrackerError::InvalidTransition {
            from: TrackerStatus::Idle,
            event: "pause",
        };
        assert_eq!(err.to_string(), "cannot pause while idle");
    }

    #[test]
    fn rusqlite_query_error_maps_to_query_failed() {
        let err: DatabaseError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, DatabaseError::QueryFailed(_)));
    }
}
