//! Error types for the store crate.

use taste_model::UserId;
use thiserror::Error;

/// Errors raised while loading, saving or replaying taste state
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error while reading or writing a state or event file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State document could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Another writer saved this user since it was loaded
    #[error("Version conflict for user {user_id}: expected {expected}, found {actual}")]
    VersionConflict {
        user_id: UserId,
        expected: u64,
        actual: u64,
    },

    /// Line in an event log couldn't be parsed
    #[error("Event log error at line {line}: {reason}")]
    EventLog { line: usize, reason: String },

    /// A writer panicked while holding the store lock
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
