//! Error types for regdb

use std::time::Duration;
use thiserror::Error;

/// Result type alias for regdb operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Statement text is empty or whitespace-only
    #[error("Empty SQL statement")]
    EmptySql,

    /// INSERT/UPDATE with no column values
    #[error("Empty payload for `{table}`")]
    EmptyPayload { table: String },

    /// UPDATE/DELETE with no WHERE filter (full-table mutation guard)
    #[error("{verb} on `{table}` requires a filter")]
    MissingFilter { table: String, verb: &'static str },

    /// Statement matched the injection blacklist
    #[error("Statement rejected: matched blacklisted pattern `{pattern}`")]
    InjectionRejected { pattern: String },

    /// The client program could not be spawned
    #[error("Failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Statement exceeded the wall-clock timeout
    #[error("Statement timed out after {0:?}")]
    Timeout(Duration),

    /// The client exited non-zero; carries its stderr text
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Row not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Statement issued against a transaction session that already ended
    #[error("Transaction session is closed")]
    SessionClosed,
}

impl DbError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Check if this is a validation error (raised before any process is spawned)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptySql | Self::EmptyPayload { .. } | Self::MissingFilter { .. }
        )
    }

    /// Check if this is an injection rejection
    pub fn is_injection_rejected(&self) -> bool {
        matches!(self, Self::InjectionRejected { .. })
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}
