//! Error types for the editing core.
//!
//! Provides the crate-wide error taxonomy using `thiserror` for ergonomic
//! error handling. Validation errors are absorbed at the model boundary
//! (logged, never surfaced); every other kind propagates to the caller.

use std::io;
use thiserror::Error;
use serde::Serialize;

/// Main error type for the editing core.
///
/// All errors crossing the crate boundary are one of these kinds so the
/// UI layer can map them to user-visible notifications. `Clone` is required
/// because single-flight waiters share the first caller's result.
#[derive(Error, Debug, Clone, Serialize)]
pub enum EditorError {
    /// Out-of-range or non-finite input. Dropped at the model boundary,
    /// never returned from public mutation APIs.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A surface or asset did not become available within the polling bound.
    /// Fatal to the current operation, not retried further.
    #[error("Not ready: {0}")]
    NotReady(String),

    /// An operation exceeded its allotted time. The queue releases the
    /// operation's memory reservation before surfacing this.
    #[error("Operation '{operation}' timed out after {timeout_ms}ms")]
    Timeout {
        operation: String,
        timeout_ms: u64,
    },

    /// Gallery or share access refused by the platform.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// File system or collaborator failure.
    #[error("IO error: {0}")]
    Io(String),
}

/// Convenience result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

// Helper methods for error creation
impl EditorError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_ready<T: Into<String>>(msg: T) -> Self {
        Self::NotReady(msg.into())
    }

    pub fn timeout<T: Into<String>>(operation: T, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    pub fn permission_denied<T: Into<String>>(msg: T) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::Io(msg.into())
    }
}

// Convert std::io::Error to EditorError
impl From<io::Error> for EditorError {
    fn from(err: io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_includes_operation_and_duration() {
        let err = EditorError::timeout("export", 5000);
        let msg = err.to_string();
        assert!(msg.contains("export"));
        assert!(msg.contains("5000"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: EditorError = io_err.into();
        assert!(matches!(err, EditorError::Io(_)));
    }
}
