//! Error types for recurd
//!
//! Centralized error handling using thiserror.
//!
//! Two failure granularities matter to the worker: per-obligation errors
//! (`ObligationNotFound`, `InvalidState`, most `Store` errors raised inside
//! `materialize`) and pass-level errors (a `Store` error raised by the
//! selector). Neither is allowed to propagate past the run loop.

use thiserror::Error;

/// All error types that can occur in recurd
#[derive(Debug, Error)]
pub enum RecurdError {
    /// Obligation id does not exist in the store
    #[error("Obligation not found: {0}")]
    ObligationNotFound(i64),

    /// Obligation exists but is not in a state that allows the operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// SQLite store error
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for recurd operations
pub type Result<T> = std::result::Result<T, RecurdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obligation_not_found_error() {
        let err = RecurdError::ObligationNotFound(42);
        assert_eq!(err.to_string(), "Obligation not found: 42");
    }

    #[test]
    fn test_invalid_state_error() {
        let err = RecurdError::InvalidState("obligation 7 is inactive".to_string());
        assert_eq!(err.to_string(), "Invalid state: obligation 7 is inactive");
    }

    #[test]
    fn test_store_error_conversion() {
        let sql_err = rusqlite::Error::QueryReturnedNoRows;
        let err: RecurdError = sql_err.into();
        assert!(matches!(err, RecurdError::Store(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: RecurdError = io_err.into();
        assert!(matches!(err, RecurdError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(RecurdError::InvalidState("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
