//! Error handling for bookshelf-store
//!
//! Wraps bookshelf-core ExError with store-specific helpers and classifies
//! rusqlite failures into the canonical taxonomy.

use bookshelf_core::errors::{ExError, ExErrorKind};
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Map an SQLite result code to the error kind callers act on
fn classify(code: ErrorCode) -> ExErrorKind {
    match code {
        ErrorCode::ConstraintViolation => ExErrorKind::ConstraintViolation,
        ErrorCode::DatabaseBusy
        | ErrorCode::DatabaseLocked
        | ErrorCode::CannotOpen
        | ErrorCode::SystemIoFailure
        | ErrorCode::FileLockingProtocolFailed
        | ErrorCode::PermissionDenied => ExErrorKind::StoreUnavailable,
        _ => ExErrorKind::Persistence,
    }
}

/// Create a store error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    let kind = match &err {
        rusqlite::Error::SqliteFailure(inner, _) => classify(inner.code),
        _ => ExErrorKind::Persistence,
    };
    ExError::new(kind)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a schema (DDL) error
pub fn schema_error(step: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Schema)
        .with_op("schema_initialize")
        .with_message(format!("Schema step '{}' failed: {}", step, err))
        .with_source(from_rusqlite(err))
}

/// Create an integrity error for rows that reference a missing parent
pub fn integrity_violation(orphans: usize) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op("check_integrity")
        .with_message(format!(
            "{} review row(s) reference a book that does not exist",
            orphans
        ))
}

/// Create an error for a pool that could not hand out a connection
///
/// r2d2 reports both checkout timeouts and failed connection setup this way;
/// either way the store is unreachable for now.
pub fn pool_error(operation: &str, err: r2d2::Error) -> ExError {
    ExError::new(ExErrorKind::StoreUnavailable)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an error for a poisoned lock
pub fn poisoned(what: &str) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op("lock")
        .with_message(format!("{} lock poisoned", what))
}

/// Create an invalid configuration error
pub fn invalid_config(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op("store_config")
        .with_message(reason.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(code: ErrorCode) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code,
                extended_code: 0,
            },
            None,
        )
    }

    #[test]
    fn test_constraint_failure_classified() {
        let err = from_rusqlite(failure(ErrorCode::ConstraintViolation));
        assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_busy_is_store_unavailable_and_retryable() {
        let err = from_rusqlite(failure(ErrorCode::DatabaseBusy));
        assert_eq!(err.kind(), ExErrorKind::StoreUnavailable);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_other_failures_are_persistence() {
        let err = from_rusqlite(rusqlite::Error::QueryReturnedNoRows);
        assert_eq!(err.kind(), ExErrorKind::Persistence);
        let err = from_rusqlite(failure(ErrorCode::TypeMismatch));
        assert_eq!(err.kind(), ExErrorKind::Persistence);
    }

    #[test]
    fn test_schema_error_keeps_source() {
        let err = schema_error("create", failure(ErrorCode::ReadOnly));
        assert_eq!(err.kind(), ExErrorKind::Schema);
        assert!(err.source_error().is_some());
    }
}
