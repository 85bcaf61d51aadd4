//! Error helpers for localstore-store
//!
//! Wraps localstore-core ExError with store-specific constructors

use localstore_core::errors::{ExError, ExErrorKind, LocalStoreError};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a query error that remembers the statement text
pub fn query_error(sql: &str, err: rusqlite::Error) -> ExError {
    LocalStoreError::Query {
        sql: sql.to_string(),
        reason: err.to_string(),
    }
    .into()
}

/// Create an engine start/load error
pub fn engine_error(operation: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::InitializationFailure)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a storage error for a key, keeping the underlying cause
pub fn storage_unavailable(operation: &str, key: &str, cause: ExError) -> ExError {
    ExError::from(LocalStoreError::StorageUnavailable {
        key: key.to_string(),
        reason: cause.message().to_string(),
    })
    .with_op(operation.to_string())
    .with_source(cause)
}

/// Create an error for an operation attempted before initialization
pub fn not_ready(operation: &str) -> ExError {
    LocalStoreError::NotReady {
        op: operation.to_string(),
    }
    .into()
}
