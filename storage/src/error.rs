//! Storage error types.
//!
//! Used by the message store and aggregate computer; callers at the server
//! boundary convert into [`wflow_core::FlowError`].

use thiserror::Error;
use wflow_core::FlowError;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Malformed input, rejected before any write.
    #[error("Validation error: {0}")]
    Validation(String),
    /// The underlying SQLite store failed or is unreachable.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for FlowError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(msg) => FlowError::Validation(msg),
            StorageError::Database(e) => FlowError::Database(e.to_string()),
        }
    }
}
