//! Error types for list storage.

use thiserror::Error;

/// Main error type for storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid value: a stored value must not be null")]
    InvalidValue,

    #[error("Index out of range: {index} (len {len})")]
    OutOfRange { index: i64, len: usize },

    #[error("Collection is empty")]
    EmptyCollection,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Not implemented: {0}")]
    NotImplemented(String),

    #[error("Storage already exists: {0}")]
    StorageExists(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
