//! Storage error types

use thiserror::Error;

/// Errors raised by a [`NoteStore`](crate::storage::NoteStore) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No record with this id
    #[error("record '{id}' not found")]
    NotFound { id: String },

    /// Id is empty or would escape the store
    #[error("invalid record id '{id}'")]
    InvalidId { id: String },

    /// Records must be JSON objects
    #[error("record must be a JSON object")]
    NotAnObject,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StorageError {
    #[inline]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    #[inline]
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId { id: id.into() }
    }
}
