//! Error type shared by the store, repository and exchange layers.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecordError>;

#[derive(Debug, Error)]
pub enum RecordError {
    /// The backend refused the write (quota exceeded, I/O failure, ...)
    #[error("Storage rejected write: {0}")]
    StorageWrite(String),
    #[error("Persistent storage is unavailable")]
    StorageUnavailable,
    #[error("Failed to import: {0}")]
    Import(String),
    #[error("Student not found: {0}")]
    NotFound(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecordError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RecordError::NotFound(_))
    }
}
