use thiserror::Error;

/// Failure modes of the experiment store (C6).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Row missing or soft-deleted.
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    StorageError(String),
}

impl From<sl_storage_kit::KVStoreError> for StoreError {
    fn from(err: sl_storage_kit::KVStoreError) -> Self {
        StoreError::StorageError(err.to_string())
    }
}
