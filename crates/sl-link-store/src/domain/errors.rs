use thiserror::Error;

/// Failure modes of the short-link and domain stores (C4).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,

    /// A `(host, short_code)` pair, or a domain `host`, already exists
    /// among non-deleted records.
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
