use thiserror::Error;

/// Errors raised by a [`crate::KeyValueStore`] implementation.
#[derive(Debug, Error)]
pub enum KVStoreError {
    #[error("key-value store I/O error: {0}")]
    Io(String),
    #[error("key-value store corruption: {0}")]
    Corruption(String),
}
