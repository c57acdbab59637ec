use thiserror::Error;

/// Outcomes of the resolution pipeline (C8).
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("not found")]
    NotFound,

    #[error("short link disabled")]
    Disabled,

    #[error("short link expired")]
    Expired,

    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<sl_link_store::StoreError> for ResolutionError {
    fn from(err: sl_link_store::StoreError) -> Self {
        match err {
            sl_link_store::StoreError::NotFound => ResolutionError::NotFound,
            other => ResolutionError::StorageError(other.to_string()),
        }
    }
}

