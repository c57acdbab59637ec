use thiserror::Error;

/// Failure modes of the issuance pipeline (C9).
#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// Auto-code path only: C3 could not serve `next()`.
    #[error("issuer backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

impl From<sl_link_store::StoreError> for IssuanceError {
    fn from(err: sl_link_store::StoreError) -> Self {
        match err {
            sl_link_store::StoreError::Conflict(msg) => IssuanceError::Conflict(msg),
            other => IssuanceError::StorageError(other.to_string()),
        }
    }
}

impl From<sl_issuer::IssuerError> for IssuanceError {
    fn from(err: sl_issuer::IssuerError) -> Self {
        IssuanceError::BackendUnavailable(err.to_string())
    }
}
