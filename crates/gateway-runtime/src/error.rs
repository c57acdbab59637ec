//! # HTTP error translation
//!
//! Collects every component's own `thiserror` enum into one `ApiError` at
//! the edge, the way `node-runtime` collects subsystem errors into
//! `anyhow::Error`. Management endpoints render `ApiError` as the uniform
//! envelope; the redirect/preview handlers in
//! [`crate::routes::redirect`] map statuses directly instead, since branded
//! HTML error pages are a non-goal.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared_types::{ApiEnvelope, ErrorKind};

#[derive(Debug)]
pub struct ApiError {
    kind: ErrorKind,
    message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(kind = ?self.kind, message = %self.message, "request failed");
        let status = StatusCode::from_u16(self.kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ApiEnvelope::<()>::error(self.kind, self.message);
        (status, Json(envelope)).into_response()
    }
}

impl From<sl_issuance::IssuanceError> for ApiError {
    fn from(err: sl_issuance::IssuanceError) -> Self {
        use sl_issuance::IssuanceError::*;
        let kind = match &err {
            BadRequest(_) => ErrorKind::BadRequest,
            Conflict(_) => ErrorKind::Conflict,
            BackendUnavailable(_) => ErrorKind::BackendUnavailable,
            StorageError(_) => ErrorKind::StorageError,
        };
        ApiError::new(kind, err.to_string())
    }
}

impl From<sl_resolution::ResolutionError> for ApiError {
    fn from(err: sl_resolution::ResolutionError) -> Self {
        use sl_resolution::ResolutionError::*;
        let kind = match &err {
            NotFound => ErrorKind::NotFound,
            Disabled => ErrorKind::Disabled,
            Expired => ErrorKind::Expired,
            StorageError(_) => ErrorKind::StorageError,
        };
        ApiError::new(kind, err.to_string())
    }
}

impl From<sl_link_store::StoreError> for ApiError {
    fn from(err: sl_link_store::StoreError) -> Self {
        use sl_link_store::StoreError::*;
        let kind = match &err {
            NotFound => ErrorKind::NotFound,
            Conflict(_) => ErrorKind::Conflict,
            StorageError(_) => ErrorKind::StorageError,
        };
        ApiError::new(kind, err.to_string())
    }
}

impl From<sl_experiment_store::StoreError> for ApiError {
    fn from(err: sl_experiment_store::StoreError) -> Self {
        use sl_experiment_store::StoreError::*;
        let kind = match &err {
            NotFound => ErrorKind::NotFound,
            Conflict(_) => ErrorKind::Conflict,
            StorageError(_) => ErrorKind::StorageError,
        };
        ApiError::new(kind, err.to_string())
    }
}

impl From<sl_experiment_engine::EngineError> for ApiError {
    fn from(err: sl_experiment_engine::EngineError) -> Self {
        use sl_experiment_engine::EngineError::*;
        let kind = match &err {
            Store(inner) => return ApiError::from(clone_store_error(inner)),
            InsufficientVariants(_) | IllegalTransition(..) | NoVariants(_) | InvalidWeightSum(..) => {
                ErrorKind::BadRequest
            }
        };
        ApiError::new(kind, err.to_string())
    }
}

/// `sl_experiment_store::StoreError` is not `Clone`; re-derive an
/// equivalent variant from the original so both branches of the match in
/// [`From<EngineError>`] can share the same translation path.
fn clone_store_error(err: &sl_experiment_store::StoreError) -> sl_experiment_store::StoreError {
    use sl_experiment_store::StoreError::*;
    match err {
        NotFound => NotFound,
        Conflict(msg) => Conflict(msg.clone()),
        StorageError(msg) => StorageError(msg.clone()),
    }
}
