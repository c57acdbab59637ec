//! # Shared error kinds and the management-API response envelope
//!
//! Eight error kinds that every component's own
//! error enum ultimately maps onto for the HTTP layer. Component crates
//! keep their own `thiserror` enums (mirroring the teacher's
//! `StorageError`/`KVStoreError` split per crate); this module only holds
//! the shared `ErrorKind` used for that final HTTP translation, plus the
//! uniform envelope used by the management API.

use serde::{Deserialize, Serialize};

/// The error kinds shared across components, each translatable to
/// one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Disabled,
    Expired,
    Conflict,
    BackendUnavailable,
    StorageError,
    InternalError,
}

impl ErrorKind {
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Disabled => 403,
            ErrorKind::Expired => 410,
            ErrorKind::Conflict => 409,
            ErrorKind::BackendUnavailable => 503,
            ErrorKind::StorageError => 500,
            ErrorKind::InternalError => 500,
        }
    }

    /// The `code` field of the envelope for error responses. Successes use 0.
    pub fn envelope_code(&self) -> i32 {
        self.http_status() as i32
    }
}

/// The uniform JSON envelope every management endpoint responds with
/// `code = 0` on success, mirrored HTTP code otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            message: "ok".to_string(),
            data: Some(data),
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> ApiEnvelope<()> {
        ApiEnvelope {
            code: kind.envelope_code(),
            message: message.into(),
            data: None,
        }
    }
}
