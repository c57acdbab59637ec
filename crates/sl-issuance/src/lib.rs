//! # `sl-issuance` — short-link creation pipeline (C9)
//!
//! Validates requests, resolves the owning domain, and dispatches to the
//! custom-code or auto-code path.

pub mod domain;
pub mod service;

pub use domain::{BatchCreateResult, BatchFailure, CreateLinkRequest, IssuanceError, MAX_BATCH_SIZE};
pub use service::IssuancePipeline;
