//! # `sl-experiment-engine` — A/B variant selection and attribution (C7)
//!
//! Session derivation ([`domain::session`]), deterministic variant
//! selection ([`domain::selection`]), and the orchestration surface C8
//! calls ([`service::ExperimentEngine`]).

pub mod domain;
pub mod service;

pub use domain::{derive_session_id, seed_from_session_id, select_variant, EngineError};
pub use service::{ExperimentEngine, VariantSelection};
