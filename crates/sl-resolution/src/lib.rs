//! # `sl-resolution` — the hot redirect path (C8)
//!
//! Wires the resolver cache (C5), short-link/domain store (C4), and
//! experiment engine (C7) into the nine-step resolution pipeline.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::{merge_query, ResolutionError, ResolutionRequest};
pub use ports::ExperimentSelector;
pub use service::ResolutionPipeline;
