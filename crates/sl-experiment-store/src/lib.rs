//! # `sl-experiment-store` — A/B experiment persistence (C6)
//!
//! CRUD for experiments and variants, session-deduplicated click
//! recording, and the analytics aggregates the experiment engine (C7)
//! and management API read from.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::KvExperimentStore;
pub use domain::{AnalyticsSummary, StoreError};
pub use ports::ExperimentStore;
