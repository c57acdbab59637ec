//! # `sl-issuer` — per-domain monotonic counter (C3)
//!
//! Two interchangeable backends behind the [`ports::IdIssuer`] contract:
//!
//! - [`adapters::InMemoryIssuer`] — single process, zero I/O.
//! - [`adapters::RemoteCounterIssuer`] — cluster-wide, backed by any
//!   [`ports::RemoteCounterStore`]; [`adapters::KvBackedCounterStore`] is
//!   the reference implementation over `sl-storage-kit`.
//!
//! Neither backend encodes the counter value into a short code — that is
//! `sl-codec`'s job (C1/C2), kept deliberately separate so the issuance
//! pipeline (C9) can swap backends without touching the encoding step.

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{InMemoryIssuer, KvBackedCounterStore, RemoteCounterIssuer};
pub use domain::IssuerError;
pub use ports::{IdIssuer, RemoteCounterStore};
