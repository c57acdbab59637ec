//! # `sl-codec` — base-62 codec (C1) and anti-guess transform (C2)
//!
//! Two pure building blocks used by the issuance pipeline (C9):
//!
//! - [`domain::base62`] — reversible integer <-> base-62 string codec.
//! - [`service::ShortCodeEncoder`] — the 4-step anti-enumeration transform
//!   (obfuscate, base-62 encode, random suffix, checksum) built on top of it.
//!
//! Obfuscation is one-way in practice: resolution looks codes up by value
//! in the short-link store, never decodes them back to an issuer number.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::base62::{decode, encode, Base62Error};
pub use ports::{OsRngSuffixSource, RandomSuffixSource};
pub use service::{ShortCodeEncoder, TransformConfig};
