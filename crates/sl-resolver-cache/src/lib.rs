//! # `sl-resolver-cache` — resolved-link cache (C5)
//!
//! Fronts `sl-link-store` on the hot read path. Cache failures are
//! non-fatal by contract: see [`domain::CacheError`].

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::InMemoryTtlCache;
pub use domain::{cache_key, CacheError};
pub use ports::{ResolverCache, DEFAULT_TTL};
