//! # Inbound port: per-domain monotonic counter (C3).
//!
//! `next` hands the issuance pipeline (C9) the raw counter value; encoding
//! it into an opaque short code is `sl-codec`'s job, not the issuer's.

use crate::domain::IssuerError;

pub trait IdIssuer: Send + Sync {
    /// Seed the counter for `domain_id` so the next `next()` call returns
    /// `start + 1`. Called once per domain at startup (restart-time
    /// recovery) or when a domain is created. Calling it again for a
    /// domain whose counter already exceeds `start` is a no-op: the
    /// counter never moves backwards.
    fn initialize(&self, domain_id: u64, start: u64) -> Result<(), IssuerError>;

    /// Atomically increment and return the next counter value for
    /// `domain_id`. Panics-free; an uninitialized domain starts from zero.
    fn next(&self, domain_id: u64) -> Result<u64, IssuerError>;

    /// Force the counter for `domain_id` to `value`, bypassing the
    /// monotonic no-op guard in [`IdIssuer::initialize`]. Used by admin
    /// tooling to repair a counter after manual data edits; never called
    /// from the issuance pipeline itself.
    fn reset(&self, domain_id: u64, value: u64) -> Result<(), IssuerError>;
}

/// Outbound port for a cluster-wide atomic counter backend, used by the
/// remote-counter [`IdIssuer`] adapter. Kept separate from [`IdIssuer`] so
/// a counter backend can be swapped (e.g. RocksDB today, a real
/// distributed counter service tomorrow) without touching the issuer's
/// public contract.
pub trait RemoteCounterStore: Send + Sync {
    /// Atomically increment the counter keyed by `key` and return the new
    /// value. A key with no prior value starts from zero before the
    /// increment, so the first call returns 1.
    fn increment_and_get(&self, key: &[u8]) -> Result<u64, IssuerError>;

    /// Read the current value without incrementing. `None` if unset.
    fn get(&self, key: &[u8]) -> Result<Option<u64>, IssuerError>;

    /// Set the counter to `value` only if `value` is greater than the
    /// current stored value (or the key is unset). Returns whether the
    /// write happened.
    fn set_if_greater(&self, key: &[u8], value: u64) -> Result<bool, IssuerError>;

    /// Set the counter to `value` unconditionally, regardless of the
    /// current stored value. Used for admin-initiated counter repair.
    fn force_set(&self, key: &[u8], value: u64) -> Result<(), IssuerError>;
}
