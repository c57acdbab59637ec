use thiserror::Error;

/// Failure modes of the issuer (C3).
#[derive(Debug, Error)]
pub enum IssuerError {
    /// The counter backend could not be reached or is corrupt. Issuance
    /// must hard-fail rather than fall back to a different counter space:
    /// a backend outage never silently falls back to a weaker guarantee.
    #[error("issuer backend unavailable: {0}")]
    BackendUnavailable(String),

    /// `next` was called for a domain that was never `initialize`d.
    #[error("domain {0} has no counter initialized")]
    Uninitialized(u64),
}
