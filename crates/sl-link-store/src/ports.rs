//! # Inbound ports: short-link store (C4) and the domain registry.
//!
//! The domain registry is not one of C1-C9 in its own right, but short
//! links cannot exist without it; it is kept in this crate because both
//! share the same storage substrate and the domain-deletion check needs
//! to query short links.

use shared_types::{ClickStatistic, Domain, ShortLink};

use crate::domain::{ListFilter, StoreError};

pub trait ShortLinkStore: Send + Sync {
    fn create(&self, link: ShortLink) -> Result<ShortLink, StoreError>;

    fn find_by_id(&self, id: u64) -> Result<Option<ShortLink>, StoreError>;

    fn find_by_domain_and_code(
        &self,
        domain_id: u64,
        short_code: &str,
    ) -> Result<Option<ShortLink>, StoreError>;

    /// Optimization path for auto-issued codes: decode the short code's
    /// leading base-62 portion via C1 into an issuer number and look the
    /// link up directly, instead of scanning by `(domain, short_code)`.
    /// Implementations MAY simply delegate to `find_by_domain_and_code`.
    fn find_by_decoded_id_within_domain(
        &self,
        domain_id: u64,
        issuer_number: u64,
    ) -> Result<Option<ShortLink>, StoreError>;

    fn list(&self, filter: &ListFilter) -> Result<Vec<ShortLink>, StoreError>;

    fn update(&self, link: ShortLink) -> Result<ShortLink, StoreError>;

    fn soft_delete(&self, id: u64) -> Result<(), StoreError>;

    /// Must be an atomic increment, never a read-modify-write of the
    /// full record.
    fn increment_click_count(&self, id: u64) -> Result<(), StoreError>;

    /// True only when a non-deleted link already occupies `(domain_id,
    /// short_code)`; used for the custom-code collision check.
    fn exists_by_domain_and_code(&self, domain_id: u64, short_code: &str) -> Result<bool, StoreError>;

    /// Highest `issuer_number` recorded for `domain_id`, or 0 if none.
    /// Used to seed the in-memory issuer backend on restart.
    fn max_issuer_number(&self, domain_id: u64) -> Result<u64, StoreError>;
}

pub trait DomainStore: Send + Sync {
    fn create(&self, domain: Domain) -> Result<Domain, StoreError>;

    fn find_by_id(&self, id: u64) -> Result<Option<Domain>, StoreError>;

    fn find_by_host(&self, host: &str) -> Result<Option<Domain>, StoreError>;

    fn list(&self) -> Result<Vec<Domain>, StoreError>;

    fn update(&self, domain: Domain) -> Result<Domain, StoreError>;

    fn soft_delete(&self, id: u64) -> Result<(), StoreError>;
}

/// Non-experiment click log (`ClickStatistic`). No dedup;
/// best-effort append, same as the experiment store's click recording but
/// without a session-id dedup key.
pub trait ClickStatisticStore: Send + Sync {
    fn record(&self, click: ClickStatistic) -> Result<(), StoreError>;

    fn list_for_short_link(&self, short_link_id: u64) -> Result<Vec<ClickStatistic>, StoreError>;
}
