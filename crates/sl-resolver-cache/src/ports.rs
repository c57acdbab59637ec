//! # Inbound port: the resolver cache (C5).

use std::time::Duration;

use shared_types::ShortLink;

use crate::domain::CacheError;

pub trait ResolverCache: Send + Sync {
    fn get(&self, host: &str, short_code: &str) -> Result<Option<ShortLink>, CacheError>;

    fn set(
        &self,
        host: &str,
        short_code: &str,
        link: &ShortLink,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    fn delete(&self, host: &str, short_code: &str) -> Result<(), CacheError>;
}

/// Default TTL: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
