//! In-process TTL cache: a `RwLock`-guarded map of cache key to (record,
//! expiry instant). No eviction thread — expired entries are reaped
//! lazily on the next `get`/`set` that touches the same key, which is
//! sufficient for a cache whose entries are also bounded by the durable
//! store's own lifecycle.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use shared_types::ShortLink;

use crate::domain::{cache_key, CacheError};
use crate::ports::ResolverCache;

struct Entry {
    link: ShortLink,
    expires_at: Instant,
}

#[derive(Default)]
pub struct InMemoryTtlCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryTtlCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResolverCache for InMemoryTtlCache {
    fn get(&self, host: &str, short_code: &str) -> Result<Option<ShortLink>, CacheError> {
        let key = cache_key(host, short_code);
        let entries = self.entries.read();
        match entries.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.link.clone())),
            _ => Ok(None),
        }
    }

    fn set(
        &self,
        host: &str,
        short_code: &str,
        link: &ShortLink,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let key = cache_key(host, short_code);
        self.entries.write().insert(
            key,
            Entry {
                link: link.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn delete(&self, host: &str, short_code: &str) -> Result<(), CacheError> {
        let key = cache_key(host, short_code);
        self.entries.write().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared_types::Protocol;

    fn sample_link() -> ShortLink {
        let now = Utc::now();
        ShortLink {
            id: 1,
            issuer_number: Some(1),
            domain_id: 1,
            host: "d.test".to_string(),
            protocol: Protocol::Https,
            original_url: "https://example.com".to_string(),
            short_code: "a".to_string(),
            is_custom_code: false,
            title: String::new(),
            description: String::new(),
            creator_ip: "127.0.0.1".to_string(),
            click_count: 0,
            expire_at: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn set_then_get_roundtrips() {
        let cache = InMemoryTtlCache::new();
        cache
            .set("d.test", "a", &sample_link(), Duration::from_secs(60))
            .unwrap();
        let hit = cache.get("d.test", "a").unwrap().unwrap();
        assert_eq!(hit.short_code, "a");
    }

    #[test]
    fn miss_on_unknown_key() {
        let cache = InMemoryTtlCache::new();
        assert!(cache.get("d.test", "missing").unwrap().is_none());
    }

    #[test]
    fn expired_entry_is_a_miss() {
        let cache = InMemoryTtlCache::new();
        cache
            .set("d.test", "a", &sample_link(), Duration::from_millis(0))
            .unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("d.test", "a").unwrap().is_none());
    }

    #[test]
    fn delete_removes_the_entry() {
        let cache = InMemoryTtlCache::new();
        cache
            .set("d.test", "a", &sample_link(), Duration::from_secs(60))
            .unwrap();
        cache.delete("d.test", "a").unwrap();
        assert!(cache.get("d.test", "a").unwrap().is_none());
    }
}
