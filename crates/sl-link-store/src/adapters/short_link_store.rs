//! KeyValueStore-backed `ShortLinkStore` adapter.
//!
//! Layout, mirroring the teacher's `qc-02-block-storage` index layering:
//!
//! - `link:id:{id}` -> bincode(ShortLink) — primary record.
//! - `link:code:{domain_id}:{short_code}` -> `id` (8 bytes) — secondary
//!   index for `find_by_domain_and_code` / `exists_by_domain_and_code`.
//!   Left pointing at soft-deleted records; callers filter on
//!   `is_deleted()` themselves for anything that isn't a collision check.
//! - `link:issuer_max:{domain_id}` -> `u64` (8 bytes) — running maximum of
//!   `issuer_number` per domain, maintained on every `create`.
//! - `link:next_id` -> `u64` (8 bytes) — primary key sequence.
//!
//! A single mutex serializes every mutating call: `KeyValueStore` gives
//! atomic single-key writes but no cross-key transaction, so index
//! maintenance (primary + secondary + issuer-max) needs external
//! exclusion the same way `sl-issuer`'s remote-counter adapter does.

use parking_lot::Mutex;
use shared_types::ShortLink;
use sl_storage_kit::{BatchOperation, KeyValueStore};

use crate::domain::{ListFilter, StoreError};
use crate::ports::ShortLinkStore;

const PREFIX_ID: &[u8] = b"link:id:";
const PREFIX_CODE: &[u8] = b"link:code:";
const PREFIX_ISSUER_MAX: &[u8] = b"link:issuer_max:";
const KEY_NEXT_ID: &[u8] = b"link:next_id";

fn id_key(id: u64) -> Vec<u8> {
    let mut key = PREFIX_ID.to_vec();
    key.extend_from_slice(&id.to_be_bytes());
    key
}

fn code_key(domain_id: u64, short_code: &str) -> Vec<u8> {
    let mut key = PREFIX_CODE.to_vec();
    key.extend_from_slice(&domain_id.to_be_bytes());
    key.push(b':');
    key.extend_from_slice(short_code.as_bytes());
    key
}

fn issuer_max_key(domain_id: u64) -> Vec<u8> {
    let mut key = PREFIX_ISSUER_MAX.to_vec();
    key.extend_from_slice(&domain_id.to_be_bytes());
    key
}

pub struct KvShortLinkStore<S: KeyValueStore> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> KvShortLinkStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn deserialize(bytes: &[u8]) -> Result<ShortLink, StoreError> {
        bincode::deserialize(bytes).map_err(|e| StoreError::StorageError(e.to_string()))
    }

    fn serialize(link: &ShortLink) -> Result<Vec<u8>, StoreError> {
        bincode::serialize(link).map_err(|e| StoreError::StorageError(e.to_string()))
    }

    fn next_id(&self) -> Result<u64, StoreError> {
        let current = self
            .store
            .get(KEY_NEXT_ID)?
            .map(|bytes| {
                let arr: [u8; 8] = bytes.as_slice().try_into().unwrap_or([0; 8]);
                u64::from_be_bytes(arr)
            })
            .unwrap_or(0);
        let next = current + 1;
        self.store.put(KEY_NEXT_ID, &next.to_be_bytes())?;
        Ok(next)
    }

    fn read_issuer_max(&self, domain_id: u64) -> Result<u64, StoreError> {
        Ok(self
            .store
            .get(&issuer_max_key(domain_id))?
            .map(|bytes| {
                let arr: [u8; 8] = bytes.as_slice().try_into().unwrap_or([0; 8]);
                u64::from_be_bytes(arr)
            })
            .unwrap_or(0))
    }
}

impl<S: KeyValueStore> ShortLinkStore for KvShortLinkStore<S> {
    fn create(&self, mut link: ShortLink) -> Result<ShortLink, StoreError> {
        let _guard = self.write_lock.lock();

        if self
            .store
            .exists(&code_key(link.domain_id, &link.short_code))?
        {
            return Err(StoreError::Conflict(format!(
                "short code {} already exists for domain {}",
                link.short_code, link.domain_id
            )));
        }

        link.id = self.next_id()?;
        let record = Self::serialize(&link)?;

        let mut ops = vec![
            BatchOperation::put(id_key(link.id), record),
            BatchOperation::put(
                code_key(link.domain_id, &link.short_code),
                link.id.to_be_bytes().to_vec(),
            ),
        ];

        if let Some(issuer_number) = link.issuer_number {
            let current_max = self.read_issuer_max(link.domain_id)?;
            if issuer_number > current_max {
                ops.push(BatchOperation::put(
                    issuer_max_key(link.domain_id),
                    issuer_number.to_be_bytes().to_vec(),
                ));
            }
        }

        self.store.atomic_batch_write(ops)?;
        Ok(link)
    }

    fn find_by_id(&self, id: u64) -> Result<Option<ShortLink>, StoreError> {
        match self.store.get(&id_key(id))? {
            Some(bytes) => Ok(Some(Self::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn find_by_domain_and_code(
        &self,
        domain_id: u64,
        short_code: &str,
    ) -> Result<Option<ShortLink>, StoreError> {
        let id_bytes = match self.store.get(&code_key(domain_id, short_code))? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let arr: [u8; 8] = id_bytes
            .as_slice()
            .try_into()
            .map_err(|_| StoreError::StorageError("corrupt code index entry".to_string()))?;
        self.find_by_id(u64::from_be_bytes(arr))
    }

    fn find_by_decoded_id_within_domain(
        &self,
        domain_id: u64,
        issuer_number: u64,
    ) -> Result<Option<ShortLink>, StoreError> {
        // Reference implementation does not maintain a dedicated
        // issuer-number index; falling back to the full record scan is
        // correct, just not the constant-time path the real index would
        // give an auto-issued lookup.
        let all = self
            .store
            .prefix_scan(PREFIX_ID)?
            .into_iter()
            .map(|(_, v)| Self::deserialize(&v))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(all
            .into_iter()
            .find(|l| l.domain_id == domain_id && l.issuer_number == Some(issuer_number)))
    }

    fn list(&self, filter: &ListFilter) -> Result<Vec<ShortLink>, StoreError> {
        let mut all = self
            .store
            .prefix_scan(PREFIX_ID)?
            .into_iter()
            .map(|(_, v)| Self::deserialize(&v))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(domain_id) = filter.domain_filter {
            all.retain(|l| l.domain_id == domain_id);
        }
        if let Some(keyword) = &filter.keyword {
            let keyword = keyword.to_lowercase();
            all.retain(|l| {
                l.short_code.to_lowercase().contains(&keyword)
                    || l.original_url.to_lowercase().contains(&keyword)
                    || l.title.to_lowercase().contains(&keyword)
            });
        }
        all.sort_by_key(|l| l.id);

        let offset = filter.offset as usize;
        let limit = filter.limit as usize;
        Ok(all.into_iter().skip(offset).take(limit.max(1)).collect())
    }

    fn update(&self, link: ShortLink) -> Result<ShortLink, StoreError> {
        let _guard = self.write_lock.lock();
        if self.store.get(&id_key(link.id))?.is_none() {
            return Err(StoreError::NotFound);
        }
        let record = Self::serialize(&link)?;
        self.store.put(&id_key(link.id), &record)?;
        Ok(link)
    }

    fn soft_delete(&self, id: u64) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut link = match self.store.get(&id_key(id))? {
            Some(bytes) => Self::deserialize(&bytes)?,
            None => return Err(StoreError::NotFound),
        };
        link.deleted_at = Some(chrono::Utc::now());
        link.is_active = false;
        let record = Self::serialize(&link)?;
        self.store.put(&id_key(id), &record)?;
        Ok(())
    }

    // §4.4 asks for an atomic column increment rather than read-modify-write;
    // `KeyValueStore` has no native fetch-add primitive, so this adapter
    // gets the same guarantee by taking `write_lock` for the whole
    // read-modify-write, serializing it against every other mutation on
    // this store the same way a real `UPDATE ... SET x = x + 1` would
    // serialize against concurrent writers at the row level.
    fn increment_click_count(&self, id: u64) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut link = match self.store.get(&id_key(id))? {
            Some(bytes) => Self::deserialize(&bytes)?,
            None => return Err(StoreError::NotFound),
        };
        link.click_count += 1;
        let record = Self::serialize(&link)?;
        self.store.put(&id_key(id), &record)?;
        Ok(())
    }

    fn exists_by_domain_and_code(
        &self,
        domain_id: u64,
        short_code: &str,
    ) -> Result<bool, StoreError> {
        match self.find_by_domain_and_code(domain_id, short_code)? {
            Some(link) => Ok(!link.is_deleted()),
            None => Ok(false),
        }
    }

    fn max_issuer_number(&self, domain_id: u64) -> Result<u64, StoreError> {
        self.read_issuer_max(domain_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared_types::Protocol;
    use sl_storage_kit::InMemoryKVStore;

    fn sample_link(domain_id: u64, short_code: &str) -> ShortLink {
        let now = Utc::now();
        ShortLink {
            id: 0,
            issuer_number: None,
            domain_id,
            host: "d.test".to_string(),
            protocol: Protocol::Https,
            original_url: "https://example.com".to_string(),
            short_code: short_code.to_string(),
            is_custom_code: true,
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

    fn store() -> KvShortLinkStore<InMemoryKVStore> {
        KvShortLinkStore::new(InMemoryKVStore::new())
    }

    #[test]
    fn create_then_find_by_id_and_code_roundtrip() {
        let store = store();
        let created = store.create(sample_link(1, "abc")).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(store.find_by_id(1).unwrap().unwrap().short_code, "abc");
        assert_eq!(
            store
                .find_by_domain_and_code(1, "abc")
                .unwrap()
                .unwrap()
                .id,
            1
        );
    }

    #[test]
    fn create_rejects_duplicate_code_in_same_domain() {
        let store = store();
        store.create(sample_link(1, "abc")).unwrap();
        let err = store.create(sample_link(1, "abc")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn same_code_allowed_across_different_domains() {
        let store = store();
        store.create(sample_link(1, "abc")).unwrap();
        let created = store.create(sample_link(2, "abc")).unwrap();
        assert_eq!(created.id, 2);
    }

    #[test]
    fn soft_delete_frees_up_exists_check_but_not_the_index() {
        let store = store();
        store.create(sample_link(1, "abc")).unwrap();
        store.soft_delete(1).unwrap();
        assert!(!store.exists_by_domain_and_code(1, "abc").unwrap());
        assert!(store
            .find_by_domain_and_code(1, "abc")
            .unwrap()
            .unwrap()
            .is_deleted());
    }

    #[test]
    fn increment_click_count_is_additive() {
        let store = store();
        store.create(sample_link(1, "abc")).unwrap();
        store.increment_click_count(1).unwrap();
        store.increment_click_count(1).unwrap();
        assert_eq!(store.find_by_id(1).unwrap().unwrap().click_count, 2);
    }

    #[test]
    fn max_issuer_number_tracks_the_running_max() {
        let store = store();
        let mut link = sample_link(1, "a");
        link.issuer_number = Some(5);
        link.is_custom_code = false;
        store.create(link).unwrap();

        let mut link2 = sample_link(1, "b");
        link2.issuer_number = Some(3);
        link2.is_custom_code = false;
        store.create(link2).unwrap();

        assert_eq!(store.max_issuer_number(1).unwrap(), 5);
    }

    #[test]
    fn list_filters_by_domain_and_keyword() {
        let store = store();
        store.create(sample_link(1, "foo")).unwrap();
        store.create(sample_link(1, "bar")).unwrap();
        store.create(sample_link(2, "foo")).unwrap();

        let filter = ListFilter {
            offset: 0,
            limit: 10,
            domain_filter: Some(1),
            keyword: Some("foo".to_string()),
        };
        let results = store.list(&filter).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].short_code, "foo");
    }
}
