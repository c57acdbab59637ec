//! KeyValueStore-backed `DomainStore` adapter.
//!
//! Layout: `domain:id:{id}` -> bincode(Domain), `domain:host:{host}` ->
//! `id` secondary index, `domain:next_id` -> sequence.

use parking_lot::Mutex;
use shared_types::Domain;
use sl_storage_kit::{BatchOperation, KeyValueStore};

use crate::domain::StoreError;
use crate::ports::DomainStore;

const PREFIX_ID: &[u8] = b"domain:id:";
const PREFIX_HOST: &[u8] = b"domain:host:";
const KEY_NEXT_ID: &[u8] = b"domain:next_id";

fn id_key(id: u64) -> Vec<u8> {
    let mut key = PREFIX_ID.to_vec();
    key.extend_from_slice(&id.to_be_bytes());
    key
}

fn host_key(host: &str) -> Vec<u8> {
    let mut key = PREFIX_HOST.to_vec();
    key.extend_from_slice(host.as_bytes());
    key
}

pub struct KvDomainStore<S: KeyValueStore> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> KvDomainStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn deserialize(bytes: &[u8]) -> Result<Domain, StoreError> {
        bincode::deserialize(bytes).map_err(|e| StoreError::StorageError(e.to_string()))
    }

    fn serialize(domain: &Domain) -> Result<Vec<u8>, StoreError> {
        bincode::serialize(domain).map_err(|e| StoreError::StorageError(e.to_string()))
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
}

impl<S: KeyValueStore> DomainStore for KvDomainStore<S> {
    fn create(&self, mut domain: Domain) -> Result<Domain, StoreError> {
        let _guard = self.write_lock.lock();

        if self.store.exists(&host_key(&domain.host))? {
            return Err(StoreError::Conflict(format!(
                "host {} already exists",
                domain.host
            )));
        }

        domain.id = self.next_id()?;
        let record = Self::serialize(&domain)?;

        self.store.atomic_batch_write(vec![
            BatchOperation::put(id_key(domain.id), record),
            BatchOperation::put(host_key(&domain.host), domain.id.to_be_bytes().to_vec()),
        ])?;
        Ok(domain)
    }

    fn find_by_id(&self, id: u64) -> Result<Option<Domain>, StoreError> {
        match self.store.get(&id_key(id))? {
            Some(bytes) => Ok(Some(Self::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    fn find_by_host(&self, host: &str) -> Result<Option<Domain>, StoreError> {
        let id_bytes = match self.store.get(&host_key(host))? {
            Some(bytes) => bytes,
            None => return Ok(None),
        };
        let arr: [u8; 8] = id_bytes
            .as_slice()
            .try_into()
            .map_err(|_| StoreError::StorageError("corrupt host index entry".to_string()))?;
        self.find_by_id(u64::from_be_bytes(arr))
    }

    fn list(&self) -> Result<Vec<Domain>, StoreError> {
        let mut all = self
            .store
            .prefix_scan(PREFIX_ID)?
            .into_iter()
            .map(|(_, v)| Self::deserialize(&v))
            .collect::<Result<Vec<_>, _>>()?;
        all.sort_by_key(|d| d.id);
        Ok(all)
    }

    fn update(&self, domain: Domain) -> Result<Domain, StoreError> {
        let _guard = self.write_lock.lock();
        if self.store.get(&id_key(domain.id))?.is_none() {
            return Err(StoreError::NotFound);
        }
        let record = Self::serialize(&domain)?;
        self.store.put(&id_key(domain.id), &record)?;
        Ok(domain)
    }

    fn soft_delete(&self, id: u64) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut domain = match self.store.get(&id_key(id))? {
            Some(bytes) => Self::deserialize(&bytes)?,
            None => return Err(StoreError::NotFound),
        };
        domain.deleted_at = Some(chrono::Utc::now());
        domain.is_active = false;
        let record = Self::serialize(&domain)?;
        // Drop the host index along with the row: §3 scopes host uniqueness
        // to non-deleted domains, so a soft-deleted host must be free for
        // `create` to reuse.
        self.store.atomic_batch_write(vec![
            BatchOperation::put(id_key(id), record),
            BatchOperation::delete(host_key(&domain.host)),
        ])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared_types::Protocol;
    use sl_storage_kit::InMemoryKVStore;

    fn sample_domain(host: &str) -> Domain {
        let now = Utc::now();
        Domain {
            id: 0,
            host: host.to_string(),
            protocol: Protocol::Https,
            is_active: true,
            pass_query_params: false,
            random_suffix_length: 0,
            enable_checksum: false,
            enable_xor_obfuscation: false,
            xor_secret: 0,
            xor_rot: 1,
            default_start_number: 0,
            site_name: String::new(),
            icp_number: String::new(),
            police_number: String::new(),
            description: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn create_then_find_by_host_roundtrip() {
        let store = KvDomainStore::new(InMemoryKVStore::new());
        let created = store.create(sample_domain("d.test")).unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(store.find_by_host("d.test").unwrap().unwrap().id, 1);
    }

    #[test]
    fn create_rejects_duplicate_host() {
        let store = KvDomainStore::new(InMemoryKVStore::new());
        store.create(sample_domain("d.test")).unwrap();
        let err = store.create(sample_domain("d.test")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn soft_delete_marks_inactive() {
        let store = KvDomainStore::new(InMemoryKVStore::new());
        store.create(sample_domain("d.test")).unwrap();
        store.soft_delete(1).unwrap();
        let domain = store.find_by_id(1).unwrap().unwrap();
        assert!(domain.is_deleted());
        assert!(!domain.is_active);
    }

    #[test]
    fn soft_delete_frees_the_host_for_reuse() {
        let store = KvDomainStore::new(InMemoryKVStore::new());
        store.create(sample_domain("d.test")).unwrap();
        store.soft_delete(1).unwrap();

        assert!(store.find_by_host("d.test").unwrap().is_none());
        let recreated = store.create(sample_domain("d.test")).unwrap();
        assert_eq!(recreated.id, 2);
    }
}
