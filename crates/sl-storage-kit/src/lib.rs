//! # Storage Kit
//!
//! A generic, ordered byte-keyed store used as the persistence substrate
//! for the short-link store (C4) and the experiment store (C6). Both
//! components layer their own secondary indexes and record serialization
//! on top of the same [`KeyValueStore`] port, the way the teacher's
//! `qc-02-block-storage` crate layers block indexing on top of its own
//! `KeyValueStore` trait.

mod errors;
mod memory;
#[cfg(feature = "rocksdb-backend")]
mod rocksdb_store;

pub use errors::KVStoreError;
pub use memory::InMemoryKVStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocksdb_store::RocksDbKVStore;

/// A single write within an [`KeyValueStore::atomic_batch_write`] call.
#[derive(Debug, Clone)]
pub enum BatchOperation {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract byte-oriented key-value store.
///
/// Production: [`RocksDbKVStore`] (feature `rocksdb-backend`).
/// Testing: [`InMemoryKVStore`].
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;
    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Either all operations apply, or none do.
    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// Iterate over keys with a given prefix, order unspecified.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;
}

/// Lets one `Arc`-wrapped store back several key-prefixed adapters (the
/// short-link store, the domain store, and the experiment store all share
/// one physical keyspace via distinct key prefixes) without each adapter
/// taking ownership of the underlying store.
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        (**self).delete(key)
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        (**self).atomic_batch_write(operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        (**self).exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        (**self).prefix_scan(prefix)
    }
}
