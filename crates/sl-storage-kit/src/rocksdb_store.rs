use std::path::Path;

use rocksdb::{WriteBatch, DB};

use crate::{BatchOperation, KVStoreError, KeyValueStore, ScanResult};

/// Production [`KeyValueStore`] backed by RocksDB.
///
/// `RocksDB` already serializes writes internally, so `atomic_batch_write`
/// maps directly onto a single `WriteBatch` commit rather than needing an
/// extra application-level lock.
pub struct RocksDbKVStore {
    db: DB,
}

impl RocksDbKVStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        let db = DB::open_default(path).map_err(|e| KVStoreError::Io(e.to_string()))?;
        Ok(Self { db })
    }
}

impl KeyValueStore for RocksDbKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        self.db
            .get(key)
            .map_err(|e| KVStoreError::Io(e.to_string()))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.db
            .put(key, value)
            .map_err(|e| KVStoreError::Io(e.to_string()))
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.db
            .delete(key)
            .map_err(|e| KVStoreError::Io(e.to_string()))
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => batch.put(key, value),
                BatchOperation::Delete { key } => batch.delete(key),
            }
        }
        self.db
            .write(batch)
            .map_err(|e| KVStoreError::Io(e.to_string()))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        let mut out = Vec::new();
        let iter = self.db.prefix_iterator(prefix);
        for item in iter {
            let (key, value) = item.map_err(|e| KVStoreError::Io(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key.to_vec(), value.to_vec()));
        }
        Ok(out)
    }
}
