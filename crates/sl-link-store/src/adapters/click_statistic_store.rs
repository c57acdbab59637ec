//! KeyValueStore-backed `ClickStatisticStore` adapter.
//!
//! Layout: `click:id:{id}` -> bincode(ClickStatistic), `click:by_link:
//! {short_link_id}:{id}` -> `()` secondary index, `click:next_id` ->
//! sequence. No dedup key, unlike the experiment store's click log.

use parking_lot::Mutex;
use shared_types::ClickStatistic;
use sl_storage_kit::{BatchOperation, KeyValueStore};

use crate::domain::StoreError;
use crate::ports::ClickStatisticStore;

const PREFIX_ID: &[u8] = b"click:id:";
const PREFIX_BY_LINK: &[u8] = b"click:by_link:";
const KEY_NEXT_ID: &[u8] = b"click:next_id";

fn id_key(id: u64) -> Vec<u8> {
    [PREFIX_ID, &id.to_be_bytes()].concat()
}

fn by_link_key(short_link_id: u64, id: u64) -> Vec<u8> {
    [PREFIX_BY_LINK, &short_link_id.to_be_bytes(), b":", &id.to_be_bytes()].concat()
}

fn by_link_prefix(short_link_id: u64) -> Vec<u8> {
    [PREFIX_BY_LINK, &short_link_id.to_be_bytes()[..], b":"].concat()
}

pub struct KvClickStatisticStore<S: KeyValueStore> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> KvClickStatisticStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }
}

impl<S: KeyValueStore> ClickStatisticStore for KvClickStatisticStore<S> {
    fn record(&self, mut click: ClickStatistic) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let current = self
            .store
            .get(KEY_NEXT_ID)?
            .map(|bytes| {
                let arr: [u8; 8] = bytes.as_slice().try_into().unwrap_or([0; 8]);
                u64::from_be_bytes(arr)
            })
            .unwrap_or(0);
        click.id = current + 1;
        self.store.put(KEY_NEXT_ID, &click.id.to_be_bytes())?;

        let record = bincode::serialize(&click).map_err(|e| StoreError::StorageError(e.to_string()))?;
        self.store.atomic_batch_write(vec![
            BatchOperation::put(id_key(click.id), record),
            BatchOperation::put(by_link_key(click.short_link_id, click.id), Vec::new()),
        ])?;
        Ok(())
    }

    fn list_for_short_link(&self, short_link_id: u64) -> Result<Vec<ClickStatistic>, StoreError> {
        let mut clicks = Vec::new();
        for (key, _) in self.store.prefix_scan(&by_link_prefix(short_link_id))? {
            let id_bytes = &key[key.len() - 8..];
            let arr: [u8; 8] = id_bytes
                .try_into()
                .map_err(|_| StoreError::StorageError("corrupt click index key".to_string()))?;
            if let Some(bytes) = self.store.get(&id_key(u64::from_be_bytes(arr)))? {
                clicks.push(
                    bincode::deserialize(&bytes).map_err(|e| StoreError::StorageError(e.to_string()))?,
                );
            }
        }
        clicks.sort_by_key(|c| c.id);
        Ok(clicks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sl_storage_kit::InMemoryKVStore;

    #[test]
    fn record_then_list_for_short_link() {
        let store = KvClickStatisticStore::new(InMemoryKVStore::new());
        store
            .record(ClickStatistic {
                id: 0,
                short_link_id: 1,
                ip: "127.0.0.1".to_string(),
                user_agent: "ua".to_string(),
                referer: String::new(),
                query_params: String::new(),
                click_at: Utc::now(),
            })
            .unwrap();
        store
            .record(ClickStatistic {
                id: 0,
                short_link_id: 2,
                ip: "127.0.0.2".to_string(),
                user_agent: "ua".to_string(),
                referer: String::new(),
                query_params: String::new(),
                click_at: Utc::now(),
            })
            .unwrap();

        let clicks = store.list_for_short_link(1).unwrap();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].ip, "127.0.0.1");
    }
}
