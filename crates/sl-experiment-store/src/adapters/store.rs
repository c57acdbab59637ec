//! KeyValueStore-backed `ExperimentStore` adapter.
//!
//! Layout:
//!
//! - `exp:id:{id}` -> bincode(ABTest); `exp:next_id` -> sequence.
//! - `exp:by_link:{short_link_id}:{id}` -> `()` — secondary index scanned
//!   by [`KvExperimentStore::find_active_experiment_for_short_link`].
//! - `variant:id:{id}` -> bincode(ABTestVariant); `variant:next_id`.
//! - `variant:by_exp:{ab_test_id}:{id}` -> `()` — secondary index.
//! - `click:id:{id}` -> bincode(ABTestClickStatistic); `click:next_id`.
//! - `click:session:{ab_test_id}:{variant_id}:{session_id}` -> `()` —
//!   dedup marker for `session_exists`.
//!
//! One mutex serializes mutating calls, same rationale as
//! `sl-link-store`'s adapters: index maintenance spans multiple keys and
//! `KeyValueStore` offers no cross-key transaction.

use parking_lot::Mutex;
use shared_types::{ABTest, ABTestClickStatistic, ABTestVariant};
use sl_storage_kit::{BatchOperation, KeyValueStore};

use crate::domain::{AnalyticsSummary, StoreError};
use crate::ports::ExperimentStore;

const PREFIX_EXP_ID: &[u8] = b"exp:id:";
const PREFIX_EXP_BY_LINK: &[u8] = b"exp:by_link:";
const KEY_EXP_NEXT_ID: &[u8] = b"exp:next_id";

const PREFIX_VARIANT_ID: &[u8] = b"variant:id:";
const PREFIX_VARIANT_BY_EXP: &[u8] = b"variant:by_exp:";
const KEY_VARIANT_NEXT_ID: &[u8] = b"variant:next_id";

const PREFIX_CLICK_ID: &[u8] = b"click:id:";
const PREFIX_CLICK_SESSION: &[u8] = b"click:session:";
const KEY_CLICK_NEXT_ID: &[u8] = b"click:next_id";

fn exp_id_key(id: u64) -> Vec<u8> {
    [PREFIX_EXP_ID, &id.to_be_bytes()].concat()
}

fn exp_by_link_key(short_link_id: u64, id: u64) -> Vec<u8> {
    [PREFIX_EXP_BY_LINK, &short_link_id.to_be_bytes(), b":", &id.to_be_bytes()].concat()
}

fn exp_by_link_prefix(short_link_id: u64) -> Vec<u8> {
    [PREFIX_EXP_BY_LINK, &short_link_id.to_be_bytes()[..], b":"].concat()
}

fn variant_id_key(id: u64) -> Vec<u8> {
    [PREFIX_VARIANT_ID, &id.to_be_bytes()].concat()
}

fn variant_by_exp_key(ab_test_id: u64, id: u64) -> Vec<u8> {
    [PREFIX_VARIANT_BY_EXP, &ab_test_id.to_be_bytes(), b":", &id.to_be_bytes()].concat()
}

fn variant_by_exp_prefix(ab_test_id: u64) -> Vec<u8> {
    [PREFIX_VARIANT_BY_EXP, &ab_test_id.to_be_bytes()[..], b":"].concat()
}

fn click_id_key(id: u64) -> Vec<u8> {
    [PREFIX_CLICK_ID, &id.to_be_bytes()].concat()
}

fn click_session_key(ab_test_id: u64, variant_id: u64, session_id: &str) -> Vec<u8> {
    [
        PREFIX_CLICK_SESSION,
        &ab_test_id.to_be_bytes(),
        b":",
        &variant_id.to_be_bytes(),
        b":",
        session_id.as_bytes(),
    ]
    .concat()
}

pub struct KvExperimentStore<S: KeyValueStore> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> KvExperimentStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn next_id(&self, key: &[u8]) -> Result<u64, StoreError> {
        let current = self
            .store
            .get(key)?
            .map(|bytes| {
                let arr: [u8; 8] = bytes.as_slice().try_into().unwrap_or([0; 8]);
                u64::from_be_bytes(arr)
            })
            .unwrap_or(0);
        let next = current + 1;
        self.store.put(key, &next.to_be_bytes())?;
        Ok(next)
    }

    fn scan_typed<T: serde::de::DeserializeOwned>(&self, prefix: &[u8]) -> Result<Vec<T>, StoreError> {
        self.store
            .prefix_scan(prefix)?
            .into_iter()
            .map(|(_, v)| bincode::deserialize(&v).map_err(|e| StoreError::StorageError(e.to_string())))
            .collect()
    }
}

impl<S: KeyValueStore> ExperimentStore for KvExperimentStore<S> {
    fn create_experiment(&self, mut experiment: ABTest) -> Result<ABTest, StoreError> {
        let _guard = self.write_lock.lock();
        experiment.id = self.next_id(KEY_EXP_NEXT_ID)?;
        let record = bincode::serialize(&experiment).map_err(|e| StoreError::StorageError(e.to_string()))?;
        self.store.atomic_batch_write(vec![
            BatchOperation::put(exp_id_key(experiment.id), record),
            BatchOperation::put(exp_by_link_key(experiment.short_link_id, experiment.id), Vec::new()),
        ])?;
        Ok(experiment)
    }

    fn find_experiment_by_id(&self, id: u64) -> Result<Option<ABTest>, StoreError> {
        match self.store.get(&exp_id_key(id))? {
            Some(bytes) => Ok(Some(
                bincode::deserialize(&bytes).map_err(|e| StoreError::StorageError(e.to_string()))?,
            )),
            None => Ok(None),
        }
    }

    fn update_experiment(&self, experiment: ABTest) -> Result<ABTest, StoreError> {
        let _guard = self.write_lock.lock();
        if self.store.get(&exp_id_key(experiment.id))?.is_none() {
            return Err(StoreError::NotFound);
        }
        let record = bincode::serialize(&experiment).map_err(|e| StoreError::StorageError(e.to_string()))?;
        self.store.put(&exp_id_key(experiment.id), &record)?;
        Ok(experiment)
    }

    fn delete_experiment(&self, id: u64) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let experiment: ABTest = match self.store.get(&exp_id_key(id))? {
            Some(bytes) => bincode::deserialize(&bytes).map_err(|e| StoreError::StorageError(e.to_string()))?,
            None => return Err(StoreError::NotFound),
        };

        let mut ops = vec![
            BatchOperation::delete(exp_id_key(id)),
            BatchOperation::delete(exp_by_link_key(experiment.short_link_id, id)),
        ];
        for (index_key, _) in self.store.prefix_scan(&variant_by_exp_prefix(id))? {
            let id_bytes = &index_key[index_key.len() - 8..];
            let arr: [u8; 8] = id_bytes
                .try_into()
                .map_err(|_| StoreError::StorageError("corrupt variant index key".to_string()))?;
            ops.push(BatchOperation::delete(index_key.clone()));
            ops.push(BatchOperation::delete(variant_id_key(u64::from_be_bytes(arr))));
        }
        self.store.atomic_batch_write(ops)?;
        Ok(())
    }

    fn list_experiments(&self) -> Result<Vec<ABTest>, StoreError> {
        let mut all: Vec<ABTest> = self.scan_typed(PREFIX_EXP_ID)?;
        all.sort_by_key(|e| e.id);
        Ok(all)
    }

    fn create_variant(&self, mut variant: ABTestVariant) -> Result<ABTestVariant, StoreError> {
        let _guard = self.write_lock.lock();
        variant.id = self.next_id(KEY_VARIANT_NEXT_ID)?;
        let record = bincode::serialize(&variant).map_err(|e| StoreError::StorageError(e.to_string()))?;
        self.store.atomic_batch_write(vec![
            BatchOperation::put(variant_id_key(variant.id), record),
            BatchOperation::put(variant_by_exp_key(variant.ab_test_id, variant.id), Vec::new()),
        ])?;
        Ok(variant)
    }

    fn find_variants_by_experiment(&self, ab_test_id: u64) -> Result<Vec<ABTestVariant>, StoreError> {
        // The index stores no payload; resolve ids via the index keys, then
        // fetch each full record.
        let mut variants = Vec::new();
        for (key, _) in self.store.prefix_scan(&variant_by_exp_prefix(ab_test_id))? {
            let id_bytes = &key[key.len() - 8..];
            let arr: [u8; 8] = id_bytes
                .try_into()
                .map_err(|_| StoreError::StorageError("corrupt variant index key".to_string()))?;
            if let Some(bytes) = self.store.get(&variant_id_key(u64::from_be_bytes(arr)))? {
                variants.push(
                    bincode::deserialize(&bytes).map_err(|e| StoreError::StorageError(e.to_string()))?,
                );
            }
        }
        variants.sort_by_key(|v| v.id);
        Ok(variants)
    }

    fn update_variant(&self, variant: ABTestVariant) -> Result<ABTestVariant, StoreError> {
        let _guard = self.write_lock.lock();
        if self.store.get(&variant_id_key(variant.id))?.is_none() {
            return Err(StoreError::NotFound);
        }
        let record = bincode::serialize(&variant).map_err(|e| StoreError::StorageError(e.to_string()))?;
        self.store.put(&variant_id_key(variant.id), &record)?;
        Ok(variant)
    }

    fn delete_variant(&self, id: u64) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let variant: ABTestVariant = match self.store.get(&variant_id_key(id))? {
            Some(bytes) => bincode::deserialize(&bytes).map_err(|e| StoreError::StorageError(e.to_string()))?,
            None => return Err(StoreError::NotFound),
        };
        self.store.atomic_batch_write(vec![
            BatchOperation::delete(variant_id_key(id)),
            BatchOperation::delete(variant_by_exp_key(variant.ab_test_id, id)),
        ])?;
        Ok(())
    }

    fn find_active_experiment_for_short_link(
        &self,
        short_link_id: u64,
    ) -> Result<Option<ABTest>, StoreError> {
        let now = chrono::Utc::now();
        for (key, _) in self.store.prefix_scan(&exp_by_link_prefix(short_link_id))? {
            let id_bytes = &key[key.len() - 8..];
            let arr: [u8; 8] = id_bytes
                .try_into()
                .map_err(|_| StoreError::StorageError("corrupt experiment index key".to_string()))?;
            let id = u64::from_be_bytes(arr);
            if let Some(experiment) = self.find_experiment_by_id(id)? {
                if experiment.is_time_active(now) {
                    let active_variants = self
                        .find_variants_by_experiment(id)?
                        .into_iter()
                        .filter(|v| v.is_active)
                        .count();
                    if active_variants >= 1 {
                        return Ok(Some(experiment));
                    }
                }
            }
        }
        Ok(None)
    }

    fn record_click(&self, click: ABTestClickStatistic) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock();
        let mut click = click;
        click.id = self.next_id(KEY_CLICK_NEXT_ID)?;
        let record = bincode::serialize(&click).map_err(|e| StoreError::StorageError(e.to_string()))?;
        self.store.atomic_batch_write(vec![
            BatchOperation::put(click_id_key(click.id), record),
            BatchOperation::put(
                click_session_key(click.ab_test_id, click.variant_id, &click.session_id),
                Vec::new(),
            ),
        ])?;
        Ok(())
    }

    fn session_exists(
        &self,
        ab_test_id: u64,
        variant_id: u64,
        session_id: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .store
            .exists(&click_session_key(ab_test_id, variant_id, session_id))?)
    }

    fn analytics_for_experiment(&self, ab_test_id: u64) -> Result<AnalyticsSummary, StoreError> {
        let variant_ids: std::collections::HashSet<u64> = self
            .find_variants_by_experiment(ab_test_id)?
            .into_iter()
            .map(|v| v.id)
            .collect();
        let clicks: Vec<ABTestClickStatistic> = self.scan_typed(PREFIX_CLICK_ID)?;
        let relevant: Vec<_> = clicks
            .into_iter()
            .filter(|c| c.ab_test_id == ab_test_id && variant_ids.contains(&c.variant_id))
            .collect();
        Ok(AnalyticsSummary::from_clicks(relevant.iter()))
    }
}
