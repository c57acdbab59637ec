//! # Experiment engine orchestration (C7)
//!
//! Combines session derivation, activation checks already enforced by
//! `sl-experiment-store`, deterministic variant selection, and
//! state-transition enforcement into the single surface C8 calls.

use chrono::{DateTime, Utc};
use shared_types::{ABTest, ABTestClickStatistic, ABTestStatus, ABTestVariant, TrafficSplit};
use sl_experiment_store::ExperimentStore;

use crate::domain::{derive_session_id, select_variant, EngineError};

/// The outcome of selecting a variant for one inbound request.
#[derive(Debug, Clone)]
pub struct VariantSelection {
    pub ab_test_id: u64,
    pub variant: ABTestVariant,
    pub session_id: String,
}

pub struct ExperimentEngine<S: ExperimentStore> {
    store: S,
}

impl<S: ExperimentStore> ExperimentEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns `None` when the short link has no active experiment, or
    /// when its variants all became inactive in the window between the
    /// store's activation check and this call (best-effort, not an error).
    pub fn select_for_short_link(
        &self,
        short_link_id: u64,
        ip: &str,
        user_agent: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VariantSelection>, EngineError> {
        let experiment = match self.store.find_active_experiment_for_short_link(short_link_id)? {
            Some(experiment) => experiment,
            None => return Ok(None),
        };

        let active_variants: Vec<ABTestVariant> = self
            .store
            .find_variants_by_experiment(experiment.id)?
            .into_iter()
            .filter(|v| v.is_active)
            .collect();

        if active_variants.is_empty() {
            return Ok(None);
        }

        let session_id = derive_session_id(ip, user_agent, experiment.id, now.date_naive());
        let variant = select_variant(&session_id, experiment.traffic_split, &active_variants)
            .expect("active_variants is non-empty")
            .clone();

        Ok(Some(VariantSelection {
            ab_test_id: experiment.id,
            variant,
            session_id,
        }))
    }

    /// Records an attributed click, silently dropping it if the session
    /// already has a click on this variant.
    #[allow(clippy::too_many_arguments)]
    pub fn record_click(
        &self,
        selection: &VariantSelection,
        short_link_id: u64,
        ip: String,
        user_agent: String,
        referer: String,
        query_params: String,
        click_at: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        if self.store.session_exists(
            selection.ab_test_id,
            selection.variant.id,
            &selection.session_id,
        )? {
            return Ok(());
        }

        self.store.record_click(ABTestClickStatistic {
            id: 0,
            ab_test_id: selection.ab_test_id,
            variant_id: selection.variant.id,
            short_link_id,
            ip,
            user_agent,
            referer,
            query_params,
            session_id: selection.session_id.clone(),
            click_at,
            created_at: click_at,
        })?;
        Ok(())
    }

    pub fn start_experiment(&self, id: u64, now: DateTime<Utc>) -> Result<ABTest, EngineError> {
        let mut experiment = self
            .store
            .find_experiment_by_id(id)?
            .ok_or(sl_experiment_store::StoreError::NotFound)?;

        if !experiment.status.can_transition_to(ABTestStatus::Running) {
            return Err(EngineError::IllegalTransition(
                id,
                experiment.status,
                ABTestStatus::Running,
            ));
        }

        let active_variants: Vec<ABTestVariant> = self
            .store
            .find_variants_by_experiment(id)?
            .into_iter()
            .filter(|v| v.is_active)
            .collect();
        if active_variants.len() < 2 {
            return Err(EngineError::InsufficientVariants(id));
        }

        match experiment.traffic_split {
            // Weights are assigned by the engine, not the client: floor(100/n)
            // to every variant but the last, remainder to the last.
            TrafficSplit::Equal => {
                let n = active_variants.len();
                let base = (100 / n) as u8;
                let last_weight = (100 - base as usize * (n - 1)) as u8;
                for (i, variant) in active_variants.into_iter().enumerate() {
                    let weight = if i == n - 1 { last_weight } else { base };
                    if variant.weight != weight {
                        let mut variant = variant;
                        variant.weight = weight;
                        variant.updated_at = now;
                        self.store.update_variant(variant)?;
                    }
                }
            }
            TrafficSplit::Weighted | TrafficSplit::Custom => {
                let total: u32 = active_variants.iter().map(|v| v.weight as u32).sum();
                if total != 100 {
                    return Err(EngineError::InvalidWeightSum(id, total));
                }
            }
        }

        experiment.status = ABTestStatus::Running;
        if experiment.start_time.is_none() {
            experiment.start_time = Some(now);
        }
        experiment.updated_at = now;
        Ok(self.store.update_experiment(experiment)?)
    }

    pub fn pause_experiment(&self, id: u64, now: DateTime<Utc>) -> Result<ABTest, EngineError> {
        self.transition(id, ABTestStatus::Paused, now, false)
    }

    pub fn stop_experiment(&self, id: u64, now: DateTime<Utc>) -> Result<ABTest, EngineError> {
        self.transition(id, ABTestStatus::Completed, now, true)
    }

    fn transition(
        &self,
        id: u64,
        to: ABTestStatus,
        now: DateTime<Utc>,
        set_end_time: bool,
    ) -> Result<ABTest, EngineError> {
        let mut experiment = self
            .store
            .find_experiment_by_id(id)?
            .ok_or(sl_experiment_store::StoreError::NotFound)?;

        if !experiment.status.can_transition_to(to) {
            return Err(EngineError::IllegalTransition(id, experiment.status, to));
        }

        experiment.status = to;
        if set_end_time && experiment.end_time.is_none() {
            experiment.end_time = Some(now);
        }
        experiment.updated_at = now;
        Ok(self.store.update_experiment(experiment)?)
    }
}
