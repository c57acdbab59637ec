//! # Inbound port: the experiment store (C6).

use shared_types::{ABTest, ABTestClickStatistic, ABTestVariant};

use crate::domain::{AnalyticsSummary, StoreError};

pub trait ExperimentStore: Send + Sync {
    fn create_experiment(&self, experiment: ABTest) -> Result<ABTest, StoreError>;
    fn find_experiment_by_id(&self, id: u64) -> Result<Option<ABTest>, StoreError>;
    fn update_experiment(&self, experiment: ABTest) -> Result<ABTest, StoreError>;
    /// Cascades to the experiment's variants inside the same write.
    fn delete_experiment(&self, id: u64) -> Result<(), StoreError>;
    /// All experiments, for the management API's `GET /ab_tests` list view.
    fn list_experiments(&self) -> Result<Vec<ABTest>, StoreError>;

    fn create_variant(&self, variant: ABTestVariant) -> Result<ABTestVariant, StoreError>;
    fn find_variants_by_experiment(&self, ab_test_id: u64) -> Result<Vec<ABTestVariant>, StoreError>;
    fn update_variant(&self, variant: ABTestVariant) -> Result<ABTestVariant, StoreError>;
    fn delete_variant(&self, id: u64) -> Result<(), StoreError>;

    /// The single running experiment attached to `short_link_id`, if any.
    fn find_active_experiment_for_short_link(
        &self,
        short_link_id: u64,
    ) -> Result<Option<ABTest>, StoreError>;

    fn record_click(&self, click: ABTestClickStatistic) -> Result<(), StoreError>;

    fn session_exists(
        &self,
        ab_test_id: u64,
        variant_id: u64,
        session_id: &str,
    ) -> Result<bool, StoreError>;

    fn analytics_for_experiment(&self, ab_test_id: u64) -> Result<AnalyticsSummary, StoreError>;
}

/// Lets `Arc<dyn ExperimentStore>` be handed to [`crate::ExperimentEngine`]
/// directly, so the gateway can share one store instance between the
/// engine and the management API's direct CRUD handlers.
impl<T: ExperimentStore + ?Sized> ExperimentStore for std::sync::Arc<T> {
    fn create_experiment(&self, experiment: ABTest) -> Result<ABTest, StoreError> {
        (**self).create_experiment(experiment)
    }
    fn find_experiment_by_id(&self, id: u64) -> Result<Option<ABTest>, StoreError> {
        (**self).find_experiment_by_id(id)
    }
    fn update_experiment(&self, experiment: ABTest) -> Result<ABTest, StoreError> {
        (**self).update_experiment(experiment)
    }
    fn delete_experiment(&self, id: u64) -> Result<(), StoreError> {
        (**self).delete_experiment(id)
    }
    fn list_experiments(&self) -> Result<Vec<ABTest>, StoreError> {
        (**self).list_experiments()
    }
    fn create_variant(&self, variant: ABTestVariant) -> Result<ABTestVariant, StoreError> {
        (**self).create_variant(variant)
    }
    fn find_variants_by_experiment(&self, ab_test_id: u64) -> Result<Vec<ABTestVariant>, StoreError> {
        (**self).find_variants_by_experiment(ab_test_id)
    }
    fn update_variant(&self, variant: ABTestVariant) -> Result<ABTestVariant, StoreError> {
        (**self).update_variant(variant)
    }
    fn delete_variant(&self, id: u64) -> Result<(), StoreError> {
        (**self).delete_variant(id)
    }
    fn find_active_experiment_for_short_link(
        &self,
        short_link_id: u64,
    ) -> Result<Option<ABTest>, StoreError> {
        (**self).find_active_experiment_for_short_link(short_link_id)
    }
    fn record_click(&self, click: ABTestClickStatistic) -> Result<(), StoreError> {
        (**self).record_click(click)
    }
    fn session_exists(
        &self,
        ab_test_id: u64,
        variant_id: u64,
        session_id: &str,
    ) -> Result<bool, StoreError> {
        (**self).session_exists(ab_test_id, variant_id, session_id)
    }
    fn analytics_for_experiment(&self, ab_test_id: u64) -> Result<AnalyticsSummary, StoreError> {
        (**self).analytics_for_experiment(ab_test_id)
    }
}
