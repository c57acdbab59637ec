//! Outbound port onto the experiment engine (C7), narrowed to the two
//! operations the resolution pipeline needs. Lets [`service::ResolutionPipeline`]
//! hold an `Arc<dyn ExperimentSelector>` instead of being generic over
//! `sl_experiment_engine::ExperimentEngine`'s own store type parameter.

use chrono::{DateTime, Utc};
use sl_experiment_engine::{EngineError, ExperimentEngine, VariantSelection};
use sl_experiment_store::ExperimentStore;

pub trait ExperimentSelector: Send + Sync {
    fn select_for_short_link(
        &self,
        short_link_id: u64,
        ip: &str,
        user_agent: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VariantSelection>, EngineError>;

    #[allow(clippy::too_many_arguments)]
    fn record_click(
        &self,
        selection: &VariantSelection,
        short_link_id: u64,
        ip: String,
        user_agent: String,
        referer: String,
        query_params: String,
        click_at: DateTime<Utc>,
    ) -> Result<(), EngineError>;
}

impl<S: ExperimentStore + Send + Sync + 'static> ExperimentSelector for ExperimentEngine<S> {
    fn select_for_short_link(
        &self,
        short_link_id: u64,
        ip: &str,
        user_agent: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VariantSelection>, EngineError> {
        ExperimentEngine::select_for_short_link(self, short_link_id, ip, user_agent, now)
    }

    fn record_click(
        &self,
        selection: &VariantSelection,
        short_link_id: u64,
        ip: String,
        user_agent: String,
        referer: String,
        query_params: String,
        click_at: DateTime<Utc>,
    ) -> Result<(), EngineError> {
        ExperimentEngine::record_click(
            self,
            selection,
            short_link_id,
            ip,
            user_agent,
            referer,
            query_params,
            click_at,
        )
    }
}
