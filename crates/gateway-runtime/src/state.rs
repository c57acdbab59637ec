//! # Application state
//!
//! Wires C1-C9 into the handful of shared handles axum's extractors pass to
//! every route, mirroring how `node-runtime`'s `SubsystemContainer` holds
//! one instance of every subsystem behind the ports it implements.

use std::sync::Arc;

use sl_experiment_engine::ExperimentEngine;
use sl_experiment_store::ExperimentStore;
use sl_issuance::IssuancePipeline;
use sl_issuer::IdIssuer;
use sl_link_store::{ClickStatisticStore, DomainStore, ShortLinkStore};
use sl_resolution::{ExperimentSelector, ResolutionPipeline};
use sl_resolver_cache::ResolverCache;
use sl_storage_kit::KeyValueStore;

#[derive(Clone)]
pub struct AppState {
    pub issuance: Arc<IssuancePipeline>,
    pub resolution: Arc<ResolutionPipeline>,
    pub domain_store: Arc<dyn DomainStore>,
    pub link_store: Arc<dyn ShortLinkStore>,
    pub click_store: Arc<dyn ClickStatisticStore>,
    pub experiment_store: Arc<dyn ExperimentStore>,
    pub experiment_engine: Arc<ExperimentEngine<Arc<dyn ExperimentStore>>>,
    pub cache: Arc<dyn ResolverCache>,
    pub issuer: Arc<dyn IdIssuer>,
}

impl AppState {
    /// Build every component over the given [`KeyValueStore`] and issuer
    /// backend. `kv` is cloned (cheaply — callers pass an `Arc<dyn
    /// KeyValueStore>`) into each adapter that needs durable storage, since
    /// C4 and C6 share one physical keyspace via distinct key prefixes.
    pub fn new(kv: Arc<dyn KeyValueStore>, issuer: Arc<dyn IdIssuer>) -> Self {
        let domain_store: Arc<dyn DomainStore> =
            Arc::new(sl_link_store::KvDomainStore::new(kv.clone()));
        let link_store: Arc<dyn ShortLinkStore> =
            Arc::new(sl_link_store::KvShortLinkStore::new(kv.clone()));
        let click_store: Arc<dyn ClickStatisticStore> =
            Arc::new(sl_link_store::KvClickStatisticStore::new(kv.clone()));
        let experiment_store: Arc<dyn ExperimentStore> =
            Arc::new(sl_experiment_store::KvExperimentStore::new(kv.clone()));
        let cache: Arc<dyn ResolverCache> = Arc::new(sl_resolver_cache::InMemoryTtlCache::new());

        let experiment_engine = Arc::new(ExperimentEngine::new(experiment_store.clone()));
        let selector: Arc<dyn ExperimentSelector> = experiment_engine.clone();

        let resolution = Arc::new(ResolutionPipeline::new(
            cache.clone(),
            link_store.clone(),
            domain_store.clone(),
            click_store.clone(),
            selector,
        ));

        let issuance = Arc::new(IssuancePipeline::new(
            issuer.clone(),
            link_store.clone(),
            domain_store.clone(),
            cache.clone(),
        ));

        Self {
            issuance,
            resolution,
            domain_store,
            link_store,
            click_store,
            experiment_store,
            experiment_engine,
            cache,
            issuer,
        }
    }
}
