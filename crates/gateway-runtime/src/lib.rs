//! # `gateway-runtime` — the HTTP gateway binary crate (S3)
//!
//! Wires C1-C9 behind [`GatewayConfig`] and exposes the redirect/preview
//! path and the JSON management API over axum. Split
//! into a library so the top-level `tests` crate can build a router
//! against an in-memory backend without spawning a real listener.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod util;

pub use config::GatewayConfig;
pub use state::AppState;

use std::sync::Arc;

use sl_issuer::{IdIssuer, InMemoryIssuer, RemoteCounterIssuer};
use sl_storage_kit::{InMemoryKVStore, KeyValueStore};

/// Builds the shared [`AppState`] for the configured storage and issuer
/// backends. `rocksdb` storage additionally requires the crate's
/// `rocksdb` feature.
pub fn build_state(config: &GatewayConfig) -> AppState {
    let kv: Arc<dyn KeyValueStore> = match config.storage.backend.as_str() {
        #[cfg(feature = "rocksdb")]
        "rocksdb" => Arc::new(
            sl_storage_kit::RocksDbKVStore::open(&config.storage.data_dir)
                .expect("failed to open RocksDB store at SL_DATA_DIR"),
        ),
        #[cfg(not(feature = "rocksdb"))]
        "rocksdb" => panic!("SL_STORAGE_BACKEND=rocksdb requires the gateway-runtime `rocksdb` feature"),
        _ => Arc::new(InMemoryKVStore::new()),
    };

    let issuer: Arc<dyn IdIssuer> = match config.issuer.backend.as_str() {
        "remote" => {
            let counter_store = sl_issuer::KvBackedCounterStore::new(kv.clone());
            Arc::new(RemoteCounterIssuer::new(counter_store))
        }
        _ => Arc::new(InMemoryIssuer::new()),
    };

    AppState::new(kv, issuer)
}

/// Seeds every active domain's counter from its links' `max(issuer_number)`
/// so a restarted in-memory issuer picks up where the durable store left
/// off. Idempotent: a counter already ahead of the seed value is left
/// untouched by [`IdIssuer::initialize`].
pub fn seed_issuer_on_startup(state: &AppState) -> anyhow::Result<()> {
    use sl_link_store::{DomainStore, ShortLinkStore};

    for domain in state.domain_store.list()? {
        if domain.is_deleted() || !domain.is_active {
            continue;
        }
        let max_issued = state.link_store.max_issuer_number(domain.id)?;
        let seed = max_issued.max(domain.default_start_number);
        state.issuer.initialize(domain.id, seed)?;
    }
    Ok(())
}
