//! # Short-link gateway entry point
//!
//! Boots structured logging, builds [`AppState`] over the configured
//! storage/issuer backends, seeds C3 from existing links (restart
//! recovery), and serves the redirect and management routes.

use anyhow::Result;
use gateway_runtime::{build_state, routes, seed_issuer_on_startup, GatewayConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GatewayConfig::from_env();
    config.validate_for_production();

    info!(
        bind_addr = %config.server.bind_addr,
        port = config.server.port,
        storage_backend = %config.storage.backend,
        issuer_backend = %config.issuer.backend,
        "starting short-link gateway"
    );

    let state = build_state(&config);
    seed_issuer_on_startup(&state)?;

    let addr = format!("{}:{}", config.server.bind_addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    let app = routes::router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
