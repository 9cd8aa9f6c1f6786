//! stugate-rp (Records Proxy) - aggregation proxy for academic records
//!
//! Authenticates the caller from the signed session cookie, fans out to the
//! upstream academic-records service per resource, normalizes the payloads,
//! and serves them from a per-user tiered cache.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use stugate_common::TieredCache;
use stugate_rp::config::{Cli, Config};
use stugate_rp::fetch::RecordsService;
use stugate_rp::upstream::HttpUpstream;
use stugate_rp::{build_router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting stugate Records Proxy (stugate-rp) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    info!("Upstream: {}", config.upstream_base_url);
    info!(
        "Cache TTLs: short {}s, long {}s",
        config.short_ttl_secs, config.long_ttl_secs
    );
    info!(
        "Upstream timeouts: data {}s, discovery {}s",
        config.upstream_timeout_secs, config.discovery_timeout_secs
    );

    let upstream = Arc::new(HttpUpstream::new(
        &config.upstream_base_url,
        config.upstream_timeout(),
    ));
    let records = Arc::new(RecordsService::new(
        upstream,
        Arc::new(TieredCache::new(config.short_ttl())),
        Arc::new(TieredCache::new(config.long_ttl())),
        config.upstream_timeout(),
        config.discovery_timeout(),
    ));

    let state = AppState::new(records);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("stugate-rp listening on http://{}", config.bind_addr);
    info!("Health check: http://{}/health", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
