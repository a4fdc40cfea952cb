//! Storj exporter binary
//!
//! Reads its configuration from flags or `STORJ_*` environment variables,
//! then serves `/metrics` and `/status` until SIGINT or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use storj_exporter::{Config, NodeApiClient, StorjCollector, server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    for token in &config.collectors.ignored {
        warn!(collector = %token, "Ignoring unknown collector");
    }

    let base_url = config.base_url();
    info!(
        %base_url,
        payout = config.collectors.payout,
        satellites = config.collectors.satellites,
        timeout = ?config.timeout,
        "Starting Storj exporter"
    );

    let client = NodeApiClient::new(base_url, config.timeout)
        .context("Failed to create node API client")?;
    let collector = Arc::new(StorjCollector::new(
        Arc::new(client),
        config.collectors.clone(),
    ));

    let addr = config.listen_addr();
    let listener = server::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics server on {addr}"))?;

    server::serve(listener, collector, server::shutdown_signal())
        .await
        .context("Metrics server failed")?;

    info!("Exporter stopped");
    Ok(())
}
