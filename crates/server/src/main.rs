//! shellcache server entry point.
//!
//! Boots the offline cache worker (install, then activate) and serves it as
//! an MCP server on stdio transport. Logging goes to stderr to avoid
//! interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use shellcache_client::{FetchClient, FetchConfig, OfflineCacheManager, WorkerContext, WorkerSettings};
use shellcache_core::{AppConfig, CacheDb};
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

/// Client id under which the MCP peer is controlled by the worker.
const PEER_CLIENT: &str = "mcp-peer";

/// Run the install and activate events once at startup.
///
/// A failed install leaves the worker uninstalled; fetches pass through to
/// the network until `sw_install` succeeds.
async fn boot(worker: &OfflineCacheManager) {
    match worker.on_install().await {
        Ok(report) => tracing::info!(cache = %report.cache_name, assets = report.assets, "install complete"),
        Err(e) => {
            tracing::warn!(error = %e, "install failed; retry with sw_install");
            return;
        }
    }

    if let Err(e) = worker.on_activate().await {
        tracing::warn!(error = %e, "activation failed; retry with sw_activate");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(cache = %config.cache_version(), scope = %config.scope_url, "starting shellcache server on stdio transport");

    let db = CacheDb::open(&config.db_path).await?;
    let network = FetchClient::new(FetchConfig::from(&config))?;
    let ctx = WorkerContext::new(Arc::new(db.clone()), Arc::new(network));
    let worker = Arc::new(OfflineCacheManager::new(ctx, WorkerSettings::from(&config))?);

    worker.context().clients.register(PEER_CLIENT).await;
    boot(&worker).await;

    let handler = handler::ShellCacheServer::new(worker);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    tracing::info!("shutting down");
    db.close().await?;

    Ok(())
}
