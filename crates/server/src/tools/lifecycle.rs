//! sw_install, sw_activate and sw_status tool implementations.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::OfflineCacheManager;
use shellcache_core::CacheStorage;

use super::json_result;

/// Output from the sw_status tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SwStatusOutput {
    /// Lifecycle state: uninstalled, installing, installed, activating or active.
    pub state: String,
    /// Name of the cache generation this worker installs and serves.
    pub cache_name: String,
    /// Every cache generation currently in storage, oldest first.
    pub caches: Vec<String>,
    /// Clients controlled by this worker's cache.
    pub controlled_clients: usize,
}

/// Implementation of the sw_install tool.
pub async fn install_impl(worker: &OfflineCacheManager) -> Result<CallToolResult, McpError> {
    let report = worker.on_install().await?;
    json_result(&report)
}

/// Implementation of the sw_activate tool.
pub async fn activate_impl(worker: &OfflineCacheManager) -> Result<CallToolResult, McpError> {
    let report = worker.on_activate().await?;
    json_result(&report)
}

/// Implementation of the sw_status tool.
pub async fn status_impl(worker: &OfflineCacheManager) -> Result<CallToolResult, McpError> {
    let cache_name = worker.version().name().to_string();
    let ctx = worker.context();
    let output = SwStatusOutput {
        state: worker.state().await.as_str().to_string(),
        caches: ctx.storage.keys().await?,
        controlled_clients: ctx.clients.controlled_by(&cache_name).await,
        cache_name,
    };
    json_result(&output)
}
