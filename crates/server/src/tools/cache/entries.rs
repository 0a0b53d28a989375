//! cache_entries tool implementation.
//!
//! Lists the request keys stored in one cache generation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::OfflineCacheManager;
use shellcache_core::{CacheStorage, Error};

use crate::tools::json_result;

/// Parameters for the cache_entries tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheEntriesParams {
    /// Cache name; defaults to the worker's current cache.
    #[serde(default)]
    pub cache: Option<String>,
}

/// Output from the cache_entries tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheEntriesOutput {
    pub cache: String,
    pub keys: Vec<String>,
}

/// Implementation of the cache_entries tool.
pub async fn entries_impl(worker: &OfflineCacheManager, params: CacheEntriesParams) -> Result<CallToolResult, McpError> {
    let cache = params.cache.unwrap_or_else(|| worker.version().name().to_string());
    let storage = &worker.context().storage;

    if !storage.has(&cache).await? {
        return Err(Error::CacheMiss(cache).into());
    }

    let keys = storage.entry_keys(&cache).await?;
    json_result(&CacheEntriesOutput { cache, keys })
}
