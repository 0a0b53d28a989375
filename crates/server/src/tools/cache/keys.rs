//! cache_keys tool implementation.
//!
//! Lists every cache generation in storage.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use shellcache_client::OfflineCacheManager;
use shellcache_core::CacheStorage;

use crate::tools::json_result;

/// One cache generation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKey {
    pub name: String,
    /// True for the generation this worker serves from.
    pub current: bool,
}

/// Output from the cache_keys tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysOutput {
    pub caches: Vec<CacheKey>,
}

/// Implementation of the cache_keys tool.
pub async fn keys_impl(worker: &OfflineCacheManager) -> Result<CallToolResult, McpError> {
    let names = worker.context().storage.keys().await?;
    let caches = names
        .into_iter()
        .map(|name| CacheKey { current: !worker.version().is_stale(&name), name })
        .collect();
    json_result(&CacheKeysOutput { caches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::result_json;
    use crate::tools::test_support::worker;

    #[tokio::test]
    async fn test_keys_marks_current() {
        let (worker, db, _net) = worker("1.0.0").await;
        db.open("developmomentum-offline-v0.9.0").await.unwrap();
        worker.on_install().await.unwrap();

        let output: CacheKeysOutput = serde_json::from_value(result_json(&keys_impl(&worker).await.unwrap())).unwrap();
        assert_eq!(output.caches.len(), 2);
        assert_eq!(output.caches[0].name, "developmomentum-offline-v0.9.0");
        assert!(!output.caches[0].current);
        assert_eq!(output.caches[1].name, "developmomentum-offline-v1.0.0");
        assert!(output.caches[1].current);
    }
}
