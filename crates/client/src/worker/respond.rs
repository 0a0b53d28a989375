//! Fetch interception strategies.

use serde::Serialize;

use shellcache_core::{CacheStorage, Error, Network, Request, Response};

use super::OfflineCacheManager;
use super::fallback::inline_offline_page;

/// Where an intercepted request's response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Cache,
    Network,
    OfflinePage,
    InlineFallback,
}

/// Response to an intercepted request.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub response: Response,
    pub source: ResponseSource,
}

impl FetchOutcome {
    fn new(response: Response, source: ResponseSource) -> Self {
        Self { response, source }
    }
}

impl OfflineCacheManager {
    /// Handle a fetch event.
    ///
    /// Until the worker is active, requests pass straight to the network and
    /// the cache is never consulted. Once active, navigations are
    /// network-first and everything else is cache-first. Nothing fetched here
    /// is written back to the cache.
    ///
    /// # Errors
    ///
    /// Navigations never fail. Other requests fail only when the cache
    /// misses and the network rejects.
    pub async fn on_fetch(&self, request: &Request) -> Result<FetchOutcome, Error> {
        let controlling = self.state.read().await.controlling_cache().map(str::to_string);

        let Some(cache_name) = controlling else {
            tracing::debug!(url = %request.url, "worker not active, passing through");
            let response = self.ctx.network.fetch(request).await?;
            return Ok(FetchOutcome::new(response, ResponseSource::Network));
        };

        if request.is_navigation() {
            Ok(self.network_first(&cache_name, request).await)
        } else {
            self.cache_first(&cache_name, request).await
        }
    }

    async fn network_first(&self, cache_name: &str, request: &Request) -> FetchOutcome {
        let attempt = match self.navigation_timeout {
            Some(deadline) => tokio::time::timeout(deadline, self.ctx.network.fetch(request))
                .await
                .unwrap_or_else(|_| {
                    Err(Error::FetchTimeout(format!("navigation exceeded {}ms", deadline.as_millis())))
                }),
            None => self.ctx.network.fetch(request).await,
        };

        match attempt {
            Ok(response) => FetchOutcome::new(response, ResponseSource::Network),
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "navigation failed, serving offline page");
                self.offline_page(cache_name, request).await
            }
        }
    }

    async fn offline_page(&self, cache_name: &str, request: &Request) -> FetchOutcome {
        match self.ctx.storage.match_request(cache_name, &self.offline_key).await {
            Ok(Some(response)) => FetchOutcome::new(response, ResponseSource::OfflinePage),
            Ok(None) => {
                tracing::warn!(cache = %cache_name, key = %self.offline_key, "offline page missing from cache");
                FetchOutcome::new(inline_offline_page(request.url.as_str()), ResponseSource::InlineFallback)
            }
            Err(e) => {
                tracing::warn!(cache = %cache_name, error = %e, "offline page lookup failed");
                FetchOutcome::new(inline_offline_page(request.url.as_str()), ResponseSource::InlineFallback)
            }
        }
    }

    async fn cache_first(&self, cache_name: &str, request: &Request) -> Result<FetchOutcome, Error> {
        // Only GET responses are ever stored.
        if request.method == "GET" {
            match self.ctx.storage.match_request(cache_name, &request.cache_key()).await {
                Ok(Some(response)) => {
                    tracing::debug!(url = %request.url, "cache hit");
                    return Ok(FetchOutcome::new(response, ResponseSource::Cache));
                }
                Ok(None) => tracing::debug!(url = %request.url, "cache miss"),
                Err(e) => tracing::warn!(url = %request.url, error = %e, "cache lookup failed, using network"),
            }
        }

        let response = self.ctx.network.fetch(request).await?;
        Ok(FetchOutcome::new(response, ResponseSource::Network))
    }
}
