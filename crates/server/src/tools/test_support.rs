//! Shared fixtures for tool tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use shellcache_client::{OfflineCacheManager, WorkerContext, WorkerSettings};
use shellcache_core::{AppConfig, CacheDb, Error, Network, Request, Response};

pub const SCOPE: &str = "https://developmomentum.com/";

/// Network serving a fixed route table; everything else is a 404.
#[derive(Default)]
pub struct StaticNetwork {
    routes: HashMap<String, String>,
    offline: AtomicBool,
}

impl StaticNetwork {
    pub fn with_paths(paths: &[&str]) -> Self {
        let routes = paths
            .iter()
            .map(|p| (format!("{SCOPE}{p}"), format!("body of {p}")))
            .collect();
        Self { routes, offline: AtomicBool::new(false) }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

#[async_trait]
impl Network for StaticNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network("offline".into()));
        }
        let url = request.url.to_string();
        Ok(match self.routes.get(&url) {
            Some(body) => Response::new(url, "text/html", body.as_str()),
            None => Response::new(url, "text/plain", "not found").with_status(404),
        })
    }
}

pub const SHELL: &[&str] = &["assets/css/styles.css", "offline.html"];

/// Uninstalled worker over an in-memory cache and a network serving `SHELL`.
pub async fn worker(version: &str) -> (Arc<OfflineCacheManager>, CacheDb, Arc<StaticNetwork>) {
    let db = CacheDb::open_in_memory().await.unwrap();
    let network = Arc::new(StaticNetwork::with_paths(SHELL));
    let worker = worker_on(db.clone(), network.clone(), version);
    (worker, db, network)
}

pub fn worker_on(db: CacheDb, network: Arc<StaticNetwork>, version: &str) -> Arc<OfflineCacheManager> {
    let config = AppConfig {
        version: version.into(),
        scope_url: SCOPE.into(),
        shell_assets: SHELL.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };
    let ctx = WorkerContext::new(Arc::new(db), network);
    Arc::new(OfflineCacheManager::new(ctx, WorkerSettings::from(&config)).unwrap())
}
