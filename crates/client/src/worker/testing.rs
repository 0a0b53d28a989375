//! Test doubles for the worker's host primitives.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use shellcache_core::{CacheDb, CacheStorage, CacheVersion, Error, Network, Request, Response};

use super::{OfflineCacheManager, WorkerContext, WorkerSettings};

pub const SCOPE: &str = "https://developmomentum.com/";

pub fn asset_url(path: &str) -> String {
    format!("{SCOPE}{}", path.trim_start_matches('/'))
}

fn content_type_for(url: &str) -> &'static str {
    match url.rsplit('.').next() {
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("html") => "text/html",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Network that answers from a route table and records every call.
///
/// Unknown URLs resolve to a 404, like a real server would.
#[derive(Default)]
pub struct StubNetwork {
    routes: Mutex<HashMap<String, Response>>,
    failing: Mutex<HashSet<String>>,
    offline: AtomicBool,
    delay: Mutex<Option<Duration>>,
    calls: Mutex<Vec<String>>,
}

impl StubNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later fetch sleep this long before answering.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn serve(&self, url: &str, body: &str) {
        let response = Response::new(url, content_type_for(url), body);
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    /// Reject fetches of `url` as a transport failure.
    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    /// Reject every fetch.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Network for StubNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        let url = request.url.to_string();
        self.calls.lock().unwrap().push(url.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.offline.load(Ordering::SeqCst) || self.failing.lock().unwrap().contains(&url) {
            return Err(Error::Network(format!("{url}: connection refused")));
        }

        let found = self.routes.lock().unwrap().get(&url).cloned();
        Ok(found.unwrap_or_else(|| Response::new(url, "text/plain", "not found").with_status(404)))
    }
}

/// Serve a body for every path, keyed by its absolute URL.
pub fn serve_shell(network: &StubNetwork, paths: &[&str]) {
    for path in paths {
        network.serve(&asset_url(path), &format!("body of {path}"));
    }
}

/// `CacheDb` wrapper that injects failures.
pub struct FlakyStorage {
    inner: CacheDb,
    fail_delete: HashSet<String>,
    fail_match: bool,
}

impl FlakyStorage {
    pub fn new(inner: CacheDb) -> Self {
        Self { inner, fail_delete: HashSet::new(), fail_match: false }
    }

    pub fn fail_delete(mut self, name: &str) -> Self {
        self.fail_delete.insert(name.to_string());
        self
    }

    pub fn fail_match(mut self) -> Self {
        self.fail_match = true;
        self
    }
}

fn injected(op: &str) -> Error {
    Error::Storage(format!("injected {op} failure"))
}

#[async_trait]
impl CacheStorage for FlakyStorage {
    async fn open(&self, name: &str) -> Result<(), Error> {
        self.inner.open(name).await
    }

    async fn has(&self, name: &str) -> Result<bool, Error> {
        self.inner.has(name).await
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.inner.keys().await
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        if self.fail_delete.contains(name) {
            return Err(injected("delete"));
        }
        self.inner.delete(name).await
    }

    async fn match_request(&self, name: &str, key: &str) -> Result<Option<Response>, Error> {
        if self.fail_match {
            return Err(injected("match"));
        }
        self.inner.match_request(name, key).await
    }

    async fn put(&self, name: &str, key: &str, response: &Response) -> Result<(), Error> {
        self.inner.put(name, key, response).await
    }

    async fn put_all(&self, name: &str, entries: &[(String, Response)]) -> Result<(), Error> {
        self.inner.put_all(name, entries).await
    }

    async fn entry_keys(&self, name: &str) -> Result<Vec<String>, Error> {
        self.inner.entry_keys(name).await
    }
}

pub fn settings(version: &str, shell: &[&str]) -> WorkerSettings {
    WorkerSettings {
        version: CacheVersion::new("developmomentum-offline-v", version),
        scope: SCOPE.into(),
        shell_assets: shell.iter().map(|s| s.to_string()).collect(),
        offline_page: "offline.html".into(),
        navigation_timeout: None,
    }
}

pub fn manager(
    storage: Arc<dyn CacheStorage>, network: Arc<StubNetwork>, version: &str, shell: &[&str],
) -> OfflineCacheManager {
    OfflineCacheManager::new(WorkerContext::new(storage, network), settings(version, shell)).unwrap()
}
