//! Offline cache worker.
//!
//! Installs a versioned cache of shell assets, evicts every other cache
//! generation on activation, and answers intercepted requests:
//!
//! - navigations are network-first, falling back to the cached offline page
//! - everything else is cache-first, falling back to the network
//!
//! The cache is written only at install time. Upgrading the shell means
//! bumping the version, which installs a fresh generation.

pub mod clients;
pub mod fallback;
pub mod respond;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::{join_all, try_join_all};
use serde::Serialize;
use tokio::sync::RwLock;
use url::Url;

use shellcache_core::{AppConfig, CacheStorage, CacheVersion, Error, Network, Request, RequestMode};

use crate::fetch::{parse_scope, resolve};

pub use clients::ClientRegistry;
pub use respond::{FetchOutcome, ResponseSource};
pub use state::LifecycleState;

/// Host primitives the worker runs against.
///
/// Built once per process and shared by every handler.
#[derive(Clone)]
pub struct WorkerContext {
    pub storage: Arc<dyn CacheStorage>,
    pub network: Arc<dyn Network>,
    pub clients: Arc<ClientRegistry>,
}

impl WorkerContext {
    pub fn new(storage: Arc<dyn CacheStorage>, network: Arc<dyn Network>) -> Self {
        Self { storage, network, clients: Arc::new(ClientRegistry::new()) }
    }
}

/// Build-time inputs of the worker.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub version: CacheVersion,
    pub scope: String,
    pub shell_assets: Vec<String>,
    pub offline_page: String,
    pub navigation_timeout: Option<Duration>,
}

impl From<&AppConfig> for WorkerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            version: config.cache_version(),
            scope: config.scope_url.clone(),
            shell_assets: config.shell_assets.clone(),
            offline_page: config.offline_page.clone(),
            navigation_timeout: config.navigation_timeout(),
        }
    }
}

/// Outcome of a successful install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub cache_name: String,
    pub assets: usize,
}

/// Outcome of an activation.
///
/// `failed` lists stale caches that could not be deleted; they are left
/// behind but never read.
#[derive(Debug, Clone, Serialize)]
pub struct ActivationReport {
    pub cache_name: String,
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
    pub claimed: usize,
}

/// A shell asset resolved against the scope.
#[derive(Debug, Clone)]
struct ShellAsset {
    path: String,
    url: Url,
}

/// The offline cache worker for one cache generation.
pub struct OfflineCacheManager {
    ctx: WorkerContext,
    version: CacheVersion,
    scope: Url,
    shell: Vec<ShellAsset>,
    offline_key: String,
    navigation_timeout: Option<Duration>,
    state: RwLock<LifecycleState>,
}

impl OfflineCacheManager {
    /// Resolve the settings against the scope and build an uninstalled worker.
    ///
    /// Duplicate shell paths (after resolution) are cached once.
    pub fn new(ctx: WorkerContext, settings: WorkerSettings) -> Result<Self, Error> {
        let scope = parse_scope(&settings.scope).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let mut seen = HashSet::new();
        let mut shell = Vec::with_capacity(settings.shell_assets.len());
        for path in settings.shell_assets {
            let url = resolve(&scope, &path).map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))?;
            if !seen.insert(url.clone()) {
                tracing::warn!(asset = %path, "duplicate shell asset ignored");
                continue;
            }
            shell.push(ShellAsset { path, url });
        }

        let offline_url = resolve(&scope, &settings.offline_page)
            .map_err(|e| Error::InvalidUrl(format!("{}: {e}", settings.offline_page)))?;

        Ok(Self {
            ctx,
            version: settings.version,
            scope,
            shell,
            offline_key: Request::get(offline_url).cache_key(),
            navigation_timeout: settings.navigation_timeout,
            state: RwLock::new(LifecycleState::Uninstalled),
        })
    }

    pub fn context(&self) -> &WorkerContext {
        &self.ctx
    }

    pub fn version(&self) -> &CacheVersion {
        &self.version
    }

    pub fn scope(&self) -> &Url {
        &self.scope
    }

    pub async fn state(&self) -> LifecycleState {
        self.state.read().await.clone()
    }

    /// Resolve a request target (relative path or absolute URL) against the scope.
    pub fn resolve(&self, target: &str) -> Result<Url, Error> {
        resolve(&self.scope, target).map_err(|e| Error::InvalidUrl(e.to_string()))
    }

    /// Handle the install event.
    ///
    /// Fetches every shell asset and stores them in one atomic write. Any
    /// failed or non-2xx fetch fails the whole install and writes nothing.
    /// An already active worker stays active whatever the outcome.
    pub async fn on_install(&self) -> Result<InstallReport, Error> {
        let previous = {
            let mut state = self.state.write().await;
            if state.is_transitioning() {
                return Err(Error::InvalidState(format!("cannot install while {}", *state)));
            }
            let serving = state.controlling_cache().map(str::to_string);
            std::mem::replace(&mut *state, LifecycleState::Installing { serving })
        };

        tracing::info!(cache = %self.version, assets = self.shell.len(), "installing shell");

        let result = self.populate().await;
        let mut state = self.state.write().await;
        match result {
            Ok(assets) => {
                *state = match previous {
                    LifecycleState::Active(name) => LifecycleState::Active(name),
                    _ => LifecycleState::Installed(self.version.name().to_string()),
                };
                tracing::info!(cache = %self.version, assets, "shell installed");
                Ok(InstallReport { cache_name: self.version.name().to_string(), assets })
            }
            Err(e) => {
                *state = match previous {
                    LifecycleState::Active(name) => LifecycleState::Active(name),
                    _ => LifecycleState::Uninstalled,
                };
                tracing::warn!(cache = %self.version, error = %e, "shell install failed");
                Err(e)
            }
        }
    }

    async fn populate(&self) -> Result<usize, Error> {
        let fetches = self.shell.iter().map(|asset| async move {
            let request = Request::get(asset.url.clone()).with_mode(RequestMode::Cors);
            let response = self
                .ctx
                .network
                .fetch(&request)
                .await
                .map_err(|e| Error::InstallFailed { asset: asset.path.clone(), reason: e.to_string() })?;

            if !response.ok() {
                return Err(Error::InstallFailed {
                    asset: asset.path.clone(),
                    reason: format!("status {}", response.status),
                });
            }

            Ok::<_, Error>((request.cache_key(), response))
        });

        let entries = try_join_all(fetches).await?;
        self.ctx.storage.put_all(self.version.name(), &entries).await?;

        Ok(entries.len())
    }

    /// Handle the activate event.
    ///
    /// Deletes every cache generation but the current one, then claims all
    /// clients. Deletions are best effort: a failure is logged and reported
    /// but does not stop the other deletions or the claim.
    pub async fn on_activate(&self) -> Result<ActivationReport, Error> {
        {
            let mut state = self.state.write().await;
            if !matches!(*state, LifecycleState::Installed(_) | LifecycleState::Active(_)) {
                return Err(Error::InvalidState(format!("cannot activate while {}", *state)));
            }
            let serving = state.controlling_cache().map(str::to_string);
            *state = LifecycleState::Activating { serving };
        }

        let current = self.version.name();
        tracing::info!(cache = %current, "activating");

        let names = match self.ctx.storage.keys().await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!(error = %e, "could not list caches; skipping cleanup");
                Vec::new()
            }
        };

        let deletions = names
            .into_iter()
            .filter(|name| self.version.is_stale(name))
            .map(|name| async move {
                let result = self.ctx.storage.delete(&name).await;
                (name, result)
            });

        let mut deleted = Vec::new();
        let mut failed = Vec::new();
        for (name, result) in join_all(deletions).await {
            match result {
                Ok(_) => {
                    tracing::debug!(cache = %name, "deleted stale cache");
                    deleted.push(name);
                }
                Err(e) => {
                    tracing::warn!(cache = %name, error = %e, "failed to delete stale cache");
                    failed.push(name);
                }
            }
        }

        let claimed = self.ctx.clients.claim(current).await;
        *self.state.write().await = LifecycleState::Active(current.to_string());

        tracing::info!(cache = %current, deleted = deleted.len(), failed = failed.len(), claimed, "activated");

        Ok(ActivationReport { cache_name: current.to_string(), deleted, failed, claimed })
    }
}
