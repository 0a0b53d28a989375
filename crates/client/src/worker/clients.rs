//! Clients the worker may control.

use std::collections::HashMap;

use tokio::sync::RwLock;

/// Registry of in-scope clients and the cache generation controlling each.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    controllers: RwLock<HashMap<String, Option<String>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client. It stays uncontrolled until the next claim.
    pub async fn register(&self, id: impl Into<String>) {
        self.controllers.write().await.entry(id.into()).or_insert(None);
    }

    pub async fn unregister(&self, id: &str) {
        self.controllers.write().await.remove(id);
    }

    /// Take control of every registered client without waiting for a reload.
    ///
    /// Returns how many clients are now controlled by `cache_name`.
    pub async fn claim(&self, cache_name: &str) -> usize {
        let mut controllers = self.controllers.write().await;
        for controller in controllers.values_mut() {
            *controller = Some(cache_name.to_string());
        }
        controllers.len()
    }

    pub async fn controller(&self, id: &str) -> Option<String> {
        self.controllers.read().await.get(id).cloned().flatten()
    }

    /// Number of clients controlled by `cache_name`.
    pub async fn controlled_by(&self, cache_name: &str) -> usize {
        self.controllers
            .read()
            .await
            .values()
            .filter(|c| c.as_deref() == Some(cache_name))
            .count()
    }
}
