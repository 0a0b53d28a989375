//! The named-cache storage seam.

use async_trait::async_trait;

use crate::{Error, Response};

/// Asynchronous named-cache store.
///
/// Each operation is atomic on its own; nothing here coordinates across calls.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the named cache if it does not exist yet.
    async fn open(&self, name: &str) -> Result<(), Error>;

    async fn has(&self, name: &str) -> Result<bool, Error>;

    /// All cache names, oldest first.
    async fn keys(&self) -> Result<Vec<String>, Error>;

    /// Delete a cache and every entry in it. Returns false if it did not exist.
    async fn delete(&self, name: &str) -> Result<bool, Error>;

    /// Look up a stored response. A missing cache is a miss, not an error.
    async fn match_request(&self, name: &str, key: &str) -> Result<Option<Response>, Error>;

    async fn put(&self, name: &str, key: &str, response: &Response) -> Result<(), Error>;

    /// Store every entry or none, creating the cache as part of the same unit.
    async fn put_all(&self, name: &str, entries: &[(String, Response)]) -> Result<(), Error>;

    /// Request keys stored in a cache, in insertion order.
    async fn entry_keys(&self, name: &str) -> Result<Vec<String>, Error>;
}
