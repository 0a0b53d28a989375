//! The network seam consumed by the worker.

use async_trait::async_trait;

use crate::{Error, Request, Response};

/// Performs live network fetches on behalf of the worker.
///
/// Implementations reject only when no response could be obtained at all
/// (transport failure, timeout, oversized body). HTTP error statuses resolve
/// as ordinary responses.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}
