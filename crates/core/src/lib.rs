//! Core types and shared functionality for shellcache.
//!
//! This crate provides:
//! - Named-cache storage with SQLite backend
//! - Request/response model and the `Network` seam
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod network;
pub mod request;

pub use cache::{CacheDb, CacheStorage, CacheVersion};
pub use config::AppConfig;
pub use error::Error;
pub use network::Network;
pub use request::{Request, RequestMode, Response};
