//! SQLite-backed named-cache storage.
//!
//! This module provides the storage half of the offline worker: a set of
//! named caches, each mapping request keys to stored responses. It supports:
//!
//! - Atomic bulk population (all entries or none)
//! - Cascade deletion of a whole cache generation
//! - Automatic schema migrations
//! - WAL mode for concurrent readers

pub mod connection;
pub mod entries;
pub mod hash;
pub mod migrations;
pub mod storage;
pub mod version;

pub use crate::Error;

pub use connection::CacheDb;
pub use storage::CacheStorage;
pub use version::CacheVersion;
