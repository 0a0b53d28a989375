//! Client code for shellcache.
//!
//! This crate provides the HTTP network backend and the offline cache worker
//! built on top of the core storage.

pub mod fetch;
pub mod worker;

pub use fetch::{FetchClient, FetchConfig};
pub use worker::{
    ActivationReport, ClientRegistry, FetchOutcome, InstallReport, LifecycleState, OfflineCacheManager, ResponseSource,
    WorkerContext, WorkerSettings,
};
