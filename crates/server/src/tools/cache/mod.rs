//! Cache inspection tools.

pub mod entries;
pub mod keys;

pub use entries::{CacheEntriesParams, entries_impl};
pub use keys::keys_impl;
