//! Cache generation naming.

use std::fmt;

/// Name of one cache generation, `prefix + version`.
///
/// Bumping the version yields a new, unrelated cache; there is no
/// incremental patching between generations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheVersion {
    version: String,
    name: String,
}

impl CacheVersion {
    pub fn new(prefix: &str, version: &str) -> Self {
        Self { version: version.to_string(), name: format!("{prefix}{version}") }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// True if `cache_name` names any other generation.
    pub fn is_stale(&self, cache_name: &str) -> bool {
        cache_name != self.name
    }
}

impl fmt::Display for CacheVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
