//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SHELLCACHE_*)
//! 2. TOML config file (if SHELLCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::cache::CacheVersion;

mod validation;

pub use validation::ConfigError;

/// Shell assets of the developmomentum site, in install order.
pub const DEFAULT_SHELL_ASSETS: &[&str] = &[
    "site.webmanifest",
    "browserconfig.xml",
    "assets/images/android-chrome-192x192.png",
    "assets/images/android-chrome-512x512.png",
    "assets/images/apple-touch-icon.png",
    "assets/images/favicon.ico",
    "assets/images/favicon-32x32.png",
    "assets/images/favicon-16x16.png",
    "assets/images/mstile-70x70.png",
    "assets/images/mstile-144x144.png",
    "assets/images/mstile-150x150.png",
    "assets/images/mstile-310x150.png",
    "assets/images/mstile-310x310.png",
    "assets/images/safari-pinned-tab.svg",
    "assets/images/logo.svg",
    "assets/fonts/dm-serif-display-v4-latin-regular.woff",
    "assets/fonts/dm-serif-display-v4-latin-regular.woff2",
    "assets/fonts/open-sans-v16-latin-regular.woff",
    "assets/fonts/open-sans-v16-latin-regular.woff2",
    "assets/fonts/questrial-v9-latin-regular.woff",
    "assets/fonts/questrial-v9-latin-regular.woff2",
    "assets/bootstrap/bootstrap.css",
    "assets/css/styles.css",
    "assets/js/themes.js",
    "offline.html",
];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SHELLCACHE_*)
/// 2. TOML config file (if SHELLCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite cache storage.
    ///
    /// Set via SHELLCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Prefix of every cache generation name.
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Shell version. Bumping it installs a fresh cache and evicts the old one.
    ///
    /// Set via SHELLCACHE_VERSION environment variable.
    #[serde(default = "default_version")]
    pub version: String,

    /// Base URL that shell asset paths and relative request URLs resolve against.
    #[serde(default = "default_scope_url")]
    pub scope_url: String,

    /// Path of the offline fallback page, relative to the scope.
    #[serde(default = "default_offline_page")]
    pub offline_page: String,

    /// Paths cached at install time, relative to the scope.
    #[serde(default = "default_shell_assets")]
    pub shell_assets: Vec<String>,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Deadline for the network leg of a navigation, after which the
    /// offline page is served. Unset means rely on `timeout_ms` alone.
    #[serde(default)]
    pub navigation_timeout_ms: Option<u64>,

    /// Maximum bytes to fetch per request.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./shellcache.sqlite")
}

fn default_cache_prefix() -> String {
    "developmomentum-offline-v".into()
}

fn default_version() -> String {
    "1.0.0".into()
}

fn default_scope_url() -> String {
    "http://localhost:5080/".into()
}

fn default_offline_page() -> String {
    "offline.html".into()
}

fn default_shell_assets() -> Vec<String> {
    DEFAULT_SHELL_ASSETS.iter().map(|s| s.to_string()).collect()
}

fn default_user_agent() -> String {
    "shellcache/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_max_redirects() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            cache_prefix: default_cache_prefix(),
            version: default_version(),
            scope_url: default_scope_url(),
            offline_page: default_offline_page(),
            shell_assets: default_shell_assets(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            navigation_timeout_ms: None,
            max_bytes: default_max_bytes(),
            max_redirects: default_max_redirects(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn navigation_timeout(&self) -> Option<Duration> {
        self.navigation_timeout_ms.map(Duration::from_millis)
    }

    /// The cache generation this configuration installs.
    pub fn cache_version(&self) -> CacheVersion {
        CacheVersion::new(&self.cache_prefix, &self.version)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SHELLCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SHELLCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./shellcache.sqlite"));
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.offline_page, "offline.html");
        assert_eq!(config.shell_assets.len(), DEFAULT_SHELL_ASSETS.len());
        assert_eq!(config.timeout_ms, 20_000);
        assert!(config.navigation_timeout_ms.is_none());
    }

    #[test]
    fn test_default_shell_includes_offline_page() {
        let config = AppConfig::default();
        assert!(config.shell_assets.contains(&config.offline_page));
    }

    #[test]
    fn test_cache_version_name() {
        let config = AppConfig { version: "2.1.0".into(), ..Default::default() };
        assert_eq!(config.cache_version().name(), "developmomentum-offline-v2.1.0");
    }

    #[test]
    fn test_timeouts() {
        let config = AppConfig { navigation_timeout_ms: Some(3_000), ..Default::default() };
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.navigation_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_load_from_toml_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("shellcache.toml", "version = \"3.0.0\"\nshell_assets = [\"offline.html\"]\n")?;
            jail.set_env("SHELLCACHE_CONFIG_FILE", "shellcache.toml");
            jail.set_env("SHELLCACHE_SCOPE_URL", "https://developmomentum.com/");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.version, "3.0.0");
            assert_eq!(config.shell_assets, vec!["offline.html".to_string()]);
            assert_eq!(config.scope_url, "https://developmomentum.com/");
            Ok(())
        });
    }
}
