//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `cache_prefix`, `version`, `offline_page` or `shell_assets` is empty
    /// - `scope_url` is not an absolute http(s) URL
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `navigation_timeout_ms` is set below 100ms
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_prefix.is_empty() {
            return Err(invalid("cache_prefix", "must not be empty"));
        }
        if self.version.trim().is_empty() {
            return Err(invalid("version", "must not be empty"));
        }

        match url::Url::parse(&self.scope_url) {
            Ok(scope) if matches!(scope.scheme(), "http" | "https") => {}
            Ok(_) => return Err(invalid("scope_url", "must use http or https")),
            Err(e) => return Err(invalid("scope_url", &e.to_string())),
        }

        if self.offline_page.trim().is_empty() {
            return Err(invalid("offline_page", "must not be empty"));
        }
        if self.shell_assets.is_empty() {
            return Err(invalid("shell_assets", "must list at least one asset"));
        }
        if self.shell_assets.iter().any(|a| a.trim().is_empty()) {
            return Err(invalid("shell_assets", "must not contain empty paths"));
        }

        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }
        if let Some(ms) = self.navigation_timeout_ms
            && ms < 100
        {
            return Err(invalid("navigation_timeout_ms", "must be at least 100ms"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if !self.shell_assets.contains(&self.offline_page) {
            tracing::warn!(
                offline_page = %self.offline_page,
                "offline page is not a shell asset; offline navigations will get the inline fallback"
            );
        }

        Ok(())
    }
}
