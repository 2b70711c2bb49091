use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable that overrides `api.base_url`.
pub const BASE_URL_ENV: &str = "FLICKTURE_API_BASE_URL";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub notifications: NotificationConfig,
}

/// Settings for the request client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root address of the remote API. Call sites pass paths relative to it.
    pub base_url: String,
    /// Per-attempt timeout; an attempt that exceeds it counts as a transient failure.
    pub timeout_ms: u64,
    /// Retries allowed per logical request after the first attempt.
    pub max_retries: u32,
    /// Backoff unit. Retry `n` waits `n * retry_base_delay_ms`.
    pub retry_base_delay_ms: u64,
    /// Scheme placed before the token in the `Authorization` header.
    pub auth_scheme: String,
    /// Where a rejected session is sent to log in again.
    pub login_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub auto_dismiss_secs: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

impl NotificationConfig {
    pub fn auto_dismiss(&self) -> Duration {
        Duration::from_secs(self.auto_dismiss_secs)
    }
}

impl AppConfig {
    /// Load config: user file if it exists, otherwise built-in defaults.
    /// `FLICKTURE_API_BASE_URL` wins over both.
    pub fn load() -> Result<Self, CoreError> {
        let config = Self::load_from(&Self::config_path())?;
        Ok(config.with_base_url_override(std::env::var(BASE_URL_ENV).ok()))
    }

    /// Load from an explicit path, falling back to defaults when it is missing.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        if path.exists() {
            let user_str =
                std::fs::read_to_string(path).map_err(|e| CoreError::Config(e.to_string()))?;
            toml::from_str(&user_str).map_err(|e| CoreError::Config(e.to_string()))
        } else {
            toml::from_str(DEFAULT_CONFIG).map_err(|e| CoreError::Config(e.to_string()))
        }
    }

    /// Replace the base URL when an override is present and non-blank.
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            tracing::debug!(base_url = %url, "Using base URL from environment");
            self.api.base_url = url;
        }
        self
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Path to the persisted credential file.
    pub fn credentials_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("credentials.json"))
            .unwrap_or_else(|| PathBuf::from("credentials.json"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "flickture")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000/api/v1");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.api.max_retries, 3);
        assert_eq!(config.api.retry_base_delay(), Duration::from_millis(1000));
        assert_eq!(config.api.auth_scheme, "Bearer");
        assert_eq!(config.api.login_path, "/login");
        assert_eq!(config.notifications.auto_dismiss(), Duration::from_secs(5));
    }

    #[test]
    fn test_roundtrip() {
        let config = AppConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.api.base_url, config.api.base_url);
        assert_eq!(deserialized.api.max_retries, config.api.max_retries);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.api.timeout_ms, 10_000);
    }

    #[test]
    fn test_save_then_load_user_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.api.max_retries = 5;
        config.api.auth_scheme = "Token".into();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.api.max_retries, 5);
        assert_eq!(loaded.api.auth_scheme, "Token");
    }

    #[test]
    fn test_invalid_user_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(CoreError::Config(_))
        ));
    }

    #[test]
    fn test_base_url_override() {
        let config =
            AppConfig::default().with_base_url_override(Some("https://api.example.com".into()));
        assert_eq!(config.api.base_url, "https://api.example.com");

        let config = AppConfig::default().with_base_url_override(Some("   ".into()));
        assert_eq!(config.api.base_url, "http://localhost:8000/api/v1");
    }
}
