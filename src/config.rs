// Configuration management

use crate::error::{OpsdashError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "OPSDASH_API_URL";
pub const ENV_API_VERSION: &str = "OPSDASH_API_VERSION";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "OPSDASH_REQUEST_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "OPSDASH_LOG_LEVEL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    pub ui: UiConfig,
}

/// Backend connection settings consumed by the HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub version: String,
    pub timeout_ms: u64,
    pub retry_delay_ms: u64,
    pub max_retries: usize,
    pub retryable_statuses: Vec<u16>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            version: "v1".to_string(),
            timeout_ms: 30_000,
            retry_delay_ms: 1_000,
            max_retries: 1,
            retryable_statuses: vec![502, 503, 504],
        }
    }
}

impl ApiConfig {
    /// Root every service path is appended to, e.g. `http://host/api/v1`
    pub fn api_root(&self) -> String {
        format!(
            "{}/api/{}",
            self.base_url.trim_end_matches('/'),
            self.version.trim_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub login_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub capacity: usize,
    pub persisted_entries: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            capacity: 1000,
            persisted_entries: 100,
        }
    }
}

/// Settings for the hosting dashboard; the client never reads these
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub alert_poll_secs: u64,
    pub topology_poll_secs: u64,
    pub features: BTreeMap<String, bool>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            alert_poll_secs: 30,
            topology_poll_secs: 60,
            features: BTreeMap::from([("ai_analysis".to_string(), true)]),
        }
    }
}

impl UiConfig {
    pub fn feature_enabled(&self, name: &str) -> bool {
        self.features.get(name).copied().unwrap_or(false)
    }
}

impl Config {
    /// Get default config path: ~/.config/opsdash/config.yaml
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("opsdash").join("config.yaml"))
    }

    /// Load config from path, falling back to defaults if not found,
    /// then apply environment overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| Self::default_path().unwrap_or_default());

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&contents)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.is_empty()) {
            self.api.base_url = url;
        }
        if let Some(version) = lookup(ENV_API_VERSION).filter(|v| !v.is_empty()) {
            self.api.version = version;
        }
        if let Some(timeout) = lookup(ENV_REQUEST_TIMEOUT_MS).filter(|v| !v.is_empty()) {
            self.api.timeout_ms = timeout.trim().parse().map_err(|_| {
                OpsdashError::Config(format!(
                    "{} must be a number of milliseconds, got '{}'",
                    ENV_REQUEST_TIMEOUT_MS, timeout
                ))
            })?;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Save config to path
    pub fn save(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}
