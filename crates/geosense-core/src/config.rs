//! Client configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CoreError;
use crate::Result;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ENV_API_BASE_URL: &str = "GEOSENSE_API_BASE_URL";
const ENV_DATA_DIR: &str = "GEOSENSE_DATA_DIR";
const ENV_TIMEOUT: &str = "GEOSENSE_REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend origin, without trailing slash
    pub api_base_url: String,
    /// Path to the database file holding durable client state
    pub database_path: PathBuf,
    /// Per-request timeout for backend calls
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            database_path: data_dir.join("geosense.db"),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup(ENV_DATA_DIR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::data_dir);

        let mut config = Self::new(data_dir);

        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }

        if let Some(secs) = lookup(ENV_TIMEOUT) {
            config.request_timeout_secs = secs.trim().parse().map_err(|_| {
                CoreError::Config(format!("{} must be a whole number of seconds", ENV_TIMEOUT))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&mut self) -> Result<()> {
        let parsed = url::Url::parse(&self.api_base_url)
            .map_err(|e| CoreError::Config(format!("invalid API base URL: {}", e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CoreError::Config(format!(
                "API base URL must be http or https, got {}",
                parsed.scheme()
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CoreError::Config(
                "request timeout must be at least one second".to_string(),
            ));
        }

        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("GeoSense"))
            .unwrap_or_else(|| PathBuf::from(".geosense"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
