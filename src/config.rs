//! Configuration Management
//!
//! Client settings persisted in the user's config directory, with
//! environment overrides.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Public Atlas API v1.0 endpoint
pub const DEFAULT_BASE_URL: &str = "https://cloud.mongodb.com/api/atlas/v1.0/";
/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "MONGODB_ATLAS_BASE_URL";
/// Environment variable naming the project (group) to query
pub const PROJECT_ID_ENV: &str = "MONGODB_ATLAS_PROJECT_ID";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Whole-request timeout; `None` waits for the server indefinitely
    #[serde(default = "default_timeout")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("atlas-client/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> Option<u64> {
    Some(DEFAULT_TIMEOUT_SECS)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ClientConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("atlas-client").join("config.json"))
    }

    /// Load configuration from disk, then apply environment overrides
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        };

        config.override_base_url(std::env::var(BASE_URL_ENV).ok());
        config
    }

    /// Load configuration from `path`; a missing or unreadable file yields the defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Replace the base URL with `value` unless it is absent or empty
    fn override_base_url(&mut self, value: Option<String>) {
        if let Some(base_url) = value.filter(|v| !v.is_empty()) {
            self.base_url = base_url;
        }
    }

    /// Parsed base URL, always ending in `/` so relative paths join below it
    pub fn base_url(&self) -> Result<Url> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        Ok(Url::parse(&base)?)
    }
}
