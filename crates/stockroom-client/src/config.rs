//! # Client Configuration
//!
//! Configuration management for the admin client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKROOM_BASE_URL=https://inventory.example.com                   │
//! │     STOCKROOM_TIMEOUT_SECS=30                                          │
//! │     STOCKROOM_NOTICE_SECS=5                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockroom/client.toml (Linux)                            │
//! │     ~/Library/Application Support/com.stockroom.stockroom/client.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://127.0.0.1:5000, no timeout, 5 second notices                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [server]
//! base_url = "http://127.0.0.1:5000"
//! timeout_secs = 30   # optional
//!
//! [notices]
//! display_secs = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Server Settings
// =============================================================================

/// Where the inventory API lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Base URL; API paths such as `/api/products` are joined onto it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds). Unset means the transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

// =============================================================================
// Notice Settings
// =============================================================================

/// How long user notices stay visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeSettings {
    #[serde(default = "default_display_secs")]
    pub display_secs: u64,
}

fn default_display_secs() -> u64 {
    5
}

impl Default for NoticeSettings {
    fn default() -> Self {
        NoticeSettings {
            display_secs: default_display_secs(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub notices: NoticeSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = Url::parse(&self.server.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "Server URL must start with http:// or https://, got: {}",
                self.server.base_url
            )));
        }

        if self.server.timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.notices.display_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "display_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the process environment in
    /// production, a map in tests).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STOCKROOM_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.server.base_url = url;
        }

        if let Some(timeout) = lookup("STOCKROOM_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.server.timeout_secs = Some(secs),
                Err(_) => warn!(value = %timeout, "Ignoring invalid STOCKROOM_TIMEOUT_SECS"),
            }
        }

        if let Some(secs) = lookup("STOCKROOM_NOTICE_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.notices.display_secs = secs,
                Err(_) => warn!(value = %secs, "Ignoring invalid STOCKROOM_NOTICE_SECS"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "stockroom")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed base URL.
    pub fn base_url(&self) -> ClientResult<Url> {
        Ok(Url::parse(&self.server.base_url)?)
    }

    /// Request timeout, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.server.timeout_secs.map(Duration::from_secs)
    }

    /// How long a notice stays visible.
    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notices.display_secs)
    }
}
