//! Configuration module for hubwatch

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths;
use crate::theme::{Accent, Theme};

/// OAuth app client id used for the device flow
pub const DEFAULT_CLIENT_ID: &str = "Ov23liVxTJf2IFPnmfnb";

/// Scopes requested during sign in
pub const DEFAULT_SCOPES: &str = "read:user,notifications,repo";

/// GitHub REST API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Host serving the OAuth device-flow endpoints
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://github.com";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Selected theme
    #[serde(default)]
    pub theme: Theme,

    /// Accent color used for highlights, QR codes and headings
    #[serde(default)]
    pub accent_color: Accent,

    /// OAuth client id for the device flow
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Comma-separated OAuth scopes
    #[serde(default = "default_scopes")]
    pub scopes: String,

    /// Seconds between access-token polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// GitHub REST API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL of the OAuth endpoints (`/login/device/code`, ...)
    #[serde(default = "default_oauth_base_url")]
    pub oauth_base_url: String,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_client_id() -> String {
    DEFAULT_CLIENT_ID.to_string()
}

fn default_scopes() -> String {
    DEFAULT_SCOPES.to_string()
}

const fn default_poll_interval() -> u64 {
    5
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_oauth_base_url() -> String {
    DEFAULT_OAUTH_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("hubwatch/{}", crate::VERSION)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            accent_color: Accent::default(),
            client_id: default_client_id(),
            scopes: default_scopes(),
            poll_interval_secs: default_poll_interval(),
            api_base_url: default_api_base_url(),
            oauth_base_url: default_oauth_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// Poll interval as a `Duration` (never below one second)
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
