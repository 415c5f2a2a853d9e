//! Configuration management for shopctl.
//!
//! Loads configuration from ${SHOPCTL_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the admin REST API (no trailing slash).
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Config::DEFAULT_BASE_URL.to_string(),
            timeout_secs: Config::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Returns the effective base URL.
    ///
    /// The `SHOPCTL_API_URL` environment variable takes precedence over the
    /// configured value. A trailing slash is stripped either way.
    pub fn resolved_base_url(&self) -> String {
        let url = std::env::var("SHOPCTL_API_URL").unwrap_or_else(|_| self.base_url.clone());
        url.trim_end_matches('/').to_string()
    }

    /// Returns the request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend API settings.
    pub api: ApiConfig,
}

impl Config {
    const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
    const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Saves only the API base URL to the config file.
    ///
    /// Creates the file if it doesn't exist.
    /// Preserves existing fields and comments using toml_edit.
    pub fn save_base_url(base_url: &str) -> Result<()> {
        Self::save_base_url_to(&paths::config_path(), base_url)
    }

    /// Saves only the API base URL to a specific config file path.
    pub fn save_base_url_to(path: &Path, base_url: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = if path.exists() {
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?
        } else {
            String::new()
        };

        let mut doc = contents
            .parse::<toml_edit::DocumentMut>()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["api"]["base_url"] = toml_edit::value(base_url.trim_end_matches('/'));

        fs::write(path, doc.to_string())
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// Writes a commented starter config file.
    ///
    /// Fails if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("config file already exists at {}", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let starter = format!(
            "[api]\nbase_url = \"{}\"\n# timeout_secs = {}\n",
            Self::DEFAULT_BASE_URL,
            Self::DEFAULT_TIMEOUT_SECS
        );
        fs::write(path, starter)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}

pub mod paths {
    //! Path resolution for shopctl configuration and credential files.
    //!
    //! SHOPCTL_HOME resolution order:
    //! 1. SHOPCTL_HOME environment variable (if set)
    //! 2. ~/.config/shopctl (default)

    use std::path::PathBuf;

    /// Returns the shopctl home directory.
    ///
    /// Checks SHOPCTL_HOME env var first, falls back to ~/.config/shopctl
    pub fn shopctl_home() -> PathBuf {
        if let Ok(home) = std::env::var("SHOPCTL_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("shopctl"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        shopctl_home().join("config.toml")
    }

    /// Returns the path to the stored credentials file.
    pub fn credentials_path() -> PathBuf {
        shopctl_home().join("credentials.json")
    }
}
