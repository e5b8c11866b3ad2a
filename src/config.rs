//! Application configuration management.

use std::path::{Path, PathBuf};

use color_eyre::Result;
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Server connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the catalogue service
    #[serde(default = "default_url")]
    pub url: String,
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Start in dense (compact row) mode
    #[serde(default)]
    pub dense: bool,

    /// Initial rows per page
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
}

fn default_url() -> String {
    String::from("http://localhost:3001")
}

fn default_rows_per_page() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { url: default_url() }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dense: false,
            rows_per_page: default_rows_per_page(),
        }
    }
}

impl Config {
    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not determine config directory"))?;

        Ok(config_dir.join("songs-tui").join("config.toml"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&contents)?;

        // A zero page size would make every page empty
        config.ui.rows_per_page = config.ui.rows_per_page.max(1);

        Ok(config)
    }

    /// Save configuration to file.
    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        Ok(())
    }

    /// Check if the configuration is valid for connecting.
    pub fn is_valid(&self) -> bool {
        !self.server.url.is_empty()
            && (self.server.url.starts_with("http://") || self.server.url.starts_with("https://"))
    }
}
