//! Configuration module for pagesel
//!
//! Manages application configuration: where records come from, how many
//! records a page holds, page caching and display columns. Configuration is
//! stored in the user's config directory and can be overridden with
//! `PAGESEL_*` environment variables (`PAGESEL_PAGE_SIZE=20`,
//! `PAGESEL_SOURCE__BASE_URL=...`).

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Records per page when neither config nor CLI set one
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Largest page the remote API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

const ENV_PREFIX: &str = "PAGESEL";

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PageselConfig {
    /// Records per page, shared by the display and the bulk-select scan
    pub page_size: u32,

    /// Suppress informational output by default
    pub quiet: bool,

    /// Tracing filter used when `RUST_LOG` is not set (e.g. "info", "pagesel=debug")
    pub log_level: Option<String>,

    pub source: SourceConfig,

    pub cache: CacheConfig,

    pub display: DisplayConfig,
}

impl Default for PageselConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            quiet: false,
            log_level: None,
            source: SourceConfig::default(),
            cache: CacheConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Remote collection settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SourceConfig {
    /// Collection endpoint, queried with `page`, `limit` and `fields`
    pub base_url: String,

    /// Record fields to request; empty requests everything
    pub fields: Vec<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.artic.edu/api/v1/artworks".to_string(),
            fields: [
                "id",
                "title",
                "place_of_origin",
                "artist_display",
                "inscriptions",
                "date_start",
                "date_end",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            timeout_secs: 15,
            user_agent: format!("pagesel/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Page cache settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    /// Memoize fetched pages; off means every navigation re-fetches
    pub enabled: bool,

    /// Seconds a cached page stays valid
    pub ttl_secs: u64,

    /// Maximum number of cached pages
    pub max_pages: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_secs: 300,
            max_pages: 256,
        }
    }
}

/// Table display settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Record fields shown as columns after the id
    pub columns: Vec<String>,

    /// Maximum characters per cell before truncation
    pub max_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            columns: vec![
                "title".to_string(),
                "place_of_origin".to_string(),
                "artist_display".to_string(),
                "date_start".to_string(),
                "date_end".to_string(),
            ],
            max_width: 32,
        }
    }
}

impl PageselConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;

        Ok(config_dir.join("pagesel").join("config.toml"))
    }

    /// Load configuration from the default location, creating it if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, created,
    /// or holds invalid values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file, layered with the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, cannot be parsed, or holds
    /// invalid values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::load_layered(path, Self::environment())
    }

    /// Load `path` and apply `env` on top of it
    fn load_layered(path: &Path, env: Environment) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(env)
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// `PAGESEL_*` environment overrides; `__` separates nested keys
    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("source.fields")
            .with_list_parse_key("display.columns")
    }

    /// Reject values the rest of the program cannot work with
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Message` describing the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::Message(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::Message("source.base_url must not be empty".to_string()));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Message("source.timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the
    /// configuration cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        fs::write(path, self.to_toml()?)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Render the configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))
    }
}
