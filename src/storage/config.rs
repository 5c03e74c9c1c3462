use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{DEFAULT_ACCESSOR_KEY, PrefixFieldsConfig, QueryOptions};
use crate::search::SearchBoxProps;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(rename = "search-box", default)]
    pub search_box: SearchBoxConfig,
    /// Display strings by key, e.g. `"searchbox.placeholder" = "search movies"`
    #[serde(default)]
    pub translations: HashMap<String, String>,
}

/// General configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Documents to search (TOML with `[[documents]]` tables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documents_file: Option<PathBuf>,

    /// Log file level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Level at which log messages are also flashed in the TUI
    #[serde(default = "default_flash_level")]
    pub flash_level: String,

    /// How long flash messages stay visible
    #[serde(default = "default_flash_message_duration_ms")]
    pub flash_message_duration_ms: u64,

    /// Maximum number of hits per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            documents_file: None,
            log_level: default_log_level(),
            flash_level: default_flash_level(),
            flash_message_duration_ms: default_flash_message_duration_ms(),
            max_results: default_max_results(),
        }
    }
}

/// Search box settings, turned into [`SearchBoxProps`] at mount time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchBoxConfig {
    /// Accessor key
    #[serde(default = "default_id")]
    pub id: String,

    /// Search while typing instead of only on Enter
    #[serde(default)]
    pub search_on_change: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_fields: Option<Vec<String>>,

    /// `false`, a list of fields, or absent for the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix_query_fields: Option<PrefixFieldsSetting>,

    /// Minimum interval between searches while typing
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,

    #[serde(default)]
    pub query_options: QueryOptions,
}

impl Default for SearchBoxConfig {
    fn default() -> Self {
        SearchBoxConfig {
            id: default_id(),
            search_on_change: false,
            query_fields: None,
            prefix_query_fields: None,
            throttle_ms: default_throttle_ms(),
            query_options: QueryOptions::new(),
        }
    }
}

impl SearchBoxConfig {
    pub fn to_props(&self) -> SearchBoxProps {
        SearchBoxProps {
            id: self.id.clone(),
            search_on_change: self.search_on_change,
            query_fields: self.query_fields.clone(),
            prefix_query_fields: self
                .prefix_query_fields
                .as_ref()
                .map(PrefixFieldsSetting::to_config)
                .unwrap_or_default(),
            query_options: self.query_options.clone(),
            throttle: Duration::from_millis(self.throttle_ms),
        }
    }
}

/// Prefix field setting as written in TOML
/// `true` keeps the default behaviour, `false` disables prefix matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefixFieldsSetting {
    Enabled(bool),
    Fields(Vec<String>),
}

impl PrefixFieldsSetting {
    pub fn to_config(&self) -> PrefixFieldsConfig {
        match self {
            PrefixFieldsSetting::Enabled(true) => PrefixFieldsConfig::Default,
            PrefixFieldsSetting::Enabled(false) => PrefixFieldsConfig::Disabled,
            PrefixFieldsSetting::Fields(fields) => PrefixFieldsConfig::Explicit(fields.clone()),
        }
    }
}

// Default value functions for serde
fn default_log_level() -> String {
    "info".to_string()
}

fn default_flash_level() -> String {
    "warn".to_string()
}

fn default_flash_message_duration_ms() -> u64 {
    3000
}

fn default_max_results() -> usize {
    crate::search::memory::DEFAULT_MAX_RESULTS
}

fn default_id() -> String {
    DEFAULT_ACCESSOR_KEY.to_string()
}

fn default_throttle_ms() -> u64 {
    crate::search::DEFAULT_THROTTLE.as_millis() as u64
}

/// Trait for configuration storage
pub trait ConfigStorage {
    /// Load configuration from file
    fn load(&self) -> Result<Config>;

    /// Save configuration to file
    fn save(&self, config: &Config) -> Result<()>;

    /// Get the config file path
    fn path(&self) -> &PathBuf;

    /// Create default configuration file if it doesn't exist
    fn create_default(&self) -> Result<()>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    /// Create a new TomlConfigStorage with the given path
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        use anyhow::Context;
        use std::fs;

        // If file doesn't exist, create default and return it
        if !self.path.exists() {
            log::info!(
                "Config file not found at {:?}, creating default configuration",
                self.path
            );
            self.create_default()?;
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))?;

        log::info!("Loaded configuration from {:?}", self.path);
        log::debug!(
            "Config: search_on_change={}, throttle={}ms, {} translations",
            config.search_box.search_on_change,
            config.search_box.throttle_ms,
            config.translations.len()
        );

        Ok(config)
    }

    fn save(&self, config: &Config) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        let toml_str = toml::to_string_pretty(config)
            .with_context(|| "Failed to serialize configuration")?;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&self.path, toml_str)
            .with_context(|| format!("Failed to write config to {:?}", self.path))?;

        log::debug!("Saved configuration to {:?}", self.path);

        Ok(())
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn create_default(&self) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        // Use the example config compiled into the binary
        let example_config = include_str!("../../searchbox.toml.example");

        fs::write(&self.path, example_config)
            .with_context(|| format!("Failed to create default config at {:?}", self.path))?;

        log::info!("Created default configuration at {:?}", self.path);

        Ok(())
    }
}
