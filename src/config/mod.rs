//! Configuration file support for ezshot.
//!
//! Settings live in `~/.config/e-zshot/config.json`, the same file the older
//! e-zshot scripts used. The store is read once per run; values passed on the
//! command line are validated and written back immediately.
//!
//! If no config file exists an empty one is created and defaults are used.

pub mod capabilities;
pub mod enums;
pub mod migration;
pub mod types;

pub use capabilities::{
    Capabilities, GUI_CAPABILITY, LOGGING_CAPABILITY, TEXT_PROCESSING_CAPABILITY,
};
pub use enums::{CaptureTool, FileType};
pub use types::CaptionConfig;

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Domain used for displayed URLs when none is configured.
pub const DEFAULT_DOMAIN: &str = "https://i.e-z.host/";

/// Shortest API key accepted by [`Config::set_api_key`].
pub const MIN_API_KEY_LEN: usize = 10;

/// Directory name under the XDG config dir shared with older e-zshot clients.
const CONFIG_DIR_NAME: &str = "e-zshot";

/// Validation failures for values supplied by the user.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid API key: expected at least {MIN_API_KEY_LEN} characters")]
    ApiKeyTooShort,

    #[error("No API key configured. Provide one with '-a <key>'")]
    MissingApiKey,

    #[error("Invalid domain '{0}': it must start with 'https://'")]
    InvalidDomain(String),

    #[error("Invalid compression level {0}: expected 0-9")]
    InvalidCompressionLevel(u8),
}

/// Persisted user settings.
///
/// # Example JSON
/// ```json
/// {
///   "api_key": "0123456789abcdef",
///   "domain": "https://i.e-z.host/",
///   "file_type": "PNG",
///   "compression_level": 6,
///   "text_color": "white",
///   "plugins": ["gui"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Upload API key sent in the `key` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base of the displayed URL, must start with https://
    #[serde(default = "types::default_domain")]
    pub domain: String,

    /// Output encoding for annotated and saved screenshots
    #[serde(default)]
    pub file_type: FileType,

    /// Compression level 0-9 (PNG effort, or JPEG quality step)
    #[serde(default = "types::default_compression_level")]
    pub compression_level: u8,

    /// Default caption colour (named colour or #rrggbb)
    #[serde(default = "types::default_text_color")]
    pub text_color: String,

    /// Capture program; `auto` chooses from the display backend
    #[serde(default)]
    pub capture_tool: CaptureTool,

    /// Caption font settings
    #[serde(default)]
    pub caption: CaptionConfig,

    /// Built-in capabilities to enable (text_processing, gui, logging)
    #[serde(default)]
    pub plugins: Vec<String>,

    /// Accepted for compatibility with older clients; never fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_repo_url: Option<String>,

    /// Keys written by other tools, preserved across saves
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            domain: types::default_domain(),
            file_type: FileType::default(),
            compression_level: types::default_compression_level(),
            text_color: types::default_text_color(),
            capture_tool: CaptureTool::default(),
            caption: CaptionConfig::default(),
            plugins: Vec::new(),
            plugin_repo_url: None,
            extra: Map::new(),
        }
    }
}

impl Config {
    /// Returns the JSON schema describing the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = config_dir()?;
        Ok(config_dir.join("config.json"))
    }

    /// Loads configuration from the default location, creating an empty file
    /// first if none exists.
    pub fn load() -> Result<Self> {
        let path = Self::get_config_path()?;
        Self::load_from(&path)
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file is created as `{}`. Legacy keys are migrated and, if any
    /// were found, the upgraded document is written back.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created, read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        ensure_config_file_exists(path)?;

        let raw_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut raw: Value = if raw_str.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            serde_json::from_str(&raw_str)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        };

        let actions = migration::migrate_legacy_keys(&mut raw);

        let mut config: Config = serde_json::from_value(raw)
            .with_context(|| format!("Invalid config values in {}", path.display()))?;
        config.validate_and_clamp();

        if !actions.is_empty() {
            info!("Migrated legacy config keys: {:?}", actions);
            config.save_to(path)?;
        }

        info!("Loaded config from {}", path.display());
        debug!("Config domain={} file_type={}", config.domain, config.file_type);

        Ok(config)
    }

    /// Writes the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::get_config_path()?;
        self.save_to(&path)
    }

    /// Serializes the config as pretty JSON to `path`, creating parent
    /// directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str =
            serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, config_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Stores a new API key after checking its length.
    ///
    /// The config is left unchanged when the key is rejected.
    pub fn set_api_key(&mut self, key: &str) -> Result<(), ConfigError> {
        let key = key.trim();
        if key.chars().count() < MIN_API_KEY_LEN {
            return Err(ConfigError::ApiKeyTooShort);
        }
        self.api_key = Some(key.to_string());
        Ok(())
    }

    /// Stores a new display domain after checking the scheme.
    pub fn set_domain(&mut self, domain: &str) -> Result<(), ConfigError> {
        let domain = domain.trim();
        if !domain.starts_with("https://") {
            return Err(ConfigError::InvalidDomain(domain.to_string()));
        }
        self.domain = domain.to_string();
        Ok(())
    }

    /// Stores a new compression level (0-9).
    pub fn set_compression_level(&mut self, level: u8) -> Result<(), ConfigError> {
        if level > 9 {
            return Err(ConfigError::InvalidCompressionLevel(level));
        }
        self.compression_level = level;
        Ok(())
    }

    /// Returns the API key or [`ConfigError::MissingApiKey`].
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    /// Clamps values edited by hand into acceptable ranges.
    ///
    /// Validated ranges:
    /// - `compression_level`: 0 - 9
    /// - `caption.min_font_size`: 6 - 200
    /// - `caption.max_font_size`: min_font_size - 400
    /// - `caption.size_divisor`: at least 1
    fn validate_and_clamp(&mut self) {
        if self.compression_level > 9 {
            log::warn!(
                "Invalid compression_level {}, clamping to 0-9 range",
                self.compression_level
            );
            self.compression_level = 9;
        }

        if !self.domain.starts_with("https://") {
            log::warn!(
                "Invalid domain '{}' in config, falling back to {}",
                self.domain,
                DEFAULT_DOMAIN
            );
            self.domain = DEFAULT_DOMAIN.to_string();
        }

        let caption = &mut self.caption;
        if !(6..=200).contains(&caption.min_font_size) {
            log::warn!(
                "Invalid caption.min_font_size {}, clamping to 6-200 range",
                caption.min_font_size
            );
            caption.min_font_size = caption.min_font_size.clamp(6, 200);
        }
        if !(caption.min_font_size..=400).contains(&caption.max_font_size) {
            log::warn!(
                "Invalid caption.max_font_size {}, clamping to {}-400 range",
                caption.max_font_size,
                caption.min_font_size
            );
            caption.max_font_size = caption.max_font_size.clamp(caption.min_font_size, 400);
        }
        if caption.size_divisor == 0 {
            log::warn!("caption.size_divisor must be positive, using 10");
            caption.size_divisor = 10;
        }
    }
}

/// Directory holding the config file and the optional log file.
pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Could not find config directory")?
        .join(CONFIG_DIR_NAME))
}

fn ensure_config_file_exists(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, "{}")
        .with_context(|| format!("Failed to create config file {}", path.display()))?;

    info!("Config file created at {}", path.display());
    Ok(())
}
