//! Built-in capabilities selected by the config `plugins` list.
//!
//! Older clients downloaded and imported Python modules by name. The same
//! names now switch built-in behaviour on; nothing is fetched or executed.

use super::Config;

pub const TEXT_PROCESSING_CAPABILITY: &str = "text_processing";
pub const GUI_CAPABILITY: &str = "gui";
pub const LOGGING_CAPABILITY: &str = "logging";

/// Which optional behaviours are active for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Draw captions onto the screenshot.
    pub text_overlay: bool,
    /// Ask for captions interactively.
    pub interactive_input: bool,
    /// Mirror log records to the log file.
    pub file_logging: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            text_overlay: true,
            interactive_input: false,
            file_logging: false,
        }
    }
}

impl Capabilities {
    /// Resolves the capability set from a config.
    ///
    /// An empty `plugins` list keeps the caption overlay on. Once the list is
    /// non-empty only the capabilities it names are enabled.
    pub fn from_config(config: &Config) -> Self {
        if let Some(url) = &config.plugin_repo_url {
            log::warn!(
                "Ignoring plugin_repo_url '{}': plugins are built in and never downloaded",
                url
            );
        }

        if config.plugins.is_empty() {
            return Self::default();
        }

        let mut caps = Self {
            text_overlay: false,
            interactive_input: false,
            file_logging: false,
        };

        for name in &config.plugins {
            match normalize_name(name).as_str() {
                TEXT_PROCESSING_CAPABILITY | "textprocessing" => caps.text_overlay = true,
                GUI_CAPABILITY => caps.interactive_input = true,
                LOGGING_CAPABILITY => caps.file_logging = true,
                _ => log::warn!("Unknown plugin '{}' in config, ignoring", name),
            }
        }

        caps
    }
}

/// Lower-cases a plugin name and strips the `_plugin` / `-plugin` suffix
/// that the old module names carried.
fn normalize_name(name: &str) -> String {
    let lowered = name.trim().to_ascii_lowercase().replace('-', "_");
    lowered
        .strip_suffix("_plugin")
        .map(str::to_string)
        .unwrap_or(lowered)
}
