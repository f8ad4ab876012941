//! Configuration type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Caption font settings.
///
/// Controls which font family captions are drawn with and the range the
/// fitting loop is allowed to pick sizes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaptionConfig {
    /// Font family name as known to fontconfig (e.g. "DejaVu Sans", "Impact")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight ("normal", "bold", ...)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Smallest size in pixels the fitting loop may shrink to (valid range: 6 - 200)
    #[serde(default = "default_min_font_size")]
    pub min_font_size: u32,

    /// Largest starting size in pixels (valid range: min_font_size - 400)
    #[serde(default = "default_max_font_size")]
    pub max_font_size: u32,

    /// Starting size is the smaller image dimension divided by this value
    #[serde(default = "default_size_divisor")]
    pub size_divisor: u32,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            min_font_size: default_min_font_size(),
            max_font_size: default_max_font_size(),
            size_divisor: default_size_divisor(),
        }
    }
}

pub(super) fn default_domain() -> String {
    super::DEFAULT_DOMAIN.to_string()
}

pub(super) fn default_text_color() -> String {
    "white".to_string()
}

pub(super) fn default_compression_level() -> u8 {
    6
}

fn default_font_family() -> String {
    "DejaVu Sans".to_string()
}

fn default_font_weight() -> String {
    "bold".to_string()
}

fn default_min_font_size() -> u32 {
    20
}

fn default_max_font_size() -> u32 {
    80
}

fn default_size_divisor() -> u32 {
    10
}
