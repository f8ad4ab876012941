//! Caption overlay for captured screenshots.
//!
//! This module provides:
//! - Colour parsing and the named palette
//! - Font lookup and size fitting
//! - Cairo/Pango drawing of top and bottom captions
//! - Re-encoding to PNG or JPEG

pub mod color;
pub mod font;
pub mod image_io;
pub mod layout;

mod render;

pub use color::Color;
pub use font::FontDescriptor;
pub use layout::FontBounds;

use thiserror::Error;

use crate::config::{CaptionConfig, FileType};

/// Errors that can occur while drawing captions.
#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("Font not found: {0}")]
    FontUnavailable(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Cairo error: {0}")]
    Render(#[from] cairo::Error),

    #[error("Surface data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),
}

/// Optional top and bottom caption text.
///
/// Blank strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captions {
    top: Option<String>,
    bottom: Option<String>,
}

impl Captions {
    pub fn new(top: Option<String>, bottom: Option<String>) -> Self {
        Self {
            top: top.filter(|t| !t.trim().is_empty()),
            bottom: bottom.filter(|t| !t.trim().is_empty()),
        }
    }

    pub fn top(&self) -> Option<&str> {
        self.top.as_deref()
    }

    pub fn bottom(&self) -> Option<&str> {
        self.bottom.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.bottom.is_none()
    }
}

/// How captions are drawn and how the result is encoded.
#[derive(Debug, Clone)]
pub struct CaptionStyle {
    pub color: Color,
    pub use_frame: bool,
    pub font: FontDescriptor,
    pub bounds: FontBounds,
    pub file_type: FileType,
    pub compression_level: u8,
}

impl CaptionStyle {
    /// Builds a style from the caption config and the per-run choices.
    pub fn new(
        config: &CaptionConfig,
        color: Color,
        use_frame: bool,
        file_type: FileType,
        compression_level: u8,
    ) -> Self {
        Self {
            color,
            use_frame,
            font: FontDescriptor::new(&config.font_family, &config.font_weight),
            bounds: FontBounds {
                min: config.min_font_size,
                max: config.max_font_size,
                divisor: config.size_divisor,
            },
            file_type,
            compression_level,
        }
    }
}

/// Draws `captions` onto `image_bytes`.
///
/// With no captions the input is returned unchanged, without decoding or
/// re-encoding.
pub fn apply_captions(
    image_bytes: Vec<u8>,
    captions: &Captions,
    style: &CaptionStyle,
) -> Result<Vec<u8>, CaptionError> {
    if captions.is_empty() {
        log::debug!("No captions requested, leaving image untouched");
        return Ok(image_bytes);
    }
    render::render_captions(&image_bytes, captions, style)
}
