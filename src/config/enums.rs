//! Configuration enum types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encoding used when an annotated screenshot is written out.
///
/// Stored upper-case in the config file (`"PNG"`, `"JPEG"`), parsed
/// case-insensitively from the command line.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    #[default]
    #[serde(alias = "png")]
    Png,
    #[serde(alias = "JPG", alias = "jpeg", alias = "jpg")]
    Jpeg,
}

impl FileType {
    /// File extension used when saving to disk.
    pub fn extension(self) -> &'static str {
        match self {
            FileType::Png => "png",
            FileType::Jpeg => "jpg",
        }
    }

    /// MIME type advertised when the image is handed to other programs.
    pub fn mime_type(self) -> &'static str {
        match self {
            FileType::Png => "image/png",
            FileType::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileType::Png => f.write_str("PNG"),
            FileType::Jpeg => f.write_str("JPEG"),
        }
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(FileType::Png),
            "jpeg" | "jpg" => Ok(FileType::Jpeg),
            other => Err(format!("unsupported file type '{other}' (expected PNG or JPEG)")),
        }
    }
}

/// Which external capture program to drive.
///
/// `Auto` picks a tool from the detected display backend.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureTool {
    #[default]
    Auto,
    /// `grim` with `slurp` for region selection (wlroots compositors)
    Grim,
    /// `flameshot` raw output mode
    Flameshot,
    /// `gnome-screenshot` writing through a temporary file
    Gnome,
}

impl FromStr for CaptureTool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(CaptureTool::Auto),
            "grim" => Ok(CaptureTool::Grim),
            "flameshot" => Ok(CaptureTool::Flameshot),
            "gnome" | "gnome-screenshot" => Ok(CaptureTool::Gnome),
            other => Err(format!("unknown capture tool '{other}'")),
        }
    }
}
