//! Screenshot capture through external tools.
//!
//! This module provides:
//! - Display backend detection (Wayland vs X11)
//! - Full screen and region capture via grim/slurp, flameshot or gnome-screenshot
//! - Scoped temporary files for tools that cannot stream to stdout

pub mod backend;
pub mod types;

mod sources;

pub use backend::{DisplayBackend, detect_display_backend, resolve_capture_tool};
pub use sources::capture_image;
pub use types::{CaptureError, RegionMode};
