//! Display backend detection.

use crate::config::CaptureTool;

/// Display server family of the running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayBackend {
    Wayland,
    X11,
}

impl DisplayBackend {
    /// Detects the backend from the process environment.
    pub fn from_env() -> Self {
        detect_display_backend(|key| std::env::var(key).ok())
    }

    /// Capture tool used when the config asks for `auto`.
    pub fn default_capture_tool(self) -> CaptureTool {
        match self {
            DisplayBackend::Wayland => CaptureTool::Grim,
            DisplayBackend::X11 => CaptureTool::Flameshot,
        }
    }
}

/// Classifies the session from an environment lookup.
///
/// Wayland when `WAYLAND_DISPLAY` is set and non-empty or
/// `XDG_SESSION_TYPE` is `wayland`; X11 otherwise.
pub fn detect_display_backend<F>(env: F) -> DisplayBackend
where
    F: Fn(&str) -> Option<String>,
{
    let wayland_display = env("WAYLAND_DISPLAY").is_some_and(|v| !v.trim().is_empty());
    let session_is_wayland =
        env("XDG_SESSION_TYPE").is_some_and(|v| v.trim().eq_ignore_ascii_case("wayland"));

    if wayland_display || session_is_wayland {
        DisplayBackend::Wayland
    } else {
        DisplayBackend::X11
    }
}

/// Resolves the configured tool against the detected backend.
pub fn resolve_capture_tool(configured: CaptureTool, backend: DisplayBackend) -> CaptureTool {
    match configured {
        CaptureTool::Auto => backend.default_capture_tool(),
        explicit => explicit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn wayland_display_means_wayland() {
        let backend = detect_display_backend(env_of(&[("WAYLAND_DISPLAY", "wayland-1")]));
        assert_eq!(backend, DisplayBackend::Wayland);
    }

    #[test]
    fn session_type_alone_is_enough() {
        let backend = detect_display_backend(env_of(&[("XDG_SESSION_TYPE", "Wayland")]));
        assert_eq!(backend, DisplayBackend::Wayland);
    }

    #[test]
    fn empty_wayland_display_falls_back_to_x11() {
        let backend = detect_display_backend(env_of(&[
            ("WAYLAND_DISPLAY", ""),
            ("XDG_SESSION_TYPE", "x11"),
            ("DISPLAY", ":0"),
        ]));
        assert_eq!(backend, DisplayBackend::X11);
    }

    #[test]
    fn no_variables_means_x11() {
        assert_eq!(detect_display_backend(env_of(&[])), DisplayBackend::X11);
    }

    #[test]
    fn explicit_tool_overrides_detection() {
        assert_eq!(
            resolve_capture_tool(CaptureTool::Gnome, DisplayBackend::Wayland),
            CaptureTool::Gnome
        );
        assert_eq!(
            resolve_capture_tool(CaptureTool::Auto, DisplayBackend::Wayland),
            CaptureTool::Grim
        );
        assert_eq!(
            resolve_capture_tool(CaptureTool::Auto, DisplayBackend::X11),
            CaptureTool::Flameshot
        );
    }
}
