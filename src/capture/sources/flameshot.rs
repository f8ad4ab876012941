use crate::capture::types::{CaptureError, RegionMode};

use super::{require_image, run_tool};

/// Capture via `flameshot` in raw mode (`-r`), which writes PNG to stdout.
///
/// Cancelling the selection UI exits cleanly with no output.
pub fn capture(mode: RegionMode) -> Result<Vec<u8>, CaptureError> {
    let data = run_tool("flameshot", &flameshot_args(mode))?;
    require_image("flameshot", data, mode)
}

fn flameshot_args(mode: RegionMode) -> Vec<String> {
    let subcommand = match mode {
        RegionMode::FullScreen => "full",
        RegionMode::Region => "gui",
    };
    vec![subcommand.to_string(), "-r".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_selects_subcommand() {
        assert_eq!(flameshot_args(RegionMode::FullScreen), vec!["full", "-r"]);
        assert_eq!(flameshot_args(RegionMode::Region), vec!["gui", "-r"]);
    }
}
