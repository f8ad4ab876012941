use std::process::{Command, Stdio};

use tokio::task;

use crate::capture::types::{CaptureError, RegionMode};
use crate::config::CaptureTool;

mod flameshot;
mod gnome;
mod grim;

/// Captures image bytes with the given tool, off the async thread.
pub async fn capture_image(tool: CaptureTool, mode: RegionMode) -> Result<Vec<u8>, CaptureError> {
    task::spawn_blocking(move || capture_image_blocking(tool, mode))
        .await
        .map_err(|e| CaptureError::Task(format!("Capture task failed to join: {}", e)))?
}

fn capture_image_blocking(tool: CaptureTool, mode: RegionMode) -> Result<Vec<u8>, CaptureError> {
    log::debug!("Capturing with {:?} ({:?})", tool, mode);
    match tool {
        CaptureTool::Grim | CaptureTool::Auto => grim::capture(mode),
        CaptureTool::Flameshot => flameshot::capture(mode),
        CaptureTool::Gnome => gnome::capture(mode),
    }
}

/// Runs an external tool and returns its stdout, mapping spawn failures and
/// non-zero exits to capture errors.
pub(crate) fn run_tool(tool: &'static str, args: &[String]) -> Result<Vec<u8>, CaptureError> {
    log::debug!("Running {} {}", tool, args.join(" "));

    let output = Command::new(tool)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| CaptureError::ToolUnavailable { tool, source })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let stderr = if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr
        };
        return Err(CaptureError::CaptureFailed { tool, stderr });
    }

    Ok(output.stdout)
}

/// Turns empty tool output into the matching error for the capture mode.
pub(crate) fn require_image(
    tool: &'static str,
    data: Vec<u8>,
    mode: RegionMode,
) -> Result<Vec<u8>, CaptureError> {
    if !data.is_empty() {
        return Ok(data);
    }
    match mode {
        RegionMode::Region => Err(CaptureError::NoRegionSelected),
        RegionMode::FullScreen => Err(CaptureError::EmptyCapture(tool)),
    }
}
