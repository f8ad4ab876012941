use crate::capture::types::{CaptureError, RegionMode};

use super::{require_image, run_tool};

/// Capture via `grim`, selecting a region with `slurp` first when asked.
pub fn capture(mode: RegionMode) -> Result<Vec<u8>, CaptureError> {
    let geometry = match mode {
        RegionMode::FullScreen => None,
        RegionMode::Region => Some(select_region()?),
    };

    let data = run_tool("grim", &grim_args(geometry.as_deref()))?;
    require_image("grim", data, mode)
}

/// Runs `slurp` and returns the geometry in `x,y wxh` form.
fn select_region() -> Result<String, CaptureError> {
    let output = run_tool("slurp", &["-f".to_string(), "%x,%y %wx%h".to_string()])?;
    parse_geometry(&output)
}

fn parse_geometry(output: &[u8]) -> Result<String, CaptureError> {
    let geometry = String::from_utf8_lossy(output).trim().to_string();
    if geometry.is_empty() {
        return Err(CaptureError::NoRegionSelected);
    }
    log::debug!("Selected region: {}", geometry);
    Ok(geometry)
}

/// PNG to stdout at compression level 0; the image is re-encoded later anyway.
fn grim_args(geometry: Option<&str>) -> Vec<String> {
    let mut args = Vec::new();
    if let Some(geometry) = geometry {
        args.push("-g".to_string());
        args.push(geometry.to_string());
    }
    args.extend(["-t", "png", "-l", "0", "-"].map(String::from));
    args
}
