use std::fs;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::capture::types::{CaptureError, RegionMode};

use super::{require_image, run_tool};

/// Capture via `gnome-screenshot`, which can only write to a file.
///
/// The temporary file is owned by a [`NamedTempFile`] and removed when it
/// goes out of scope, whichever way this function returns.
pub fn capture(mode: RegionMode) -> Result<Vec<u8>, CaptureError> {
    let temp = tempfile::Builder::new()
        .prefix("ezshot-")
        .suffix(".png")
        .tempfile()?;

    run_tool("gnome-screenshot", &gnome_args(temp.path(), mode))?;
    read_back(&temp, mode)
}

fn gnome_args(path: &Path, mode: RegionMode) -> Vec<String> {
    let mut args = vec!["--file".to_string(), path.display().to_string()];
    if mode == RegionMode::Region {
        args.push("--area".to_string());
    }
    args
}

/// Reads the screenshot written into `temp`.
///
/// gnome-screenshot may replace the file rather than write into it, so the
/// path is re-read instead of the open handle.
fn read_back(temp: &NamedTempFile, mode: RegionMode) -> Result<Vec<u8>, CaptureError> {
    let data = match fs::read(temp.path()) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(CaptureError::TempFile(e)),
    };
    log::debug!(
        "Read {} bytes from {}",
        data.len(),
        temp.path().display()
    );
    require_image("gnome-screenshot", data, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn area_flag_only_for_region_mode() {
        let path = Path::new("/tmp/shot.png");
        assert_eq!(
            gnome_args(path, RegionMode::FullScreen),
            vec!["--file", "/tmp/shot.png"]
        );
        assert_eq!(
            gnome_args(path, RegionMode::Region),
            vec!["--file", "/tmp/shot.png", "--area"]
        );
    }

    #[test]
    fn reads_bytes_and_removes_file_on_drop() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"png-bytes").unwrap();
        let path = temp.path().to_path_buf();

        let data = read_back(&temp, RegionMode::FullScreen).unwrap();
        assert_eq!(data, b"png-bytes");

        drop(temp);
        assert!(!path.exists(), "temporary capture file should be deleted");
    }

    #[test]
    fn empty_file_in_region_mode_is_cancelled_and_still_removed() {
        let temp = NamedTempFile::new().unwrap();
        let path = temp.path().to_path_buf();

        let err = read_back(&temp, RegionMode::Region).unwrap_err();
        assert!(matches!(err, CaptureError::NoRegionSelected));

        drop(temp);
        assert!(!path.exists());
    }
}
