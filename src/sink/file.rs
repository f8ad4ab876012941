//! Saving images to a user-chosen directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use nix::unistd::{AccessFlags, access};

use super::types::SinkError;

/// Filename template for images kept without uploading.
pub const LOCAL_FILENAME_TEMPLATE: &str = "ezshot_%Y-%m-%d_%H%M%S";

/// Generate a filename based on the template and current time.
pub fn generate_filename(template: &str, extension: &str) -> String {
    let now = Local::now();
    format!("{}.{}", now.format(template), extension)
}

/// Filename for an uploaded image: the identifier's stem plus `extension`.
pub fn identifier_filename(identifier: &str, extension: &str) -> String {
    let stem = Path::new(identifier)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| identifier.to_string());
    format!("{}.{}", stem, extension)
}

/// Checks that `directory` exists, is a directory and is writable.
///
/// Returns the canonical path on success.
pub fn validate_save_dir(directory: &Path) -> Result<PathBuf, SinkError> {
    let invalid = |reason: &str| SinkError::InvalidSaveTarget {
        path: directory.to_path_buf(),
        reason: reason.to_string(),
    };

    let metadata = fs::metadata(directory).map_err(|_| invalid("does not exist"))?;
    if !metadata.is_dir() {
        return Err(invalid("not a directory"));
    }
    access(directory, AccessFlags::W_OK).map_err(|_| invalid("not writable"))?;

    Ok(directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf()))
}

/// Write `image_data` as `file_name` inside a validated directory.
pub fn save_image(
    directory: &Path,
    file_name: &str,
    image_data: &[u8],
) -> Result<PathBuf, SinkError> {
    let directory = validate_save_dir(directory)?;
    let file_path = directory.join(file_name);

    log::info!(
        "Saving screenshot to: {} ({} bytes)",
        file_path.display(),
        image_data.len()
    );
    fs::write(&file_path, image_data)?;

    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&file_path, Permissions::from_mode(0o600))?;
    }

    Ok(file_path)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
