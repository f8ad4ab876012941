//! Result delivery: shareable URL, clipboard and optional local copy.

pub mod clipboard;
pub mod file;
pub mod types;
pub mod url;

pub use types::SinkError;
pub use url::{compose_display_url, extract_identifier};

use std::path::{Path, PathBuf};

use crate::capture::DisplayBackend;
use crate::config::FileType;

/// Abstraction over the session clipboard.
pub trait Clipboard: Send + Sync {
    fn copy(&self, data: &[u8], mime_type: &str) -> Result<(), SinkError>;
}

/// Clipboard of the detected display backend.
pub struct SystemClipboard {
    backend: DisplayBackend,
}

impl SystemClipboard {
    pub fn new(backend: DisplayBackend) -> Self {
        Self { backend }
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&self, data: &[u8], mime_type: &str) -> Result<(), SinkError> {
        clipboard::copy_to_clipboard(self.backend, data, mime_type)
    }
}

/// Image to persist next to the clipboard copy.
#[derive(Debug, Clone, Copy)]
pub struct SaveRequest<'a> {
    pub directory: &'a Path,
    pub image: &'a [u8],
    pub file_type: FileType,
}

/// Outcome of delivering an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub displayed_url: String,
    pub saved_to: Option<PathBuf>,
}

/// Derives the displayed URL, copies it and optionally saves the image.
///
/// Clipboard failures are logged and do not fail the run.
pub fn finalize(
    upload_url: &str,
    domain: &str,
    save: Option<SaveRequest<'_>>,
    clipboard: &dyn Clipboard,
) -> Result<Delivered, SinkError> {
    let identifier = extract_identifier(upload_url)
        .ok_or_else(|| SinkError::MissingIdentifier(upload_url.to_string()))?;
    let displayed_url = compose_display_url(domain, &identifier);
    log::info!("Shareable URL: {}", displayed_url);

    if let Err(err) = clipboard.copy(displayed_url.as_bytes(), clipboard::TEXT_MIME) {
        log::warn!("Could not copy URL to clipboard: {}", err);
    }

    let saved_to = match save {
        Some(request) => {
            let name = file::identifier_filename(&identifier, request.file_type.extension());
            Some(file::save_image(request.directory, &name, request.image)?)
        }
        None => None,
    };

    Ok(Delivered {
        displayed_url,
        saved_to,
    })
}

/// Keeps an image locally instead of uploading it.
///
/// The image goes to the clipboard and, when a directory is given, to a
/// timestamped file.
pub fn keep_local(
    image: &[u8],
    file_type: FileType,
    directory: Option<&Path>,
    clipboard: &dyn Clipboard,
) -> Result<Option<PathBuf>, SinkError> {
    if let Err(err) = clipboard.copy(image, file_type.mime_type()) {
        log::warn!("Could not copy image to clipboard: {}", err);
    }

    directory
        .map(|dir| {
            let name = file::generate_filename(file::LOCAL_FILENAME_TEMPLATE, file_type.extension());
            file::save_image(dir, &name, image)
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingClipboard {
        copies: Mutex<Vec<(Vec<u8>, String)>>,
        fail: bool,
    }

    impl Clipboard for RecordingClipboard {
        fn copy(&self, data: &[u8], mime_type: &str) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Clipboard("no clipboard".into()));
            }
            self.copies
                .lock()
                .unwrap()
                .push((data.to_vec(), mime_type.to_string()));
            Ok(())
        }
    }

    #[test]
    fn finalize_composes_and_copies_url() {
        let clipboard = RecordingClipboard::default();
        let delivered = finalize(
            "https://api.e-z.host/files/abc123.png",
            "https://i.e-z.host/",
            None,
            &clipboard,
        )
        .unwrap();

        assert_eq!(delivered.displayed_url, "https://i.e-z.host/abc123.png");
        assert_eq!(delivered.saved_to, None);
        let copies = clipboard.copies.lock().unwrap();
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].0, b"https://i.e-z.host/abc123.png");
        assert_eq!(copies[0].1, clipboard::TEXT_MIME);
    }

    #[test]
    fn clipboard_failure_is_not_fatal() {
        let clipboard = RecordingClipboard {
            fail: true,
            ..Default::default()
        };
        let delivered = finalize("https://x.test/f/id.png", "https://d.test", None, &clipboard).unwrap();
        assert_eq!(delivered.displayed_url, "https://d.test/id.png");
    }

    #[test]
    fn finalize_saves_with_identifier_name() {
        let temp = TempDir::new().unwrap();
        let clipboard = RecordingClipboard::default();
        let save = SaveRequest {
            directory: temp.path(),
            image: b"jpeg bytes",
            file_type: FileType::Jpeg,
        };

        let delivered = finalize(
            "https://api.e-z.host/files/abc123.png",
            "https://i.e-z.host",
            Some(save),
            &clipboard,
        )
        .unwrap();

        let saved = delivered.saved_to.unwrap();
        assert_eq!(saved.file_name().unwrap(), "abc123.jpg");
        assert_eq!(std::fs::read(saved).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn invalid_save_dir_fails_finalize() {
        let temp = TempDir::new().unwrap();
        let clipboard = RecordingClipboard::default();
        let save = SaveRequest {
            directory: &temp.path().join("missing"),
            image: b"x",
            file_type: FileType::Png,
        };
        let err = finalize("https://h.test/a.png", "https://d.test", Some(save), &clipboard)
            .unwrap_err();
        assert!(matches!(err, SinkError::InvalidSaveTarget { .. }));
    }

    #[test]
    fn url_without_identifier_is_rejected() {
        let clipboard = RecordingClipboard::default();
        let err = finalize("https://h.test/", "https://d.test", None, &clipboard).unwrap_err();
        assert!(matches!(err, SinkError::MissingIdentifier(_)));
        assert!(clipboard.copies.lock().unwrap().is_empty());
    }

    #[test]
    fn keep_local_copies_image_and_saves_timestamped_file() {
        let temp = TempDir::new().unwrap();
        let clipboard = RecordingClipboard::default();

        let saved = keep_local(b"png bytes", FileType::Png, Some(temp.path()), &clipboard)
            .unwrap()
            .unwrap();

        let name = saved.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("ezshot_") && name.ends_with(".png"));
        let copies = clipboard.copies.lock().unwrap();
        assert_eq!(copies[0].1, "image/png");
    }

    #[test]
    fn keep_local_without_directory_only_copies() {
        let clipboard = RecordingClipboard::default();
        let saved = keep_local(b"png bytes", FileType::Png, None, &clipboard).unwrap();
        assert_eq!(saved, None);
        assert_eq!(clipboard.copies.lock().unwrap().len(), 1);
    }
}
