use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while delivering the result.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Invalid save directory {path}: {reason}")]
    InvalidSaveTarget { path: PathBuf, reason: String },

    #[error("Upload URL has no file identifier: {0}")]
    MissingIdentifier(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
