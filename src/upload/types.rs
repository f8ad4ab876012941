use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while uploading a screenshot.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload failed after {attempts} attempts: {message}")]
    Network { attempts: u32, message: String },

    #[error("Upload rejected with HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Upload succeeded but the server returned no image URL")]
    EmptyUploadResult,

    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// What the transport got back from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Network-class failure of a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

#[derive(Debug, Clone, Error)]
#[error("{kind:?}: {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            TransportErrorKind::Timeout,
            format!("timed out after {}s", after.as_secs()),
        )
    }
}

/// Body of a successful upload.
#[derive(Debug, Deserialize)]
pub(super) struct UploadResponse {
    #[serde(rename = "imageUrl", alias = "url", default)]
    pub image_url: Option<String>,
}
