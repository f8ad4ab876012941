//! Data types for screenshot capture.

use thiserror::Error;

/// What part of the screen to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionMode {
    /// Capture every output.
    FullScreen,
    /// Let the user drag out a rectangle first.
    Region,
}

/// Errors that can occur while capturing. None of them are retried.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("{tool} is not available (is it installed?): {source}")]
    ToolUnavailable {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} failed: {stderr}")]
    CaptureFailed { tool: &'static str, stderr: String },

    #[error("No region selected")]
    NoRegionSelected,

    #[error("{0} returned an empty screenshot")]
    EmptyCapture(&'static str),

    #[error("Temporary capture file error: {0}")]
    TempFile(#[from] std::io::Error),

    #[error("Capture task failed: {0}")]
    Task(String),
}
