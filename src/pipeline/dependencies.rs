use std::sync::Arc;

use async_trait::async_trait;

use crate::caption::{self, CaptionError, CaptionStyle, Captions};
use crate::capture::{self, CaptureError, DisplayBackend, RegionMode};
use crate::config::CaptureTool;
use crate::input::TextInputProvider;
use crate::notification::{DesktopNotifier, Notifier};
use crate::sink::{Clipboard, SystemClipboard};
use crate::upload::{UploadClient, UploadError};

/// Abstraction over how screenshot bytes are produced.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    async fn capture(&self, mode: RegionMode) -> Result<Vec<u8>, CaptureError>;
}

/// Abstraction over caption drawing.
pub trait TextOverlay: Send + Sync {
    fn apply(
        &self,
        image: Vec<u8>,
        captions: &Captions,
        style: &CaptionStyle,
    ) -> Result<Vec<u8>, CaptionError>;
}

/// Abstraction over the upload step.
#[async_trait]
pub trait Uploader: Send + Sync {
    async fn upload(&self, image: &[u8], api_key: &str) -> Result<String, UploadError>;
}

/// Bundle of dependencies used by the pipeline. Each component can be mocked in tests.
#[derive(Clone)]
pub struct PipelineDependencies {
    pub source: Arc<dyn CaptureSource>,
    pub overlay: Arc<dyn TextOverlay>,
    pub uploader: Arc<dyn Uploader>,
    pub clipboard: Arc<dyn Clipboard>,
    pub notifier: Arc<dyn Notifier>,
    pub text_input: Arc<dyn TextInputProvider>,
}

impl PipelineDependencies {
    /// Production wiring for the detected session.
    pub fn system(
        backend: DisplayBackend,
        tool: CaptureTool,
        text_overlay: bool,
        text_input: Arc<dyn TextInputProvider>,
        show_progress: bool,
    ) -> Result<Self, UploadError> {
        let overlay: Arc<dyn TextOverlay> = if text_overlay {
            Arc::new(CairoOverlay)
        } else {
            Arc::new(NoOverlay)
        };

        Ok(Self {
            source: Arc::new(ToolCaptureSource { tool }),
            overlay,
            uploader: Arc::new(UploadClient::e_z_host()?.with_progress(show_progress)),
            clipboard: Arc::new(SystemClipboard::new(backend)),
            notifier: Arc::new(DesktopNotifier),
            text_input,
        })
    }
}

/// Captures with an external tool.
pub struct ToolCaptureSource {
    pub tool: CaptureTool,
}

#[async_trait]
impl CaptureSource for ToolCaptureSource {
    async fn capture(&self, mode: RegionMode) -> Result<Vec<u8>, CaptureError> {
        capture::capture_image(self.tool, mode).await
    }
}

/// Draws captions with cairo and pango.
pub struct CairoOverlay;

impl TextOverlay for CairoOverlay {
    fn apply(
        &self,
        image: Vec<u8>,
        captions: &Captions,
        style: &CaptionStyle,
    ) -> Result<Vec<u8>, CaptionError> {
        caption::apply_captions(image, captions, style)
    }
}

/// Used when the text_processing capability is switched off.
pub struct NoOverlay;

impl TextOverlay for NoOverlay {
    fn apply(
        &self,
        image: Vec<u8>,
        captions: &Captions,
        _style: &CaptionStyle,
    ) -> Result<Vec<u8>, CaptionError> {
        if !captions.is_empty() {
            log::warn!("Captions ignored: the text_processing plugin is not enabled");
        }
        Ok(image)
    }
}

#[async_trait]
impl Uploader for UploadClient {
    async fn upload(&self, image: &[u8], api_key: &str) -> Result<String, UploadError> {
        UploadClient::upload(self, image, api_key).await
    }
}
