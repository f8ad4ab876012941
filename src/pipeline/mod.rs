//! The capture → caption → upload → deliver sequence.
//!
//! Every step goes through [`PipelineDependencies`], so the whole run can be
//! exercised with mocks. Steps never overlap.

pub mod dependencies;

pub use dependencies::{
    CairoOverlay, CaptureSource, NoOverlay, PipelineDependencies, TextOverlay, ToolCaptureSource,
    Uploader,
};

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task;

use crate::caption::CaptionStyle;
use crate::capture::RegionMode;
use crate::config::ConfigError;
use crate::notification::{self, Urgency};
use crate::sink::{self, Delivered, SaveRequest, file};

/// Everything one run needs besides its dependencies.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub region: RegionMode,
    pub style: CaptionStyle,
    pub domain: String,
    /// Required unless `no_upload` is set.
    pub api_key: Option<String>,
    pub save_dir: Option<PathBuf>,
    pub no_upload: bool,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Uploaded(Delivered),
    KeptLocal { saved_to: Option<PathBuf> },
}

/// Runs the pipeline once.
///
/// Preconditions (API key, save directory) are checked before anything is
/// captured.
pub async fn run(request: RunRequest, deps: &PipelineDependencies) -> Result<RunOutcome> {
    let save_dir = request
        .save_dir
        .as_deref()
        .map(file::validate_save_dir)
        .transpose()?;

    let api_key = if request.no_upload {
        None
    } else {
        Some(
            request
                .api_key
                .clone()
                .filter(|key| !key.is_empty())
                .ok_or(ConfigError::MissingApiKey)?,
        )
    };

    let text_input = Arc::clone(&deps.text_input);
    let captions = task::spawn_blocking(move || text_input.prompt())
        .await
        .context("Text input task failed")?;

    log::info!("Starting capture: {:?}", request.region);
    let image = deps
        .source
        .capture(request.region)
        .await
        .context("Screenshot capture failed")?;
    log::info!("Obtained screenshot data ({} bytes)", image.len());

    let image = deps
        .overlay
        .apply(image, &captions, &request.style)
        .context("Failed to draw captions")?;

    let file_type = request.style.file_type;

    let Some(api_key) = api_key else {
        let clipboard = Arc::clone(&deps.clipboard);
        let saved_to = task::spawn_blocking(move || {
            sink::keep_local(&image, file_type, save_dir.as_deref(), clipboard.as_ref())
        })
        .await
        .context("Clipboard task failed")?
        .context("Failed to keep screenshot")?;

        let body = match &saved_to {
            Some(path) => format!("Copied to clipboard and saved to {}", path.display()),
            None => "Copied to clipboard".to_string(),
        };
        notification::notify_best_effort(deps.notifier.as_ref(), "Screenshot taken", &body, Urgency::Normal)
            .await;
        return Ok(RunOutcome::KeptLocal { saved_to });
    };

    let upload_url = deps
        .uploader
        .upload(&image, &api_key)
        .await
        .context("Upload failed")?;

    let clipboard = Arc::clone(&deps.clipboard);
    let domain = request.domain.clone();
    let delivered = task::spawn_blocking(move || {
        let save = save_dir.as_deref().map(|directory| SaveRequest {
            directory,
            image: &image,
            file_type,
        });
        sink::finalize(&upload_url, &domain, save, clipboard.as_ref())
    })
    .await
    .context("Result delivery task failed")?
    .context("Failed to deliver upload result")?;

    notification::notify_best_effort(
        deps.notifier.as_ref(),
        "Screenshot uploaded",
        &format!("{} copied to clipboard", delivered.displayed_url),
        Urgency::Normal,
    )
    .await;

    Ok(RunOutcome::Uploaded(delivered))
}
