use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use ezshot::caption::{CaptionStyle, Captions, Color, color};
use ezshot::capture::{DisplayBackend, RegionMode, resolve_capture_tool};
use ezshot::config::{self, Capabilities, Config, FileType};
use ezshot::input::{DialogTextInput, FlagTextInput, TextInputProvider};
use ezshot::logging::{self, LOG_FILE_NAME, LogHandle};
use ezshot::notification::{self, DesktopNotifier, Urgency};
use ezshot::pipeline::{self, PipelineDependencies, RunOutcome, RunRequest};
use ezshot::sink::file::expand_tilde;

#[derive(Parser, Debug)]
#[command(name = "ezshot")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("EZSHOT_GIT_HASH"), ")"),
    about = "Capture a screenshot, caption it and upload it to e-z.host"
)]
struct Cli {
    /// Store a new API key (at least 10 characters)
    #[arg(long, short = 'a', value_name = "KEY")]
    api_key: Option<String>,

    /// Store a new domain for shared links (must start with https://)
    #[arg(long, short = 'd', value_name = "URL")]
    domain: Option<String>,

    /// Also save the image to this directory
    #[arg(long, short = 's', value_name = "DIR")]
    save_dir: Option<String>,

    /// Capture the whole screen instead of a selected region
    #[arg(long, short = 'f', action = ArgAction::SetTrue)]
    full_screen: bool,

    /// Show debug output
    #[arg(long, short = 'v', action = ArgAction::SetTrue)]
    verbose: bool,

    /// Caption drawn at the top of the image
    #[arg(long, short = 't', value_name = "TEXT")]
    top_text: Option<String>,

    /// Caption drawn at the bottom of the image
    #[arg(long, short = 'b', value_name = "TEXT")]
    bottom_text: Option<String>,

    /// Caption colour: a name (red, white, ...) or #rrggbb
    #[arg(long, short = 'c', visible_alias = "color", value_name = "COLOUR")]
    colour: Option<Color>,

    /// Draw a black frame behind captions
    #[arg(long, action = ArgAction::SetTrue)]
    use_frame: bool,

    /// Ask for captions in a dialog
    #[arg(long, short = 'g', action = ArgAction::SetTrue)]
    gui: bool,

    /// Store the output file type (PNG or JPEG)
    #[arg(long, short = 'F', value_name = "TYPE")]
    file_type: Option<FileType>,

    /// Store the compression level (0-9)
    #[arg(long, short = 'l', value_name = "LEVEL")]
    compression_level: Option<u8>,

    /// Keep the screenshot local: copy the image instead of uploading it
    #[arg(long, short = 'n', action = ArgAction::SetTrue)]
    no_upload: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
        Err(err) => err.exit(),
    };
    let log_handle = logging::init(cli.verbose);

    match run(cli, &log_handle) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, log_handle: &LogHandle) -> Result<()> {
    let config_path = Config::get_config_path()?;
    let mut config = Config::load_from(&config_path)?;
    apply_cli_settings(&cli, &mut config, &config_path)?;

    let capabilities = Capabilities::from_config(&config);
    if capabilities.file_logging {
        log_handle.attach_file(&config::config_dir()?.join(LOG_FILE_NAME))?;
    }

    let color = match cli.colour {
        Some(color) => color,
        None => config.text_color.parse().unwrap_or_else(|e| {
            log::warn!("Invalid text_color in config ({}), using white", e);
            color::WHITE
        }),
    };
    let style = CaptionStyle::new(
        &config.caption,
        color,
        cli.use_frame,
        config.file_type,
        config.compression_level,
    );

    let flag_captions = Captions::new(cli.top_text.clone(), cli.bottom_text.clone());
    let text_input: Arc<dyn TextInputProvider> = if cli.gui || capabilities.interactive_input {
        Arc::new(DialogTextInput::new(flag_captions))
    } else {
        Arc::new(FlagTextInput::new(flag_captions))
    };

    let backend = DisplayBackend::from_env();
    let tool = resolve_capture_tool(config.capture_tool, backend);
    log::debug!("Display backend {:?}, capture tool {:?}", backend, tool);

    let deps = PipelineDependencies::system(
        backend,
        tool,
        capabilities.text_overlay,
        text_input,
        std::io::stderr().is_terminal(),
    )?;

    let request = RunRequest {
        region: if cli.full_screen {
            RegionMode::FullScreen
        } else {
            RegionMode::Region
        },
        style,
        domain: config.domain.clone(),
        api_key: config.api_key.clone(),
        save_dir: cli.save_dir.as_deref().map(expand_tilde),
        no_upload: cli.no_upload,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match runtime.block_on(pipeline::run(request, &deps))? {
        RunOutcome::Uploaded(delivered) => {
            println!("{}", delivered.displayed_url);
            if let Some(path) = delivered.saved_to {
                log::info!("Saved to {}", path.display());
            }
        }
        RunOutcome::KeptLocal { saved_to } => match saved_to {
            Some(path) => println!("{}", path.display()),
            None => log::info!("Screenshot copied to clipboard"),
        },
    }

    Ok(())
}

/// Validates every settings flag, then persists them in one write.
///
/// Nothing is written when any value is rejected.
fn apply_cli_settings(cli: &Cli, config: &mut Config, path: &Path) -> Result<()> {
    let mut updated = config.clone();

    if let Some(key) = &cli.api_key {
        updated.set_api_key(key)?;
    }
    if let Some(domain) = &cli.domain {
        updated.set_domain(domain)?;
    }
    if let Some(level) = cli.compression_level {
        updated.set_compression_level(level)?;
    }
    if let Some(file_type) = cli.file_type {
        updated.file_type = file_type;
    }

    if updated != *config {
        updated.save_to(path)?;
        log::info!("Updated settings in {}", path.display());
        *config = updated;
    }
    Ok(())
}

fn report_failure(err: &anyhow::Error) {
    log::error!("{:#}", err);
    eprintln!("ezshot: {:#}", err);

    let body = format!("{:#}", err);
    match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime.block_on(notification::notify_best_effort(
            &DesktopNotifier,
            "Screenshot failed",
            &body,
            Urgency::Critical,
        )),
        Err(e) => log::warn!("Could not send failure notification: {}", e),
    }
}
