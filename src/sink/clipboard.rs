//! Clipboard integration for URLs and images.

use std::io::Write;
use std::process::{Command, Stdio};

use wl_clipboard_rs::copy::{MimeType, Options, ServeRequests, Source};

use super::types::SinkError;
use crate::capture::DisplayBackend;

/// MIME type for copied URLs.
pub const TEXT_MIME: &str = "text/plain;charset=utf-8";

/// Copy data to the session clipboard.
///
/// On Wayland the wl-copy command is preferred, with wl-clipboard-rs as a
/// fallback. On X11, xclip is used.
pub fn copy_to_clipboard(
    backend: DisplayBackend,
    data: &[u8],
    mime_type: &str,
) -> Result<(), SinkError> {
    log::debug!(
        "Copying {} bytes of {} to the {:?} clipboard",
        data.len(),
        mime_type,
        backend
    );

    match backend {
        DisplayBackend::Wayland => copy_wayland(data, mime_type),
        DisplayBackend::X11 => {
            pipe_to_command("xclip", &xclip_args(mime_type), data)?;
            log::info!("Copied to clipboard via xclip");
            Ok(())
        }
    }
}

/// xclip arguments for `mime_type`.
///
/// Text is offered without `-t` so xclip serves the usual string targets
/// (`UTF8_STRING`, `STRING`); other data is offered under its MIME type only.
fn xclip_args(mime_type: &str) -> Vec<&str> {
    let mut args = vec!["-selection", "clipboard"];
    if mime_type != TEXT_MIME {
        args.extend(["-t", mime_type]);
    }
    args
}

fn copy_wayland(data: &[u8], mime_type: &str) -> Result<(), SinkError> {
    match pipe_to_command("wl-copy", &["--type", mime_type], data) {
        Ok(()) => {
            log::info!("Copied to clipboard via wl-copy");
            Ok(())
        }
        Err(cmd_err) => {
            log::warn!(
                "wl-copy command path failed ({}). Falling back to wl-clipboard-rs",
                cmd_err
            );
            copy_via_library(data, mime_type).map_err(|lib_err| {
                SinkError::Clipboard(format!(
                    "wl-copy failed: {} ; wl-clipboard-rs failed: {}",
                    cmd_err, lib_err
                ))
            })?;
            log::info!("Copied to clipboard via wl-clipboard-rs fallback");
            Ok(())
        }
    }
}

/// Copy using the wl-clipboard-rs library.
fn copy_via_library(data: &[u8], mime_type: &str) -> Result<(), SinkError> {
    let mut opts = Options::new();

    // Serve one paste then exit
    opts.serve_requests(ServeRequests::Only(1));

    let mime = if mime_type == TEXT_MIME {
        MimeType::Text
    } else {
        MimeType::Specific(mime_type.to_string())
    };

    opts.copy(Source::Bytes(data.into()), mime)
        .map_err(|e| SinkError::Clipboard(format!("wl-clipboard-rs error: {}", e)))
}

/// Spawn `program`, feed `data` on stdin and wait for it.
fn pipe_to_command(program: &str, args: &[&str], data: &[u8]) -> Result<(), SinkError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            SinkError::Clipboard(format!("Failed to spawn {} (is it installed?): {}", program, e))
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(data).map_err(|e| {
            SinkError::Clipboard(format!("Failed to write to {} stdin: {}", program, e))
        })?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| SinkError::Clipboard(format!("Failed to wait for {}: {}", program, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SinkError::Clipboard(format!(
            "{} failed: {}",
            program,
            stderr.trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_a_clipboard_error() {
        let err = pipe_to_command("ezshot-no-such-clipboard-tool", &[], b"x").unwrap_err();
        assert!(matches!(err, SinkError::Clipboard(msg) if msg.contains("is it installed")));
    }

    #[test]
    fn failing_program_reports_stderr() {
        let err = pipe_to_command("sh", &["-c", "cat >/dev/null; echo nope >&2; exit 1"], b"data")
            .unwrap_err();
        assert!(matches!(err, SinkError::Clipboard(msg) if msg.contains("nope")));
    }

    #[test]
    fn xclip_offers_text_under_string_targets() {
        assert_eq!(xclip_args(TEXT_MIME), vec!["-selection", "clipboard"]);
    }

    #[test]
    fn xclip_offers_images_under_their_mime_type() {
        assert_eq!(
            xclip_args("image/png"),
            vec!["-selection", "clipboard", "-t", "image/png"]
        );
    }

    #[test]
    fn stdin_is_delivered() {
        pipe_to_command("sh", &["-c", "test \"$(cat)\" = hello"], b"hello").unwrap();
    }
}
