//! Caption text sources: command-line flags or an interactive prompt.

use std::io::{self, IsTerminal};
use std::process::{Command, Stdio};

use dialoguer::Input;

use crate::caption::Captions;

/// Supplies the caption text for one run.
pub trait TextInputProvider: Send + Sync {
    fn prompt(&self) -> Captions;
}

/// Captions taken verbatim from `-t` / `-b`.
pub struct FlagTextInput {
    captions: Captions,
}

impl FlagTextInput {
    pub fn new(captions: Captions) -> Self {
        Self { captions }
    }
}

impl TextInputProvider for FlagTextInput {
    fn prompt(&self) -> Captions {
        self.captions.clone()
    }
}

/// Asks for captions with a `zenity --entry` dialog.
///
/// Cancelling a dialog leaves that caption empty. Without zenity, a terminal
/// prompt is used when stdin is interactive; otherwise the flag values stay.
pub struct DialogTextInput {
    defaults: Captions,
    command: Vec<String>,
    terminal: bool,
}

impl DialogTextInput {
    pub fn new(defaults: Captions) -> Self {
        Self {
            defaults,
            command: vec!["zenity".to_string()],
            terminal: io::stdin().is_terminal(),
        }
    }

    /// Replaces the dialog program (and any leading arguments).
    pub fn with_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    /// Runs one entry dialog. `Ok(None)` means the user cancelled.
    fn dialog_entry(&self, label: &str, initial: Option<&str>) -> io::Result<Option<String>> {
        let (program, leading) = self
            .command
            .split_first()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no dialog program"))?;

        let output = Command::new(program)
            .args(leading)
            .args(["--entry", "--title", "ezshot", "--text", label])
            .args(["--entry-text", initial.unwrap_or_default()])
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()?;

        if !output.status.success() {
            log::debug!("{} dialog cancelled ({})", label, output.status);
            return Ok(None);
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(text))
    }

    fn terminal_entry(label: &str, initial: Option<&str>) -> Option<String> {
        let mut input = Input::<String>::new().with_prompt(label).allow_empty(true);
        if let Some(initial) = initial {
            input = input.with_initial_text(initial);
        }
        match input.interact_text() {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Failed to read {}: {}", label.to_lowercase(), e);
                None
            }
        }
    }
}

impl TextInputProvider for DialogTextInput {
    fn prompt(&self) -> Captions {
        let top = self.dialog_entry("Top text", self.defaults.top());
        let top = match top {
            Ok(top) => top,
            Err(e) if self.terminal => {
                log::info!("zenity unavailable ({}), prompting on the terminal", e);
                let top = Self::terminal_entry("Top text", self.defaults.top());
                let bottom = Self::terminal_entry("Bottom text", self.defaults.bottom());
                return Captions::new(top, bottom);
            }
            Err(e) => {
                log::warn!(
                    "Interactive text input unavailable ({}); using command-line captions",
                    e
                );
                return self.defaults.clone();
            }
        };

        let bottom = self
            .dialog_entry("Bottom text", self.defaults.bottom())
            .unwrap_or_else(|e| {
                log::warn!("Bottom text dialog failed: {}", e);
                None
            });

        Captions::new(top, bottom)
    }
}
