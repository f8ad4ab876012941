//! Logger setup.
//!
//! Records go to stderr through env_logger. A log file can be attached after
//! the config has been read, from then on every record is written to both.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Name of the log file kept next to the config.
pub const LOG_FILE_NAME: &str = "e-zshot.log";

/// Level used when `RUST_LOG` is not set.
pub fn default_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Level recorded while a log file is attached.
pub const FILE_LEVEL: LevelFilter = LevelFilter::Info;

/// Handle for attaching the log file once its location is known.
#[derive(Clone, Default)]
pub struct LogHandle {
    file: Arc<Mutex<Option<File>>>,
}

impl LogHandle {
    /// Appends all further records to `path`, creating it if needed.
    ///
    /// Info records are let through from then on, unless `RUST_LOG` set a
    /// stricter filter.
    pub fn attach_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        if let Ok(mut slot) = self.file.lock() {
            *slot = Some(file);
        }
        if log::max_level() < FILE_LEVEL {
            log::set_max_level(FILE_LEVEL);
        }
        log::debug!("Logging to {}", path.display());
        Ok(())
    }
}

/// Installs the global logger.
///
/// `RUST_LOG` overrides the level picked from `verbose`. Without it the
/// logger itself admits [`FILE_LEVEL`] records, and the global max level
/// holds stderr at the `verbose` level until a file is attached.
pub fn init(verbose: bool) -> LogHandle {
    let level = default_level(verbose);
    let env_filter = std::env::var_os(env_logger::DEFAULT_FILTER_ENV).is_some();

    let handle = LogHandle::default();
    let tee = Tee {
        primary: io::stderr(),
        file: Arc::clone(&handle.file),
    };

    let mut builder = Builder::new();
    builder
        .filter_level(level.max(FILE_LEVEL))
        .parse_env(Env::default())
        .target(Target::Pipe(Box::new(tee)));

    match builder.try_init() {
        Ok(()) if !env_filter => log::set_max_level(level),
        Ok(()) => {}
        Err(_) => log::debug!("Logger already initialized"),
    }
    handle
}

/// Writes to a primary sink and, when attached, to a file.
struct Tee<W> {
    primary: W,
    file: Arc<Mutex<Option<File>>>,
}

impl<W: Write> Write for Tee<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.primary.write_all(buf)?;
        if let Ok(mut slot) = self.file.lock()
            && let Some(file) = slot.as_mut()
        {
            // File write errors are dropped; stderr already has the record
            let _ = file.write_all(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()?;
        if let Ok(mut slot) = self.file.lock()
            && let Some(file) = slot.as_mut()
        {
            file.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn verbose_enables_debug() {
        assert_eq!(default_level(false), LevelFilter::Warn);
        assert_eq!(default_level(true), LevelFilter::Debug);
    }

    #[test]
    fn attaching_a_file_admits_info_records() {
        let temp = TempDir::new().unwrap();
        log::set_max_level(LevelFilter::Warn);

        LogHandle::default()
            .attach_file(&temp.path().join(LOG_FILE_NAME))
            .unwrap();

        assert!(log::max_level() >= LevelFilter::Info);
    }

    #[test]
    fn tee_copies_to_attached_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join(LOG_FILE_NAME);
        let handle = LogHandle::default();

        let mut tee = Tee {
            primary: Vec::new(),
            file: Arc::clone(&handle.file),
        };
        tee.write_all(b"before\n").unwrap();
        handle.attach_file(&path).unwrap();
        tee.write_all(b"after\n").unwrap();
        tee.flush().unwrap();

        assert_eq!(tee.primary, b"before\nafter\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "after\n");
    }
}
