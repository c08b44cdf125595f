//! Tracing initialization.

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::sync::{Mutex, Once};

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Where log lines may go when `OCEAN_LOG_FILE` is not set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// CLI commands: stderr, so stdout stays clean for tables and JSON.
    Stderr,
    /// The TUI owns the terminal; without a log file nothing is written.
    FileOnly,
}

/// Initialize the tracing subscriber.
///
/// Reads `OCEAN_LOG` for the filter (default `ocean_dash=info`) and
/// `OCEAN_LOG_FILE` for an append-only log file. Idempotent.
pub fn init(target: LogTarget) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("OCEAN_LOG").unwrap_or_else(|_| EnvFilter::new("ocean_dash=info"));

        let file = std::env::var_os("OCEAN_LOG_FILE").and_then(|path| match open_log_file(&path) {
            Ok(file) => Some(file),
            Err(err) => {
                eprintln!("{err}");
                None
            }
        });

        let result = match (file, target) {
            (Some(file), _) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file))
                .try_init(),
            (None, LogTarget::Stderr) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .try_init(),
            (None, LogTarget::FileOnly) => Ok(()),
        };

        if let Err(err) = result {
            eprintln!("logging disabled: {err}");
        }
    });
}

/// Open `path` for appending, with the path in the error message.
fn open_log_file(path: &OsStr) -> Result<File, String> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("cannot open log file '{}': {e}", path.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unopenable_log_file_reports_path() {
        let dir = std::env::temp_dir().join("ocean-dash-missing-dir").join("nested");
        let path = dir.join("ocean.log");
        let err = open_log_file(path.as_os_str()).unwrap_err();
        assert!(err.contains("cannot open log file"), "{err}");
        assert!(err.contains("ocean.log"), "{err}");
    }

    #[test]
    fn log_file_is_opened_for_append() {
        let path = std::env::temp_dir().join(format!("ocean-dash-log-{}.log", std::process::id()));
        assert!(open_log_file(path.as_os_str()).is_ok());
        let _ = std::fs::remove_file(path);
    }
}
