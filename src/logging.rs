//! Logging configuration and initialization.
//!
//! Uses tracing with environment-based filtering. Sync runs can also mirror
//! events to a JSON log file for later inspection.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::{Mutex, Once};

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{Result, SyncError};

/// Initialize logging for the CLI.
///
/// `RUST_LOG` wins when set; otherwise the filter is derived from the
/// verbosity and quiet flags.
///
/// # Errors
///
/// Returns an error if the filter cannot be built, the log file cannot be
/// created, or a global subscriber is already installed.
pub fn init_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbosity, quiet)))
        .map_err(|e| SyncError::Config(format!("invalid log filter: {e}")))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(std::io::stderr().is_terminal());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);

    if let Some(path) = log_file {
        let file = std::fs::File::create(path)?;
        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .json();
        tracing::subscriber::set_global_default(subscriber.with(file_layer))
            .map_err(|e| SyncError::Config(format!("logging init failed: {e}")))?;
    } else {
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| SyncError::Config(format!("logging init failed: {e}")))?;
    }

    Ok(())
}

fn default_filter(verbosity: u8, quiet: bool) -> String {
    if quiet {
        return "error".to_string();
    }

    match verbosity {
        0 => "sheetsync=info".to_string(),
        1 => "sheetsync=debug".to_string(),
        _ => "sheetsync=trace".to_string(),
    }
}

/// Initialize logging for tests with the test writer.
pub fn init_test_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("sheetsync=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}
