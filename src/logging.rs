//! Audit log setup.
//!
//! Every message the engine emits goes through `tracing`. The subscriber
//! installed here appends those events, timestamped and severity-tagged, to a
//! plain-text log file, and optionally echoes them to stderr.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Default audit log file name, created in the working directory.
pub const DEFAULT_LOG_FILE: &str = "dirsort.log";

/// Installs the global subscriber.
///
/// The file layer records `info` and above unless `RUST_LOG` says otherwise.
/// With `verbose` set, `debug` events are also printed to stderr.
///
/// # Errors
///
/// Fails if the log file cannot be opened for appending or a global
/// subscriber is already installed.
pub fn init(log_file: &Path, verbose: bool) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .map_err(|e| anyhow::anyhow!("cannot open log file {}: {e}", log_file.display()))?;

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .with_filter(env_filter("info"));

    let console_layer = verbose.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(env_filter("debug"))
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    Ok(())
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
