//! Tracing setup: stderr output plus an optional file sink.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "PAYDAY_LOG";

/// Filter for the subscriber: `debug` when verbose, else `PAYDAY_LOG`, else `info`.
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Installs the global subscriber.
///
/// A log file that cannot be opened is reported once and logging continues
/// on stderr alone.
pub fn init(verbose: bool, log_file: Option<&Path>) {
    let (sink, open_error) = match log_file.map(open_append) {
        Some(Ok(file)) => (Some(file), None),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };
    let file_layer = sink.map(|file| {
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(Mutex::new(file))
    });

    // try_init: a subscriber may already be installed (e.g., in tests)
    let _ = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(file_layer)
        .try_init();

    if let (Some(path), Some(err)) = (log_file, open_error) {
        tracing::warn!(path = %path.display(), error = %err, "failed to open log file");
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}
