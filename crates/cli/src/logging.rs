// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs;
use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// Logs go to `log_path`, or to stderr at debug level when `verbose` is set
/// or the file cannot be opened. `RUST_LOG` overrides the level.
pub fn setup_logging(log_path: &Path, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file = if verbose {
        None
    } else {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok()
    };

    // A subscriber may already be installed, e.g. when run from tests.
    let _ = match file {
        Some(file) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(file)
            .with_ansi(false)
            .try_init(),
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init(),
    };
}
