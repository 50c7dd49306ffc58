// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! llrs - offline-first write sync for the liftlog workout log.
//!
//! This crate provides the `liftlog` CLI around a sync engine that keeps a
//! local mirror of the user's documents writable while the remote document
//! server is unreachable.
//!
//! # Main Components
//!
//! - [`App`] - composition root and session lifecycle
//! - [`WorkoutService`] - write façade: persist, reflect, notify
//! - [`sync`] - mutation queue, connectivity monitor, remote client and engine
//! - [`Config`] - data directory configuration
//! - [`Error`] - error types for all operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use llrs::{App, AppOptions};
//!
//! let app = App::open(&data_dir, AppOptions::default()).await?;
//! app.login("u1").await?;
//! app.service().set_nickname("Jo").await?;
//! ```

mod cli;
mod commands;
mod logging;

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod repository;
pub mod service;
pub mod session;
pub mod sync;

pub use app::{App, AppOptions, AppParts};
pub use cli::{Cli, Command, OutputFormat, QueueCommand, WorkoutCommand};
pub use config::{init_data_dir, resolve_data_dir, Config};
pub use error::{Error, Result};
pub use service::{WorkoutService, WriteOutcome};

use crate::config::log_path;

/// Execute a CLI invocation. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    let Cli {
        offline,
        verbose,
        data_dir,
        command,
    } = cli;
    let data_dir = resolve_data_dir(data_dir.as_deref())?;
    std::fs::create_dir_all(&data_dir)?;
    logging::setup_logging(&log_path(&data_dir), verbose);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(commands::execute(
        &data_dir,
        AppOptions { offline },
        command,
    ))
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
