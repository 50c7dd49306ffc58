// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ll-remote: WebSocket document server for liftlog.
//!
//! Holds the canonical copy of every document and answers reads and writes
//! from liftlog clients. Documents are persisted to SQLite before a write is
//! acknowledged.

mod server;
mod state;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// ll-remote: liftlog document server
#[derive(Parser, Debug)]
#[command(name = "ll-remote")]
#[command(about = "WebSocket document server for liftlog clients")]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1:7890")]
    bind: SocketAddr,

    /// Directory for document storage
    #[arg(short, long, default_value = ".")]
    data: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ll-remote server");
    info!("  Bind address: {}", args.bind);
    info!("  Data directory: {}", args.data.display());

    let state = state::ServerState::open(&args.data)?;
    info!("  Documents: {}", state.len().await);

    server::run(args.bind, state).await?;

    Ok(())
}
