// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::app::App;
use crate::error::Result;
use crate::sync::ReplayOutcome;

pub async fn run(app: &App) -> Result<()> {
    app.resume()?;
    if !app.is_online() {
        let pending = app.engine().state().pending_count;
        println!("Offline: {pending} write(s) stay queued");
        return Ok(());
    }

    let outcomes = app.refresh().await?;
    if outcomes.is_empty() {
        println!("Nothing to sync");
    }
    for line in failure_lines(&outcomes) {
        println!("{line}");
    }
    Ok(())
}

/// One line per record the remote refused.
pub(crate) fn failure_lines(outcomes: &[ReplayOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .filter(|o| !o.success)
        .map(|o| {
            format!(
                "failed {} {} {}: {}",
                o.record.id,
                o.record.kind.name(),
                o.record.target,
                o.error.as_deref().unwrap_or("unknown error")
            )
        })
        .collect()
}

/// Runs until Ctrl-C, replaying the queue whenever the network returns.
pub async fn watch(app: &mut App) -> Result<()> {
    let session = app.resume()?;
    println!(
        "Watching for {} ({}), Ctrl-C to stop",
        session.user_id,
        if app.is_online() { "online" } else { "offline" }
    );
    if app.is_online() {
        app.refresh().await?;
    }
    super::print_notifications(app);

    let cancel = CancellationToken::new();
    let tasks = app.spawn_background(cancel.clone());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            note = app.next_notification() => match note {
                Some(note) => println!("{note}"),
                None => break,
            },
        }
    }
    info!("watch stopped");
    cancel.cancel();
    for task in tasks {
        let _ = task.await;
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
