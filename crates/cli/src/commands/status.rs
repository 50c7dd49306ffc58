// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;

use crate::app::App;
use crate::cli::OutputFormat;
use crate::error::{Error, Result};
use crate::sync::SyncState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusReport {
    user: Option<String>,
    nickname: Option<String>,
    workouts: usize,
    #[serde(flatten)]
    sync: SyncState,
}

pub fn run(app: &App, output: OutputFormat) -> Result<()> {
    let report = collect(app)?;
    match output {
        OutputFormat::Text => println!("{}", format_status(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

pub(crate) fn collect(app: &App) -> Result<StatusReport> {
    let (user, nickname, workouts) = match app.resume() {
        Ok(session) => (
            Some(session.user_id),
            app.state().nickname()?,
            app.state().workouts()?.len(),
        ),
        Err(Error::NotLoggedIn) => (None, None, 0),
        Err(e) => return Err(e),
    };
    Ok(StatusReport {
        user,
        nickname,
        workouts,
        sync: app.engine().state(),
    })
}

pub(crate) fn format_status(report: &StatusReport) -> String {
    let user = match (&report.user, &report.nickname) {
        (Some(user), Some(nickname)) => format!("{user} ({nickname})"),
        (Some(user), None) => user.clone(),
        (None, _) => "not logged in".to_string(),
    };
    let last_sync = report
        .sync
        .last_sync_time
        .map(ll_core::iso8601)
        .unwrap_or_else(|| "never".to_string());
    let mut lines = vec![
        format!("User:      {user}"),
        format!(
            "Network:   {}",
            if report.sync.is_online { "online" } else { "offline" }
        ),
        format!("Pending:   {} write(s)", report.sync.pending_count),
        format!("Last sync: {last_sync}"),
    ];
    if report.user.is_some() {
        lines.push(format!("Workouts:  {}", report.workouts));
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
