// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::app::App;
use crate::error::{Error, Result};

pub async fn login(app: &App, user: &str, nickname: Option<&str>) -> Result<()> {
    let session = app.login(user).await?;
    if let Some(nickname) = nickname {
        app.service().set_nickname(nickname).await?;
    }

    let workouts = app.state().workouts()?.len();
    let greeting = match app.state().nickname()? {
        Some(nickname) => format!("{} ({nickname})", session.user_id),
        None => session.user_id.clone(),
    };
    println!(
        "Logged in as {greeting}{}",
        if app.is_online() { "" } else { " (offline)" }
    );
    println!("{workouts} workout(s)");
    let pending = app.engine().state().pending_count;
    if pending > 0 {
        println!("{pending} write(s) waiting to sync");
    }
    Ok(())
}

pub fn logout(app: &App, force: bool) -> Result<()> {
    let pending = app.pending()?.len();
    if pending > 0 && !force {
        return Err(Error::UnsyncedWrites(pending));
    }
    app.logout()?;
    println!("Logged out");
    Ok(())
}

#[cfg(test)]
#[path = "account_tests.rs"]
mod tests;
