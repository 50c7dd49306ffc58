// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod account;
pub mod init;
pub mod log;
pub mod queue;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod workout;

use std::path::Path;

use crate::app::{App, AppOptions};
use crate::cli::{Command, QueueCommand, WorkoutCommand};
use crate::error::Result;

/// Runs one command against the data directory.
pub async fn execute(data_dir: &Path, options: AppOptions, command: Command) -> Result<()> {
    let command = match command {
        Command::Init { remote } => return init::run(data_dir, remote),
        other => other,
    };
    let mut app = App::open(data_dir, options).await?;
    let result = dispatch(&mut app, command).await;
    print_notifications(&mut app);
    result
}

async fn dispatch(app: &mut App, command: Command) -> Result<()> {
    match command {
        // Handled before the app opens.
        Command::Init { .. } => Ok(()),
        Command::Login { user, nickname } => account::login(app, &user, nickname.as_deref()).await,
        Command::Logout { force } => account::logout(app, force),
        Command::Status { output } => status::run(app, output),
        Command::Sync => sync::run(app).await,
        Command::Watch => sync::watch(app).await,
        Command::Queue(QueueCommand::List { output }) => queue::list(app, output),
        Command::Queue(QueueCommand::Discard { id }) => queue::discard(app, &id),
        Command::Workout(cmd) => match cmd {
            WorkoutCommand::New {
                name,
                description,
                exercises,
            } => workout::new(app, name, description, exercises).await,
            WorkoutCommand::List { output } => workout::list(app, output),
            WorkoutCommand::Show { id, output } => workout::show(app, &id, output),
            WorkoutCommand::Edit {
                id,
                name,
                description,
                exercises,
            } => workout::edit(app, &id, name, description, exercises).await,
            WorkoutCommand::Rm { id } => workout::rm(app, &id).await,
        },
        Command::Log {
            workout,
            entry,
            note,
            date,
        } => log::run(app, &workout, &entry, &note, date.as_deref()).await,
    }
}

/// Prints notifications raised while the command ran.
pub fn print_notifications(app: &mut App) {
    for note in app.take_notifications() {
        println!("{note}");
    }
}
