// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::{parse_exercise, ExerciseArg};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A workout log that keeps working offline")]
#[command(
    long_about = "A workout log that keeps working offline.\n\n\
    Writes go straight to the remote document server when it is reachable, and \
    are queued locally and replayed in order when it is not."
)]
pub struct Cli {
    /// Never touch the network; every write is queued
    #[arg(long, global = true)]
    pub offline: bool,

    /// Log debug output to stderr instead of the log file
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Data directory [default: $LIFTLOG_DATA_DIR, then the platform data dir]
    #[arg(long, global = true, value_name = "path")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the data directory and config file
    #[command(after_help = "\
Examples:
  liftlog init                                 Use the default remote
  liftlog init --remote wss://sync.example     Use another document server")]
    Init {
        /// Remote document server URL (ws:// or wss://)
        #[arg(long, value_name = "URL")]
        remote: Option<String>,
    },

    /// Start a session for a user
    Login {
        /// User id
        #[arg(value_parser = non_empty_string)]
        user: String,

        /// Set the profile nickname
        #[arg(long)]
        nickname: Option<String>,
    },

    /// End the session and forget all local data
    Logout {
        /// Log out even if writes are still queued
        #[arg(long)]
        force: bool,
    },

    /// Show session, connectivity and queue state
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Replay queued writes and refresh from the remote
    Sync,

    /// Stay running and replay queued writes whenever the network returns
    Watch,

    /// Inspect or edit the queue of unsynced writes
    #[command(subcommand)]
    Queue(QueueCommand),

    /// Manage workouts
    #[command(subcommand)]
    Workout(WorkoutCommand),

    /// Record a session of a workout
    #[command(after_help = "\
Examples:
  liftlog log leg_day_1 -e squat=80x10@1.30,85x8      Two sets of squats
  liftlog log leg_day_1 -e squat=80x10 -e lunge=x12   Two exercises, no weight for lunges
  liftlog log leg_day_1 -e run=@25.00 --note run=easy  Interval only, with a note
  liftlog log leg_day_1 -e squat=last                  Repeat the last session's squats
  liftlog log leg_day_1 -e squat=80x10 --date 2024-01-01")]
    Log {
        /// Workout id
        workout: String,

        /// <exercise>=<weight>x<reps>[@<interval>],... or <exercise>=last (exercise id or name)
        #[arg(long, short, required = true, value_name = "ENTRY")]
        entry: Vec<String>,

        /// <exercise>=<text>
        #[arg(long, value_name = "NOTE")]
        note: Vec<String>,

        /// Session date, YYYY-MM-DD [default: today]
        #[arg(long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum QueueCommand {
    /// List queued writes, oldest first
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Drop a queued write without sending it
    Discard {
        /// Queued write id
        id: String,
    },
}

#[derive(Subcommand)]
pub enum WorkoutCommand {
    /// Create a workout
    #[command(after_help = "\
Examples:
  liftlog workout new \"Leg Day\" -x Squat -x Lunge
  liftlog workout new \"Cardio\" -x Run:cardio -d \"Easy pace\"")]
    New {
        /// Workout name
        #[arg(value_parser = non_empty_string)]
        name: String,

        /// Description
        #[arg(long, short)]
        description: Option<String>,

        /// Exercise as <name>[:<type>] (muscu, cardio, hiit, etirement, poids)
        #[arg(long = "exercise", short = 'x', value_parser = parse_exercise)]
        exercises: Vec<ExerciseArg>,
    },

    /// List workouts
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show a workout with its last recorded performance
    Show {
        /// Workout id
        id: String,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Change a workout's name, description or exercises
    Edit {
        /// Workout id
        id: String,

        /// New name
        #[arg(long, value_parser = non_empty_string)]
        name: Option<String>,

        /// New description
        #[arg(long, short)]
        description: Option<String>,

        /// Replace the exercise list, <name>[:<type>] (repeat for each)
        #[arg(long = "exercise", short = 'x', value_parser = parse_exercise)]
        exercises: Vec<ExerciseArg>,
    },

    /// Delete a workout
    Rm {
        /// Workout id
        id: String,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
