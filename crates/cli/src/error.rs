// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{QueueError, RemoteError};

/// All possible errors that can occur in the llrs library.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not logged in: run 'liftlog login <user>' first")]
    NotLoggedIn,

    #[error("already logged in as {0}\n  hint: run 'liftlog logout' first")]
    AlreadyLoggedIn(String),

    #[error("session is still loading\n  hint: retry once login has finished")]
    SessionLoading,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("workout not found: {0}\n  hint: run 'liftlog workout list' to see workout ids")]
    WorkoutNotFound(String),

    #[error("workout id '{0}' contains '.' and cannot be changed from here\n  hint: each id is a field name in the workouts document, so a dotted id reads as a nested path")]
    DottedWorkoutId(String),

    #[error("exercise '{exercise}' is not part of workout {workout}")]
    ExerciseNotFound { workout: String, exercise: String },

    #[error("queued mutation not found: {0}\n  hint: run 'liftlog queue list' to see queued ids")]
    MutationNotFound(String),

    #[error("{0} unsynced write(s) would be lost\n  hint: run 'liftlog sync' first, or pass --force")]
    UnsyncedWrites(usize),

    #[error("invalid entry '{entry}': {reason}\n  hint: entries look like <exercise>=80x10@1.30,85x8")]
    InvalidEntry { entry: String, reason: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(ll_core::Error),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for llrs operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ll_core::Error> for Error {
    fn from(e: ll_core::Error) -> Self {
        match e {
            ll_core::Error::InvalidInput(s) => Error::InvalidInput(s),
            ll_core::Error::Io(e) => Error::Io(e),
            ll_core::Error::Json(e) => Error::Json(e),
            other => Error::Core(other),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
