// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ll-core operations.

use thiserror::Error;

/// All possible errors that can occur in ll-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("invalid field path: '{0}'\n  hint: segments are non-empty and separated by '.'")]
    InvalidFieldPath(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("invalid exercise type: '{0}'\n  hint: valid types are: muscu, cardio, hiit, etirement, poids")]
    InvalidExerciseType(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage error: {0}")]
    Storage(String),
}

/// A specialized Result type for ll-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
