// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Value parsers for structured CLI arguments.

use ll_core::ExerciseType;

/// An exercise given on the command line as `<name>[:<type>]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseArg {
    pub name: String,
    pub kind: ExerciseType,
}

/// Parses `<name>[:<type>]`; the type defaults to `muscu`.
pub fn parse_exercise(s: &str) -> Result<ExerciseArg, String> {
    let (name, kind) = match s.rsplit_once(':') {
        Some((name, kind)) => (
            name,
            kind.trim().parse::<ExerciseType>().map_err(|e| e.to_string())?,
        ),
        None => (s, ExerciseType::default()),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err("exercise name cannot be empty".to_string());
    }
    Ok(ExerciseArg {
        name: name.to_string(),
        kind,
    })
}
