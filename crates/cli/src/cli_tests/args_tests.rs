// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use ll_core::ExerciseType;
use yare::parameterized;

#[parameterized(
    bare_name = { "Squat", "Squat", ExerciseType::Muscu },
    with_type = { "Run:cardio", "Run", ExerciseType::Cardio },
    type_is_case_insensitive = { "Plank:HIIT", "Plank", ExerciseType::Hiit },
    trims_spaces = { " Bench press : poids ", "Bench press", ExerciseType::Poids },
    last_colon_splits = { "a:b:etirement", "a:b", ExerciseType::Etirement },
)]
fn test_parse_exercise(input: &str, name: &str, kind: ExerciseType) {
    let arg = parse_exercise(input).unwrap();
    assert_eq!(arg.name, name);
    assert_eq!(arg.kind, kind);
}

#[parameterized(
    empty = { "" },
    blank_name = { " :cardio" },
    unknown_type = { "Squat:yoga" },
)]
fn test_parse_exercise_rejects(input: &str) {
    assert!(parse_exercise(input).is_err());
}
