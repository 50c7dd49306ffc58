// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for `liftlog workout` and `liftlog log`, run offline.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use yare::parameterized;

fn liftlog(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("liftlog");
    cmd.arg("--offline").arg("--data-dir").arg(temp.path());
    cmd
}

/// Logs in and creates a workout with Squat and Lunge; returns its id.
fn with_workout() -> (TempDir, String) {
    let temp = TempDir::new().unwrap();
    liftlog(&temp).args(["login", "u1"]).assert().success();
    liftlog(&temp)
        .args(["workout", "new", "Leg Day", "-x", "Squat", "-x", "Lunge"])
        .assert()
        .success();

    let output = liftlog(&temp)
        .args(["workout", "list", "-o", "json"])
        .output()
        .unwrap();
    let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let id = list[0]["id"].as_str().unwrap().to_string();
    (temp, id)
}

#[test]
fn new_workout_is_queued_and_listed() {
    let temp = TempDir::new().unwrap();
    liftlog(&temp).args(["login", "u1"]).assert().success();
    liftlog(&temp)
        .args(["workout", "new", "Leg Day", "-x", "Squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created workout leg_day_"))
        .stdout(predicate::str::contains("saved offline"));

    liftlog(&temp)
        .args(["workout", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Leg Day  (1 exercise(s), 0 session(s))"));
}

#[test]
fn show_unknown_workout_fails() {
    let (temp, _) = with_workout();
    liftlog(&temp)
        .args(["workout", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("workout not found: nope"));
}

#[test]
fn log_session_shows_as_last_performance() {
    let (temp, id) = with_workout();
    liftlog(&temp)
        .args(["log", &id, "-e", "squat=80x10@1.30,85x8", "--date", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 2 set(s) of 1 exercise(s)"));

    liftlog(&temp)
        .args(["workout", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("last 2024-01-01: 80x10@1.30, 85x8"));
}

#[parameterized(
    no_sets = { "squat=" },
    no_value = { "squat=x" },
    unknown_exercise = { "deadlift=100x5" },
)]
fn log_rejects_bad_entries(entry: &str) {
    let (temp, id) = with_workout();
    liftlog(&temp).args(["log", &id, "-e", entry]).assert().failure();
}

#[test]
fn log_rejects_bad_date() {
    let (temp, id) = with_workout();
    liftlog(&temp)
        .args(["log", &id, "-e", "squat=80x10", "--date", "01/02/2024"])
        .assert()
        .failure();
}

#[test]
fn edit_and_remove() {
    let (temp, id) = with_workout();
    liftlog(&temp)
        .args(["workout", "edit", &id, "--name", "Legs", "-x", "Squat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated workout"));
    liftlog(&temp)
        .args(["workout", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Legs ("))
        .stdout(predicate::str::contains("Lunge").not());

    liftlog(&temp).args(["workout", "rm", &id]).assert().success();
    liftlog(&temp)
        .args(["workout", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts"));
}
