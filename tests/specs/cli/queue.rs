// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for `liftlog queue`: queued writes survive restarts and can be
//! listed and discarded.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn liftlog(temp: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("liftlog");
    cmd.arg("--offline").arg("--data-dir").arg(temp.path());
    cmd
}

fn queued(temp: &TempDir) -> serde_json::Value {
    let output = liftlog(temp)
        .args(["queue", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn empty_queue() {
    let temp = TempDir::new().unwrap();
    liftlog(&temp).args(["login", "u1"]).assert().success();
    liftlog(&temp)
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No queued writes"));
}

#[test]
fn writes_queue_in_order_across_runs() {
    let temp = TempDir::new().unwrap();
    liftlog(&temp)
        .args(["login", "u1", "--nickname", "Jo"])
        .assert()
        .success();
    liftlog(&temp)
        .args(["workout", "new", "Leg Day", "-x", "Squat"])
        .assert()
        .success();

    let records = queued(&temp);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["collectionPath"], "users");
    assert_eq!(records[1]["collectionPath"], "workouts");
    assert_eq!(records[1]["documentId"], "u1");

    liftlog(&temp)
        .args(["queue", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("workouts/u1"));
}

#[test]
fn discard_drops_one_record() {
    let temp = TempDir::new().unwrap();
    liftlog(&temp).args(["login", "u1"]).assert().success();
    liftlog(&temp)
        .args(["workout", "new", "Leg Day"])
        .assert()
        .success();
    let id = queued(&temp)[0]["id"].as_str().unwrap().to_string();

    liftlog(&temp)
        .args(["queue", "discard", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Discarded"));
    assert_eq!(queued(&temp).as_array().unwrap().len(), 0);

    liftlog(&temp)
        .args(["queue", "discard", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("queued mutation not found"));
}
