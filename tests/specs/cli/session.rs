// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Rust specs for `liftlog init`, `login`, `status` and `logout`.

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

fn logged_in() -> TempDir {
    let temp = TempDir::new().unwrap();
    liftlog(&temp).arg("login").arg("u1").assert().success();
    temp
}

#[test]
fn init_writes_config_once() {
    let temp = TempDir::new().unwrap();
    liftlog(&temp)
        .args(["init", "--remote", "ws://127.0.0.1:9"])
        .assert()
        .success();
    let config = std::fs::read_to_string(temp.path().join("config.toml")).unwrap();
    assert!(config.contains("ws://127.0.0.1:9"));

    liftlog(&temp)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_rejects_non_websocket_url() {
    let temp = TempDir::new().unwrap();
    liftlog(&temp)
        .args(["init", "--remote", "http://example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ws://"));
}

#[test]
fn login_offline_reports_queue() {
    let temp = TempDir::new().unwrap();
    liftlog(&temp)
        .args(["login", "u1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as u1 (offline)"));
}

#[test]
fn login_as_other_user_fails() {
    let temp = logged_in();
    liftlog(&temp)
        .args(["login", "u2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already logged in as u1"));
}

#[test]
fn status_before_login() {
    let temp = TempDir::new().unwrap();
    liftlog(&temp)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Network:   offline"))
        .stdout(predicate::str::contains("Last sync: never"));
}

#[test]
fn status_json_is_camel_case() {
    let temp = logged_in();
    let output = liftlog(&temp).args(["status", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["user"], "u1");
    assert_eq!(json["isOnline"], false);
    assert_eq!(json["pendingCount"], 0);
    assert!(json["lastSyncTime"].is_null());
}

#[test]
fn logout_refuses_to_drop_queued_writes() {
    let temp = logged_in();
    liftlog(&temp)
        .args(["workout", "new", "Leg Day", "-x", "Squat"])
        .assert()
        .success();

    liftlog(&temp)
        .arg("logout")
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 unsynced write(s)"));

    liftlog(&temp).args(["logout", "--force"]).assert().success();
    liftlog(&temp)
        .args(["workout", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn sync_offline_keeps_writes() {
    let temp = logged_in();
    liftlog(&temp)
        .args(["workout", "new", "Leg Day"])
        .assert()
        .success();
    liftlog(&temp)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 write(s) stay queued"));
}
