// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn manual_clock_is_frozen_until_moved() {
    let clock = ManualClock::at("2024-01-01T10:00:00Z").unwrap();
    let first = clock.now();
    assert_eq!(clock.now(), first);

    clock.advance(Duration::seconds(90));
    assert_eq!(clock.now() - first, Duration::seconds(90));
}

#[test]
fn manual_clock_rejects_garbage() {
    assert!(ManualClock::at("yesterday").is_err());
}

#[test]
fn iso8601_uses_millis_and_z_suffix() {
    let clock = ManualClock::at("2024-03-05T07:08:09.123Z").unwrap();
    assert_eq!(iso8601(clock.now()), "2024-03-05T07:08:09.123Z");
}

#[test]
fn now_ms_matches_timestamp() {
    let clock = ManualClock::at("1970-01-01T00:00:01Z").unwrap();
    assert_eq!(clock.now_ms(), 1000);
}

#[test]
fn clock_ref_delegates() {
    let clock = ManualClock::at("2024-01-01T00:00:00Z").unwrap();
    let by_ref: &ManualClock = &clock;
    assert_eq!(ClockSource::now(&by_ref), clock.now());
}

#[test]
fn system_clock_is_recent() {
    let now = SystemClock.now();
    assert!(now.timestamp() > 1_600_000_000);
}

#[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
struct Stamped {
    #[serde(with = "iso_millis")]
    at: DateTime<Utc>,
    #[serde(default, with = "iso_millis::option")]
    maybe: Option<DateTime<Utc>>,
}

#[test]
fn iso_millis_serde_adapter() {
    let at = ManualClock::at("2024-01-01T00:00:00Z").unwrap().now();
    let stamped = Stamped { at, maybe: None };
    let json = serde_json::to_value(&stamped).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"at": "2024-01-01T00:00:00.000Z", "maybe": null})
    );
    assert_eq!(serde_json::from_value::<Stamped>(json).unwrap(), stamped);
}

#[test]
fn iso_millis_option_tolerates_non_strings() {
    let parsed: Stamped = serde_json::from_value(serde_json::json!({
        "at": "2024-01-01T00:00:00Z",
        "maybe": {"seconds": 1}
    }))
    .unwrap();
    assert_eq!(parsed.maybe, None);
}
