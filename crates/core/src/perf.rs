// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Performance history encoding.
//!
//! A workout's `perf` map is keyed by session date, then by exercise id. Each
//! exercise entry is a flat map with numbered fields per set:
//!
//! ```json
//! { "exoOrder": "0", "note": "felt heavy", "weight0": "80", "reps0": "10", "interval0": "1.30" }
//! ```
//!
//! Values are the strings the user typed. Keys outside this encoding are kept
//! verbatim in [`ExercisePerformance::extra`] so decoding then encoding
//! reproduces the stored map exactly.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

const ORDER_KEY: &str = "exoOrder";
const NOTE_KEY: &str = "note";

/// All sessions of one workout: date → exercise id → performance.
pub type Performance = BTreeMap<String, DayPerformance>;

/// One session: exercise id → performance.
pub type DayPerformance = BTreeMap<String, ExercisePerformance>;

/// Which value of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Weight,
    Reps,
    Interval,
}

impl SetField {
    const ALL: [SetField; 3] = [SetField::Weight, SetField::Reps, SetField::Interval];

    /// Wire key prefix.
    pub fn prefix(self) -> &'static str {
        match self {
            SetField::Weight => "weight",
            SetField::Reps => "reps",
            SetField::Interval => "interval",
        }
    }

    /// Wire key for set `index`, e.g. `reps2`.
    pub fn key(self, index: u32) -> String {
        format!("{}{index}", self.prefix())
    }
}

/// Values recorded for one set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetPerformance {
    pub weight: Option<String>,
    pub reps: Option<String>,
    pub interval: Option<String>,
}

impl SetPerformance {
    /// Builds a set, treating empty strings as not entered.
    pub fn new(weight: &str, reps: &str, interval: &str) -> Self {
        let keep = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        SetPerformance {
            weight: keep(weight),
            reps: keep(reps),
            interval: keep(interval),
        }
    }

    pub fn get(&self, field: SetField) -> Option<&str> {
        match field {
            SetField::Weight => self.weight.as_deref(),
            SetField::Reps => self.reps.as_deref(),
            SetField::Interval => self.interval.as_deref(),
        }
    }

    fn slot(&mut self, field: SetField) -> &mut Option<String> {
        match field {
            SetField::Weight => &mut self.weight,
            SetField::Reps => &mut self.reps,
            SetField::Interval => &mut self.interval,
        }
    }

    /// Returns true when no value was recorded.
    pub fn is_empty(&self) -> bool {
        self.weight.is_none() && self.reps.is_none() && self.interval.is_none()
    }
}

/// Performance of one exercise in one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct ExercisePerformance {
    /// Position of the exercise in the session (`exoOrder`).
    pub order: Option<u32>,
    pub note: Option<String>,
    /// Set index → values.
    pub sets: BTreeMap<u32, SetPerformance>,
    /// Keys outside the canonical encoding, kept verbatim.
    pub extra: Map<String, Value>,
}

impl ExercisePerformance {
    /// Builds an entry from entered sets, dropping empty values and notes.
    ///
    /// Sets keep their position, so a skipped set leaves a gap in numbering.
    pub fn from_sets(order: u32, note: Option<&str>, sets: Vec<SetPerformance>) -> Self {
        let note = note.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string);
        let sets = (0u32..)
            .zip(sets)
            .filter(|(_, set)| !set.is_empty())
            .collect();
        ExercisePerformance {
            order: Some(order),
            note,
            sets,
            extra: Map::new(),
        }
    }

    /// Number of consecutive sets from index 0 holding any value.
    pub fn set_count(&self) -> u32 {
        (0u32..)
            .take_while(|i| self.sets.get(i).is_some_and(|s| !s.is_empty()))
            .count() as u32
    }

    /// Number of sets with any value, gaps included.
    pub fn recorded_sets(&self) -> usize {
        self.sets.values().filter(|s| !s.is_empty()).count()
    }

    /// Value recorded for `field` of set `index`.
    pub fn value(&self, index: u32, field: SetField) -> Option<&str> {
        self.sets.get(&index).and_then(|s| s.get(field))
    }

    fn decode(map: Map<String, Value>) -> Self {
        let mut perf = ExercisePerformance::default();
        for (key, value) in map {
            let s = match value {
                Value::String(s) => s,
                other => {
                    perf.extra.insert(key, other);
                    continue;
                }
            };
            if key == ORDER_KEY {
                if let Some(order) = canonical_index(&s) {
                    perf.order = Some(order);
                    continue;
                }
            } else if key == NOTE_KEY {
                perf.note = Some(s);
                continue;
            } else if let Some((field, index)) = set_key(&key) {
                *perf.sets.entry(index).or_default().slot(field) = Some(s);
                continue;
            }
            perf.extra.insert(key, Value::String(s));
        }
        perf
    }

    fn encode(self) -> Map<String, Value> {
        let mut map = self.extra;
        if let Some(order) = self.order {
            map.insert(ORDER_KEY.to_string(), Value::String(order.to_string()));
        }
        if let Some(note) = self.note {
            map.insert(NOTE_KEY.to_string(), Value::String(note));
        }
        for (index, set) in self.sets {
            for field in SetField::ALL {
                if let Some(v) = set.get(field) {
                    map.insert(field.key(index), Value::String(v.to_string()));
                }
            }
        }
        map
    }
}

impl From<Map<String, Value>> for ExercisePerformance {
    fn from(map: Map<String, Value>) -> Self {
        ExercisePerformance::decode(map)
    }
}

impl From<ExercisePerformance> for Map<String, Value> {
    fn from(perf: ExercisePerformance) -> Self {
        perf.encode()
    }
}

/// Parses a set index with no sign or leading zeros.
fn canonical_index(s: &str) -> Option<u32> {
    let index: u32 = s.parse().ok()?;
    (index.to_string() == s).then_some(index)
}

fn set_key(key: &str) -> Option<(SetField, u32)> {
    SetField::ALL.into_iter().find_map(|field| {
        key.strip_prefix(field.prefix())
            .and_then(canonical_index)
            .map(|index| (field, index))
    })
}

/// Counts for one saved session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub exercise_count: usize,
    pub total_sets: usize,
}

impl SessionSummary {
    pub fn of(day: &DayPerformance) -> Self {
        SessionSummary {
            exercise_count: day.len(),
            total_sets: day.values().map(ExercisePerformance::recorded_sets).sum(),
        }
    }
}

/// Session date key (`YYYY-MM-DD`, UTC) for `now`.
pub fn session_date(now: DateTime<Utc>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}

/// Validates a session date key.
pub fn parse_session_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("invalid date '{s}': {e} (expected YYYY-MM-DD)")))
}

#[cfg(test)]
#[path = "perf_tests.rs"]
mod tests;
