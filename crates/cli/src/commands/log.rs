// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `liftlog log`: records one session of a workout.
//!
//! Each `--entry` is `<exercise>=<set>,<set>,...` where a set is
//! `[<weight>]x[<reps>][@<interval>]` or `@<interval>`, and at least one
//! value is given. `<exercise>=last` repeats the sets of the last session
//! that recorded the exercise. The exercise is matched by id, then by name
//! ignoring case.

use std::collections::BTreeMap;

use ll_core::perf::{DayPerformance, ExercisePerformance, SetField, SetPerformance};
use ll_core::Workout;

use crate::app::App;
use crate::error::{Error, Result};

const REPEAT_LAST: &str = "last";

pub async fn run(
    app: &App,
    workout_id: &str,
    entries: &[String],
    notes: &[String],
    date: Option<&str>,
) -> Result<()> {
    app.resume()?;
    let workout = app.state().workout(workout_id)?;
    let day = build_day(&workout, entries, notes)?;
    let summary = app
        .service()
        .save_workout_performance(workout_id, date, day)
        .await?;
    println!(
        "Logged {} set(s) of {} exercise(s) for '{}'",
        summary.total_sets, summary.exercise_count, workout.name
    );
    Ok(())
}

/// Builds the session from entries and notes; entry order becomes `exoOrder`.
pub(crate) fn build_day(
    workout: &Workout,
    entries: &[String],
    notes: &[String],
) -> Result<DayPerformance> {
    let mut parsed: Vec<(String, Vec<SetPerformance>)> = Vec::new();
    for entry in entries {
        let (exercise, sets) = parse_entry(entry)?;
        let id = resolve_exercise(workout, exercise)?;
        if parsed.iter().any(|(seen, _)| *seen == id) {
            return Err(invalid(entry, "exercise given twice"));
        }
        let sets = match sets {
            Some(sets) => sets,
            None => repeat_last(workout, &id)
                .ok_or_else(|| invalid(entry, "no earlier session recorded this exercise"))?,
        };
        parsed.push((id, sets));
    }

    let mut texts: BTreeMap<String, &str> = BTreeMap::new();
    for note in notes {
        let (exercise, text) = split_pair(note)?;
        let id = resolve_exercise(workout, exercise)?;
        if !parsed.iter().any(|(seen, _)| *seen == id) {
            return Err(invalid(note, "no sets logged for this exercise"));
        }
        texts.insert(id, text);
    }

    Ok((0u32..)
        .zip(parsed)
        .map(|(order, (id, sets))| {
            let perf = ExercisePerformance::from_sets(order, texts.get(&id).copied(), sets);
            (id, perf)
        })
        .collect())
}

/// Splits `<exercise>=<sets>` and parses every set. The sets are `None`
/// for `<exercise>=last`.
pub(crate) fn parse_entry(entry: &str) -> Result<(&str, Option<Vec<SetPerformance>>)> {
    let (exercise, sets) = split_pair(entry)?;
    if sets.eq_ignore_ascii_case(REPEAT_LAST) {
        return Ok((exercise, None));
    }
    let sets = sets
        .split(',')
        .map(|set| parse_set(set).map_err(|reason| invalid(entry, &reason)))
        .collect::<Result<Vec<_>>>()?;
    Ok((exercise, Some(sets)))
}

/// Sets of the last session that recorded `exercise_id`, or `None` when
/// there is nothing to repeat.
pub(crate) fn repeat_last(workout: &Workout, exercise_id: &str) -> Option<Vec<SetPerformance>> {
    let sets: Vec<SetPerformance> = (0..workout.suggested_set_count(exercise_id))
        .map(|index| {
            let value = |field: SetField| {
                workout
                    .placeholder(exercise_id, index, field)
                    .unwrap_or_default()
            };
            SetPerformance::new(
                value(SetField::Weight),
                value(SetField::Reps),
                value(SetField::Interval),
            )
        })
        .collect();
    sets.iter().any(|set| !set.is_empty()).then_some(sets)
}

fn split_pair(s: &str) -> Result<(&str, &str)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| invalid(s, "expected <exercise>=<value>"))?;
    let (key, value) = (key.trim(), value.trim());
    if key.is_empty() {
        return Err(invalid(s, "missing exercise"));
    }
    if value.is_empty() {
        return Err(invalid(s, "missing value"));
    }
    Ok((key, value))
}

/// Parses one set: `80x10`, `80x10@1.30`, `x12`, `80x`, `@25.00`.
pub(crate) fn parse_set(set: &str) -> std::result::Result<SetPerformance, String> {
    let set = set.trim();
    let (body, interval) = match set.split_once('@') {
        Some((_, "")) => return Err(format!("missing interval after '@' in '{set}'")),
        Some((body, interval)) => (body.trim(), interval.trim()),
        None => (set, ""),
    };
    let (weight, reps) = if body.is_empty() {
        ("", "")
    } else {
        body.split_once(['x', 'X'])
            .ok_or_else(|| format!("expected <weight>x<reps> in '{set}'"))?
    };
    let parsed = SetPerformance::new(weight, reps, interval);
    if parsed.is_empty() {
        return Err(format!("set '{set}' has no value"));
    }
    Ok(parsed)
}

fn resolve_exercise(workout: &Workout, key: &str) -> Result<String> {
    if let Some(e) = workout.exercise(key) {
        return Ok(e.id.clone());
    }
    workout
        .exercises
        .iter()
        .flat_map(|e| std::iter::once(e).chain(&e.alternatives))
        .find(|e| e.name.eq_ignore_ascii_case(key))
        .map(|e| e.id.clone())
        .ok_or_else(|| Error::ExerciseNotFound {
            workout: workout.id.clone(),
            exercise: key.to_string(),
        })
}

fn invalid(entry: &str, reason: &str) -> Error {
    Error::InvalidEntry {
        entry: entry.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
