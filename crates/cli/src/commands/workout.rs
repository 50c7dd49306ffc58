// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use ll_core::perf::{ExercisePerformance, SetField};
use ll_core::workout::{exercise_id, workout_id};
use ll_core::{Exercise, Workout, WorkoutDraft, WorkoutPatch};
use serde_json::Value;

use crate::app::App;
use crate::cli::{ExerciseArg, OutputFormat};
use crate::error::Result;

pub async fn new(
    app: &App,
    name: String,
    description: Option<String>,
    exercises: Vec<ExerciseArg>,
) -> Result<()> {
    app.resume()?;
    let now = app.clock().now();
    let id = workout_id(&name, now);
    let draft = WorkoutDraft {
        name,
        description: description.unwrap_or_default(),
        exercises: build_exercises(None, exercises, now),
    };
    let workout = app.service().create_workout(&id, draft).await?;
    println!(
        "Created workout {} '{}' with {} exercise(s)",
        workout.id,
        workout.name,
        workout.exercises.len()
    );
    Ok(())
}

pub fn list(app: &App, output: OutputFormat) -> Result<()> {
    app.resume()?;
    let workouts = app.state().workouts()?;
    match output {
        OutputFormat::Json => {
            let values = workouts
                .iter()
                .map(workout_json)
                .collect::<Result<Vec<_>>>()?;
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        OutputFormat::Text => {
            if workouts.is_empty() {
                println!("No workouts");
            }
            for workout in &workouts {
                println!("{}", format_line(workout));
            }
        }
    }
    Ok(())
}

pub fn show(app: &App, id: &str, output: OutputFormat) -> Result<()> {
    app.resume()?;
    let workout = app.state().workout(id)?;
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&workout_json(&workout)?)?),
        OutputFormat::Text => print!("{}", format_workout(&workout)),
    }
    Ok(())
}

pub async fn edit(
    app: &App,
    id: &str,
    name: Option<String>,
    description: Option<String>,
    exercises: Vec<ExerciseArg>,
) -> Result<()> {
    app.resume()?;
    let current = app.state().workout(id)?;
    let exercises = (!exercises.is_empty())
        .then(|| build_exercises(Some(&current), exercises, app.clock().now()));
    let patch = WorkoutPatch {
        name,
        description,
        exercises,
    };
    let workout = app.service().update_workout(id, patch).await?;
    println!("Updated workout {} '{}'", workout.id, workout.name);
    Ok(())
}

pub async fn rm(app: &App, id: &str) -> Result<()> {
    app.resume()?;
    app.service().delete_workout(id).await?;
    println!("Deleted workout {id}");
    Ok(())
}

/// Turns exercise arguments into exercises, keeping the id and alternatives
/// of an existing exercise with the same name.
fn build_exercises(
    current: Option<&Workout>,
    args: Vec<ExerciseArg>,
    now: DateTime<Utc>,
) -> Vec<Exercise> {
    args.into_iter()
        .enumerate()
        .map(|(index, arg)| {
            let existing = current.and_then(|w| {
                w.exercises
                    .iter()
                    .find(|e| e.name.eq_ignore_ascii_case(&arg.name))
            });
            match existing {
                Some(e) => Exercise {
                    name: arg.name,
                    kind: arg.kind,
                    ..e.clone()
                },
                None => Exercise::new(exercise_id(now, index), arg.name, arg.kind),
            }
        })
        .collect()
}

fn workout_json(workout: &Workout) -> Result<Value> {
    let mut value = workout.to_value()?;
    if let Value::Object(map) = &mut value {
        map.insert("id".to_string(), Value::String(workout.id.clone()));
    }
    Ok(value)
}

pub(crate) fn format_line(workout: &Workout) -> String {
    format!(
        "{}  {}  ({} exercise(s), {} session(s))",
        workout.id,
        workout.name,
        workout.exercises.len(),
        workout.perf.len()
    )
}

pub(crate) fn format_workout(workout: &Workout) -> String {
    let mut out = format!("{} ({})\n", workout.name, workout.id);
    if !workout.description.is_empty() {
        out.push_str(&format!("  {}\n", workout.description));
    }
    if workout.exercises.is_empty() {
        out.push_str("No exercises\n");
        return out;
    }
    out.push_str("Exercises:\n");
    for exercise in &workout.exercises {
        out.push_str(&format!(
            "  {}  {} [{}]",
            exercise.id, exercise.name, exercise.kind
        ));
        if let Some((date, perf)) = workout.last_performance(&exercise.id) {
            out.push_str(&format!("  last {date}: {}", format_sets(perf)));
        }
        out.push('\n');
        for alt in &exercise.alternatives {
            out.push_str(&format!("    or {}  {} [{}]\n", alt.id, alt.name, alt.kind));
        }
    }
    out
}

/// Renders recorded sets the way `liftlog log` reads them: `80x10@1.30, 85x8`.
pub(crate) fn format_sets(perf: &ExercisePerformance) -> String {
    let sets = perf
        .sets
        .keys()
        .filter_map(|&index| {
            let weight = perf.value(index, SetField::Weight);
            let reps = perf.value(index, SetField::Reps);
            let interval = perf.value(index, SetField::Interval);
            let mut set = String::new();
            if weight.is_some() || reps.is_some() {
                set.push_str(&format!(
                    "{}x{}",
                    weight.unwrap_or_default(),
                    reps.unwrap_or_default()
                ));
            }
            if let Some(interval) = interval {
                set.push_str(&format!("@{interval}"));
            }
            (!set.is_empty()).then_some(set)
        })
        .collect::<Vec<_>>()
        .join(", ");
    match &perf.note {
        Some(note) => format!("{sets} ({note})"),
        None => sets,
    }
}

#[cfg(test)]
#[path = "workout_tests.rs"]
mod tests;
