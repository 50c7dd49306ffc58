// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Workout templates and their exercises.
//!
//! All workouts of a user live in one document, one field per workout id. The
//! id is therefore the field key and is not stored inside the value.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::iso_millis;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::perf::{ExercisePerformance, Performance, SetField};

/// Kind of exercise, which decides how sets are entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    #[default]
    Muscu,
    Cardio,
    Hiit,
    Etirement,
    Poids,
}

impl ExerciseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Muscu => "muscu",
            ExerciseType::Cardio => "cardio",
            ExerciseType::Hiit => "hiit",
            ExerciseType::Etirement => "etirement",
            ExerciseType::Poids => "poids",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "muscu" => Ok(ExerciseType::Muscu),
            "cardio" => Ok(ExerciseType::Cardio),
            "hiit" => Ok(ExerciseType::Hiit),
            "etirement" => Ok(ExerciseType::Etirement),
            "poids" => Ok(ExerciseType::Poids),
            _ => Err(Error::InvalidExerciseType(s.to_string())),
        }
    }
}

/// One exercise of a workout template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ExerciseType,
    /// Exercises that may be done instead of this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Exercise>,
}

impl Exercise {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ExerciseType) -> Self {
        Exercise {
            id: id.into(),
            name: name.into(),
            kind,
            alternatives: Vec::new(),
        }
    }
}

fn default_name() -> String {
    "Untitled".to_string()
}

/// A workout template with its performance history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    #[serde(skip)]
    pub id: String,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "exercices", default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub perf: Performance,
    #[serde(default, with = "iso_millis::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "iso_millis::option", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Workout {
    /// Decodes the value stored under field `id` of the workouts document.
    pub fn from_field(id: &str, value: &Value) -> Result<Self> {
        let mut workout: Workout = serde_json::from_value(value.clone())
            .map_err(|e| Error::InvalidDocument(format!("workout '{id}': {e}")))?;
        workout.id = id.to_string();
        Ok(workout)
    }

    /// Decodes every workout field of a workouts document.
    ///
    /// Fields that do not decode are returned as errors next to the good ones.
    pub fn all_from_document(doc: &Document) -> (Vec<Workout>, Vec<Error>) {
        let mut workouts = Vec::new();
        let mut errors = Vec::new();
        for (id, value) in doc {
            match Workout::from_field(id, value) {
                Ok(w) => workouts.push(w),
                Err(e) => errors.push(e),
            }
        }
        (workouts, errors)
    }

    /// Encodes the workout as the value stored under its id.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Finds an exercise by id, including alternatives.
    pub fn exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises.iter().find_map(|e| {
            if e.id == exercise_id {
                Some(e)
            } else {
                e.alternatives.iter().find(|a| a.id == exercise_id)
            }
        })
    }

    /// Most recent session that recorded `exercise_id`.
    pub fn last_performance(&self, exercise_id: &str) -> Option<(&str, &ExercisePerformance)> {
        self.perf
            .iter()
            .rev()
            .find_map(|(date, day)| day.get(exercise_id).map(|p| (date.as_str(), p)))
    }

    /// Value to suggest for `field` of set `index`, from the last session.
    pub fn placeholder(&self, exercise_id: &str, index: u32, field: SetField) -> Option<&str> {
        self.last_performance(exercise_id)
            .and_then(|(_, perf)| perf.value(index, field))
    }

    /// Number of sets to offer for an exercise: the last session's count, at least one.
    pub fn suggested_set_count(&self, exercise_id: &str) -> u32 {
        self.last_performance(exercise_id)
            .map(|(_, perf)| perf.set_count())
            .unwrap_or(0)
            .max(1)
    }
}

/// Derives a workout id from its name: `"Leg Day"` → `leg_day_<millis>`.
///
/// Dots are replaced too since the id is used as a field path segment.
pub fn workout_id(name: &str, now: DateTime<Utc>) -> String {
    let slug = name
        .trim()
        .to_lowercase()
        .replace('.', "_")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{slug}_{}", now.timestamp_millis())
}

/// Derives an exercise id: `exercise_<millis>`, suffixed with its position
/// when several are created at once.
pub fn exercise_id(now: DateTime<Utc>, index: usize) -> String {
    match index {
        0 => format!("exercise_{}", now.timestamp_millis()),
        n => format!("exercise_{}_{n}", now.timestamp_millis()),
    }
}

/// User input for a new workout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutDraft {
    pub name: String,
    pub description: String,
    pub exercises: Vec<Exercise>,
}

impl WorkoutDraft {
    /// Trims text, drops unnamed exercises and alternatives.
    ///
    /// Fails if the name is blank.
    pub fn normalize(self) -> Result<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidInput("workout name is required".to_string()));
        }
        Ok(WorkoutDraft {
            name,
            description: self.description.trim().to_string(),
            exercises: normalize_exercises(self.exercises),
        })
    }

    /// Builds the stored workout, stamping both timestamps with `now`.
    pub fn into_workout(self, id: impl Into<String>, now: DateTime<Utc>) -> Workout {
        Workout {
            id: id.into(),
            name: self.name,
            description: self.description,
            exercises: self.exercises,
            perf: Performance::new(),
            created_at: Some(now),
            last_modified: Some(now),
        }
    }
}

fn normalize_exercises(exercises: Vec<Exercise>) -> Vec<Exercise> {
    exercises
        .into_iter()
        .filter(|e| !e.name.trim().is_empty())
        .map(|mut e| {
            e.name = e.name.trim().to_string();
            e.alternatives.retain(|a| !a.name.trim().is_empty());
            e
        })
        .collect()
}

/// Partial update of a workout's template fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub exercises: Option<Vec<Exercise>>,
}

impl WorkoutPatch {
    /// Trims and validates the patch.
    ///
    /// A name may not be blank and an exercise list may not end up empty.
    pub fn normalize(self) -> Result<Self> {
        let name = match self.name {
            Some(n) if n.trim().is_empty() => {
                return Err(Error::InvalidInput("workout name is required".to_string()))
            }
            other => other.map(|n| n.trim().to_string()),
        };
        let exercises = match self.exercises.map(normalize_exercises) {
            Some(list) if list.is_empty() => {
                return Err(Error::InvalidInput(
                    "a workout needs at least one exercise".to_string(),
                ))
            }
            other => other,
        };
        Ok(WorkoutPatch {
            name,
            description: self.description.map(|d| d.trim().to_string()),
            exercises,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.exercises.is_none()
    }

    /// Applies the patch to a workout in memory.
    pub fn apply_to(&self, workout: &mut Workout, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            workout.name = name.clone();
        }
        if let Some(description) = &self.description {
            workout.description = description.clone();
        }
        if let Some(exercises) = &self.exercises {
            workout.exercises = exercises.clone();
        }
        workout.last_modified = Some(now);
    }
}

#[cfg(test)]
#[path = "workout_tests.rs"]
mod tests;
