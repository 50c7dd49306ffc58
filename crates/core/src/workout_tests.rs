// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use serde_json::json;
use yare::parameterized;

fn now() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()
}

#[parameterized(
    simple = { "Leg Day", "leg_day_1700000000123" },
    padded = { "  Push   Pull \t Legs ", "push_pull_legs_1700000000123" },
    dotted = { "v1.2 Upper", "v1_2_upper_1700000000123" },
)]
fn workout_id_slugs_name(name: &str, expected: &str) {
    assert_eq!(workout_id(name, now()), expected);
}

#[test]
fn exercise_ids_are_distinct_per_position() {
    assert_eq!(exercise_id(now(), 0), "exercise_1700000000123");
    assert_eq!(exercise_id(now(), 2), "exercise_1700000000123_2");
}

#[parameterized(
    muscu = { "muscu", ExerciseType::Muscu },
    upper = { "CARDIO", ExerciseType::Cardio },
    etirement = { "etirement", ExerciseType::Etirement },
)]
fn exercise_type_parses(input: &str, expected: ExerciseType) {
    assert_eq!(input.parse::<ExerciseType>().unwrap(), expected);
    assert_eq!(expected.to_string(), expected.as_str());
}

#[test]
fn exercise_type_rejects_unknown() {
    assert!(matches!(
        "yoga".parse::<ExerciseType>(),
        Err(Error::InvalidExerciseType(_))
    ));
}

#[test]
fn workout_decodes_stored_field() {
    let value = json!({
        "name": "Legs",
        "description": "",
        "exercices": [
            {"id": "sq", "name": "Squat", "type": "muscu",
             "alternatives": [{"id": "lp", "name": "Leg press", "type": "muscu"}]}
        ],
        "perf": {"2024-01-01": {"sq": {"exoOrder": "0", "weight0": "80"}}},
        "createdAt": "2024-01-01T10:00:00.000Z",
        "lastModified": "2024-01-02T10:00:00.000Z"
    });
    let workout = Workout::from_field("legs_1", &value).unwrap();
    assert_eq!(workout.id, "legs_1");
    assert_eq!(workout.exercises[0].alternatives[0].name, "Leg press");
    assert_eq!(workout.exercise("lp").unwrap().id, "lp");
    assert_eq!(workout.to_value().unwrap(), value);
}

#[test]
fn workout_defaults_missing_fields() {
    let workout = Workout::from_field("w", &json!({})).unwrap();
    assert_eq!(workout.name, "Untitled");
    assert!(workout.exercises.is_empty());
    assert!(workout.perf.is_empty());
    assert_eq!(workout.created_at, None);
}

#[test]
fn all_from_document_separates_bad_fields() {
    let doc = json!({
        "good": {"name": "A"},
        "bad": {"exercices": "not a list"}
    });
    let (workouts, errors) = Workout::all_from_document(doc.as_object().unwrap());
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0].id, "good");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("bad"));
}

#[test]
fn last_performance_picks_latest_date_with_exercise() {
    let value = json!({
        "perf": {
            "2024-01-01": {"sq": {"weight0": "70", "weight1": "75"}},
            "2024-01-08": {"sq": {"weight0": "80"}},
            "2024-01-15": {"bench": {"weight0": "60"}}
        }
    });
    let workout = Workout::from_field("w", &value).unwrap();
    let (date, perf) = workout.last_performance("sq").unwrap();
    assert_eq!(date, "2024-01-08");
    assert_eq!(perf.value(0, SetField::Weight), Some("80"));
    assert_eq!(workout.placeholder("sq", 0, SetField::Weight), Some("80"));
    assert_eq!(workout.placeholder("sq", 1, SetField::Weight), None);
    assert_eq!(workout.suggested_set_count("sq"), 1);
    assert_eq!(workout.suggested_set_count("deadlift"), 1);
    assert!(workout.last_performance("deadlift").is_none());
}

#[test]
fn draft_normalize_drops_blank_entries() {
    let mut squat = Exercise::new("e1", " Squat ", ExerciseType::Muscu);
    squat.alternatives = vec![
        Exercise::new("a1", "", ExerciseType::Muscu),
        Exercise::new("a2", "Leg press", ExerciseType::Muscu),
    ];
    let draft = WorkoutDraft {
        name: "  Legs ".into(),
        description: " heavy ".into(),
        exercises: vec![squat, Exercise::new("e2", "   ", ExerciseType::Cardio)],
    }
    .normalize()
    .unwrap();
    assert_eq!(draft.name, "Legs");
    assert_eq!(draft.description, "heavy");
    assert_eq!(draft.exercises.len(), 1);
    assert_eq!(draft.exercises[0].name, "Squat");
    assert_eq!(draft.exercises[0].alternatives.len(), 1);
}

#[test]
fn draft_requires_name() {
    let draft = WorkoutDraft {
        name: "   ".into(),
        ..Default::default()
    };
    assert!(matches!(draft.normalize(), Err(Error::InvalidInput(_))));
}

#[test]
fn draft_into_workout_stamps_times() {
    let workout = WorkoutDraft {
        name: "Legs".into(),
        ..Default::default()
    }
    .into_workout("legs_1", now());
    assert_eq!(workout.created_at, Some(now()));
    assert_eq!(workout.last_modified, Some(now()));
    let value = workout.to_value().unwrap();
    assert_eq!(value["perf"], json!({}));
    assert_eq!(value["createdAt"], "2023-11-14T22:13:20.123Z");
    assert!(value.get("id").is_none());
}

#[test]
fn patch_validation() {
    let blank_name = WorkoutPatch {
        name: Some(" ".into()),
        ..Default::default()
    };
    assert!(blank_name.normalize().is_err());

    let no_exercises = WorkoutPatch {
        exercises: Some(vec![Exercise::new("e", "", ExerciseType::Muscu)]),
        ..Default::default()
    };
    assert!(no_exercises.normalize().is_err());

    assert!(WorkoutPatch::default().is_empty());
}

#[test]
fn patch_applies_only_given_fields() {
    let mut workout = WorkoutDraft {
        name: "Legs".into(),
        description: "old".into(),
        ..Default::default()
    }
    .into_workout("w", now());
    let later = now() + chrono::Duration::seconds(5);
    WorkoutPatch {
        name: Some("Leg day".into()),
        ..Default::default()
    }
    .apply_to(&mut workout, later);
    assert_eq!(workout.name, "Leg day");
    assert_eq!(workout.description, "old");
    assert_eq!(workout.last_modified, Some(later));
    assert_eq!(workout.created_at, Some(now()));
}
