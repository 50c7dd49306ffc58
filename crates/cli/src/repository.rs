// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Storage layout of workouts and profiles.
//!
//! A [`WorkoutRepository`] turns domain operations into document writes
//! without performing them, so the write façade can send a write to the
//! remote or queue it unchanged. [`UserDocumentRepository`] keeps all of a
//! user's workouts in one document, `workouts/<user>`, one field per workout
//! id, and the profile in `users/<user>`.

use chrono::{DateTime, Utc};
use ll_core::{
    DayPerformance, Document, DocumentRef, DocumentStore, FieldPath, FieldWrite, MutationKind,
    Workout,
};
use serde_json::{json, Value};
use tracing::warn;

use crate::error::{Error, Result};
use crate::sync::{RemoteFuture, RemoteStore};

pub const WORKOUTS_COLLECTION: &str = "workouts";
pub const USERS_COLLECTION: &str = "users";

/// A document write that has been planned but not yet performed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedWrite {
    pub target: DocumentRef,
    pub kind: MutationKind,
}

impl PlannedWrite {
    fn update(target: DocumentRef, fields: Vec<FieldWrite>) -> Self {
        PlannedWrite {
            target,
            kind: MutationKind::Update { fields },
        }
    }
}

/// Where and how workouts are stored.
pub trait WorkoutRepository: Send + Sync {
    /// Document holding `user`'s workouts.
    fn workouts_ref(&self, user: &str) -> DocumentRef;

    /// Document holding `user`'s profile.
    fn profile_ref(&self, user: &str) -> DocumentRef;

    /// Fetches every document holding `user`'s data from the remote.
    fn fetch_documents<'a>(
        &'a self,
        remote: &'a dyn RemoteStore,
        user: &'a str,
    ) -> RemoteFuture<'a, DocumentStore>;

    /// Fetches every workout of `user` from the remote.
    fn get_all<'a>(
        &'a self,
        remote: &'a dyn RemoteStore,
        user: &'a str,
    ) -> RemoteFuture<'a, Vec<Workout>> {
        Box::pin(async move {
            let docs = self.fetch_documents(remote, user).await?;
            Ok(self.workouts_in(&docs, user))
        })
    }

    /// Fetches one workout from the remote.
    fn get_one<'a>(
        &'a self,
        remote: &'a dyn RemoteStore,
        user: &'a str,
        id: &'a str,
    ) -> RemoteFuture<'a, Option<Workout>> {
        Box::pin(async move {
            let workouts = self.get_all(remote, user).await?;
            Ok(workouts.into_iter().find(|w| w.id == id))
        })
    }

    /// Creates or replaces a workout.
    fn put_one(&self, user: &str, workout: &Workout) -> Result<PlannedWrite>;

    /// Writes a workout's template fields (name, description, exercises).
    fn patch_one(&self, user: &str, workout: &Workout) -> Result<PlannedWrite>;

    /// Records one session of a workout.
    fn put_performance(
        &self,
        user: &str,
        id: &str,
        date: &str,
        day: &DayPerformance,
        now: DateTime<Utc>,
    ) -> Result<PlannedWrite>;

    /// Deletes a workout.
    fn delete_one(&self, user: &str, id: &str) -> Result<PlannedWrite>;

    /// Sets the profile nickname.
    fn put_nickname(&self, user: &str, nickname: &str) -> PlannedWrite;

    /// Decodes `user`'s workouts from a local mirror.
    fn workouts_in(&self, mirror: &DocumentStore, user: &str) -> Vec<Workout>;

    /// Reads the nickname from a local mirror.
    fn nickname_in(&self, mirror: &DocumentStore, user: &str) -> Option<String>;
}

/// The one-document-per-user layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserDocumentRepository;

fn decode_workouts(doc: &Document) -> Vec<Workout> {
    let (workouts, errors) = Workout::all_from_document(doc);
    for e in errors {
        warn!("skipping undecodable workout: {e}");
    }
    workouts
}

/// The workout's field in the workouts document.
fn workout_field(id: &str) -> Result<FieldPath> {
    FieldPath::field(id).map_err(|e| match e {
        ll_core::Error::InvalidFieldPath(_) if id.contains('.') => {
            Error::DottedWorkoutId(id.to_string())
        }
        other => other.into(),
    })
}

fn iso(now: DateTime<Utc>) -> Value {
    Value::String(ll_core::iso8601(now))
}

impl WorkoutRepository for UserDocumentRepository {
    fn workouts_ref(&self, user: &str) -> DocumentRef {
        DocumentRef::new(WORKOUTS_COLLECTION, user)
    }

    fn profile_ref(&self, user: &str) -> DocumentRef {
        DocumentRef::new(USERS_COLLECTION, user)
    }

    fn fetch_documents<'a>(
        &'a self,
        remote: &'a dyn RemoteStore,
        user: &'a str,
    ) -> RemoteFuture<'a, DocumentStore> {
        Box::pin(async move {
            let mut docs = DocumentStore::new();
            for target in [self.workouts_ref(user), self.profile_ref(user)] {
                if let Some(doc) = remote.get(&target).await? {
                    docs.set(&target, doc, false);
                }
            }
            Ok(docs)
        })
    }

    fn put_one(&self, user: &str, workout: &Workout) -> Result<PlannedWrite> {
        workout_field(&workout.id)?;
        let mut data = Document::new();
        data.insert(workout.id.clone(), workout.to_value()?);
        Ok(PlannedWrite {
            target: self.workouts_ref(user),
            kind: MutationKind::Set { data, merge: true },
        })
    }

    fn patch_one(&self, user: &str, workout: &Workout) -> Result<PlannedWrite> {
        let base = workout_field(&workout.id)?;
        let mut fields = vec![
            FieldWrite::put(base.child("name")?, workout.name.as_str()),
            FieldWrite::put(base.child("description")?, workout.description.as_str()),
            FieldWrite::put(
                base.child("exercices")?,
                serde_json::to_value(&workout.exercises)?,
            ),
        ];
        if let Some(at) = workout.last_modified {
            fields.push(FieldWrite::put(base.child("lastModified")?, iso(at)));
        }
        Ok(PlannedWrite::update(self.workouts_ref(user), fields))
    }

    fn put_performance(
        &self,
        user: &str,
        id: &str,
        date: &str,
        day: &DayPerformance,
        now: DateTime<Utc>,
    ) -> Result<PlannedWrite> {
        let base = workout_field(id)?;
        let fields = vec![
            FieldWrite::put(
                base.child("perf")?.child(date)?,
                serde_json::to_value(day)?,
            ),
            FieldWrite::put(base.child("lastModified")?, iso(now)),
        ];
        Ok(PlannedWrite::update(self.workouts_ref(user), fields))
    }

    fn delete_one(&self, user: &str, id: &str) -> Result<PlannedWrite> {
        Ok(PlannedWrite::update(
            self.workouts_ref(user),
            vec![FieldWrite::remove(workout_field(id)?)],
        ))
    }

    fn put_nickname(&self, user: &str, nickname: &str) -> PlannedWrite {
        let data = match json!({ "nickname": nickname }) {
            Value::Object(map) => map,
            _ => Document::new(),
        };
        PlannedWrite {
            target: self.profile_ref(user),
            kind: MutationKind::Set { data, merge: true },
        }
    }

    fn workouts_in(&self, mirror: &DocumentStore, user: &str) -> Vec<Workout> {
        mirror
            .get_ref(&self.workouts_ref(user))
            .map(decode_workouts)
            .unwrap_or_default()
    }

    fn nickname_in(&self, mirror: &DocumentStore, user: &str) -> Option<String> {
        mirror
            .get_ref(&self.profile_ref(user))
            .and_then(|doc| doc.get("nickname"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
