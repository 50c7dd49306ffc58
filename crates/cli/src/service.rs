// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Domain write façade.
//!
//! Every write takes the same path:
//!
//! 1. plan the document write and check it applies to the mirror,
//! 2. if online, flush earlier queued writes, then write to the remote,
//! 3. if offline, still behind queued writes, or the remote call failed,
//!    enqueue the write instead,
//! 4. apply it to the in-memory mirror and save the snapshot cache,
//! 5. announce it as confirmed or queued.
//!
//! A write is reflected in memory only once it is durable somewhere, so a
//! failed enqueue leaves the mirror untouched and returns the error. Writes
//! are refused while a session load is replacing the mirror.

use std::sync::Arc;

use ll_core::perf::{parse_session_date, session_date};
use ll_core::{
    ClockSource, DayPerformance, Document, DocumentRef, MutationKind, SessionSummary, Workout,
    WorkoutDraft, WorkoutPatch,
};
use tracing::{debug, info, warn};

use crate::cache::LocalSnapshotCache;
use crate::error::{Error, Result};
use crate::repository::{PlannedWrite, WorkoutRepository};
use crate::session::AppState;
use crate::sync::{Notification, SyncEngine};

/// Where a write ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The remote accepted it.
    Confirmed,
    /// It waits in the mutation queue.
    Queued,
}

pub struct WorkoutService {
    state: Arc<AppState>,
    repo: Arc<dyn WorkoutRepository>,
    engine: Arc<SyncEngine>,
    cache: Arc<LocalSnapshotCache>,
    clock: Arc<dyn ClockSource>,
}

impl WorkoutService {
    pub fn new(
        state: Arc<AppState>,
        repo: Arc<dyn WorkoutRepository>,
        engine: Arc<SyncEngine>,
        cache: Arc<LocalSnapshotCache>,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        WorkoutService {
            state,
            repo,
            engine,
            cache,
            clock,
        }
    }

    /// Creates a workout under `id`.
    pub async fn create_workout(&self, id: &str, draft: WorkoutDraft) -> Result<Workout> {
        let session = self.state.require_session()?;
        let draft = draft.normalize()?;
        let workout = draft.into_workout(id, self.clock.now());
        let planned = self.repo.put_one(&session.user_id, &workout)?;
        self.write(planned, format!("workout '{}'", workout.name))
            .await?;
        Ok(workout)
    }

    /// Changes a workout's name, description or exercises.
    pub async fn update_workout(&self, id: &str, patch: WorkoutPatch) -> Result<Workout> {
        let session = self.state.require_session()?;
        let patch = patch.normalize()?;
        if patch.is_empty() {
            return Err(Error::InvalidInput("nothing to change".to_string()));
        }
        let mut workout = self.state.workout(id)?;
        patch.apply_to(&mut workout, self.clock.now());
        let planned = self.repo.patch_one(&session.user_id, &workout)?;
        self.write(planned, format!("workout '{}'", workout.name))
            .await?;
        Ok(workout)
    }

    /// Records a session of workout `id`. `date` defaults to today.
    pub async fn save_workout_performance(
        &self,
        id: &str,
        date: Option<&str>,
        day: DayPerformance,
    ) -> Result<SessionSummary> {
        let session = self.state.require_session()?;
        let workout = self.state.workout(id)?;
        let now = self.clock.now();
        let date = match date {
            Some(d) => {
                parse_session_date(d)?;
                d.to_string()
            }
            None => session_date(now),
        };
        if day.is_empty() {
            return Err(Error::InvalidInput("no sets to record".to_string()));
        }
        if let Some(unknown) = day.keys().find(|ex| workout.exercise(ex).is_none()) {
            return Err(Error::ExerciseNotFound {
                workout: id.to_string(),
                exercise: unknown.clone(),
            });
        }

        let summary = SessionSummary::of(&day);
        let planned = self
            .repo
            .put_performance(&session.user_id, id, &date, &day, now)?;
        self.write(planned, format!("session of '{}' on {date}", workout.name))
            .await?;
        Ok(summary)
    }

    pub async fn delete_workout(&self, id: &str) -> Result<()> {
        let session = self.state.require_session()?;
        let workout = self.state.workout(id)?;
        let planned = self.repo.delete_one(&session.user_id, id)?;
        self.write(planned, format!("deletion of workout '{}'", workout.name))
            .await?;
        Ok(())
    }

    pub async fn set_nickname(&self, nickname: &str) -> Result<()> {
        let session = self.state.require_session()?;
        let nickname = nickname.trim();
        if nickname.is_empty() {
            return Err(Error::InvalidInput("nickname may not be blank".to_string()));
        }
        let planned = self.repo.put_nickname(&session.user_id, nickname);
        self.write(planned, "nickname".to_string()).await?;
        Ok(())
    }

    /// Writes a whole document.
    pub async fn save_document(
        &self,
        target: DocumentRef,
        data: Document,
        merge: bool,
    ) -> Result<WriteOutcome> {
        self.state.require_session()?;
        let what = format!("document {target}");
        self.write(
            PlannedWrite {
                target,
                kind: MutationKind::Set { data, merge },
            },
            what,
        )
        .await
    }

    /// Deletes a whole document.
    pub async fn delete_document(&self, target: DocumentRef) -> Result<WriteOutcome> {
        self.state.require_session()?;
        let what = format!("deletion of {target}");
        self.write(
            PlannedWrite {
                target,
                kind: MutationKind::Delete,
            },
            what,
        )
        .await
    }

    async fn write(&self, planned: PlannedWrite, what: String) -> Result<WriteOutcome> {
        let PlannedWrite { target, kind } = planned;
        if self.state.is_loading() {
            return Err(Error::SessionLoading);
        }
        self.state.check(&target, &kind)?;

        let outcome = if self.write_remote(&target, &kind).await {
            WriteOutcome::Confirmed
        } else {
            let id = self.engine.queue().enqueue(target.clone(), kind.clone())?;
            self.engine.refresh_pending();
            debug!("queued {id} {} {target}", kind.name());
            WriteOutcome::Queued
        };

        self.state.apply(&target, &kind)?;
        self.save_snapshot();

        self.engine.notifier().notify(match outcome {
            WriteOutcome::Confirmed => Notification::WriteConfirmed { what },
            WriteOutcome::Queued => Notification::WriteQueued { what },
        });
        Ok(outcome)
    }

    /// Tries the remote directly. Returns false when the write must be queued.
    async fn write_remote(&self, target: &DocumentRef, kind: &MutationKind) -> bool {
        if !self.engine.monitor().current() {
            debug!("offline, queueing {} {target}", kind.name());
            return false;
        }
        let pending = self.engine.sync_pending().await;
        if pending > 0 {
            info!("{pending} earlier write(s) still queued, queueing behind them");
            return false;
        }
        match self.engine.remote().apply(target, kind).await {
            Ok(()) => true,
            Err(e) => {
                warn!("remote {} {target} failed, queueing: {e}", kind.name());
                false
            }
        }
    }

    fn save_snapshot(&self) {
        if let Err(e) = self.state.snapshot().and_then(|s| self.cache.save(&s)) {
            warn!("could not save snapshot: {e}");
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
