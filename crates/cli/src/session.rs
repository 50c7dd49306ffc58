// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Application state for the signed-in user.
//!
//! [`AppState`] is created once and shared by `Arc`. `init` starts a session
//! and `teardown` ends it; in between it holds an in-memory mirror of the
//! user's documents, which every successful write updates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ll_core::{Document, DocumentRef, DocumentStore, MutationKind, Workout};
use tracing::info;

use crate::cache::Snapshot;
use crate::error::{Error, Result};
use crate::repository::WorkoutRepository;

/// Who is signed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Session {
            user_id: user_id.into(),
        }
    }
}

struct Active {
    session: Session,
    mirror: DocumentStore,
}

pub struct AppState {
    repo: Arc<dyn WorkoutRepository>,
    active: RwLock<Option<Active>>,
    loading: AtomicBool,
}

impl AppState {
    pub fn new(repo: Arc<dyn WorkoutRepository>) -> Self {
        AppState {
            repo,
            active: RwLock::new(None),
            loading: AtomicBool::new(false),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Active>> {
        self.active.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Active>> {
        self.active.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts `session` with an empty mirror, replacing any previous one.
    pub fn init(&self, session: Session) {
        info!("session started for {}", session.user_id);
        *self.write() = Some(Active {
            session,
            mirror: DocumentStore::new(),
        });
    }

    /// Ends the session and drops the mirror.
    pub fn teardown(&self) {
        if let Some(active) = self.write().take() {
            info!("session ended for {}", active.session.user_id);
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.read().as_ref().map(|a| a.session.clone())
    }

    pub fn require_session(&self) -> Result<Session> {
        self.session().ok_or(Error::NotLoggedIn)
    }

    pub fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::Release);
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Runs `f` over the mirror.
    pub fn with_mirror<R>(&self, f: impl FnOnce(&DocumentStore) -> R) -> Result<R> {
        let guard = self.read();
        let active = guard.as_ref().ok_or(Error::NotLoggedIn)?;
        Ok(f(&active.mirror))
    }

    /// Replaces the whole mirror, e.g. after fetching from the remote.
    pub fn replace_mirror(&self, mirror: DocumentStore) -> Result<()> {
        let mut guard = self.write();
        let active = guard.as_mut().ok_or(Error::NotLoggedIn)?;
        active.mirror = mirror;
        Ok(())
    }

    /// Checks that `kind` would apply to the mirror, without changing it.
    pub fn check(&self, target: &DocumentRef, kind: &MutationKind) -> Result<()> {
        let mut scratch = DocumentStore::new();
        if let Some(doc) = self.with_mirror(|m| m.get(target))? {
            scratch.set(target, doc, false);
        }
        scratch.apply(target, kind)?;
        Ok(())
    }

    /// Applies a write to the mirror.
    pub fn apply(&self, target: &DocumentRef, kind: &MutationKind) -> Result<()> {
        let mut guard = self.write();
        let active = guard.as_mut().ok_or(Error::NotLoggedIn)?;
        active.mirror.apply(target, kind)?;
        Ok(())
    }

    pub fn document(&self, target: &DocumentRef) -> Result<Option<Document>> {
        self.with_mirror(|m| m.get(target))
    }

    pub fn nickname(&self) -> Result<Option<String>> {
        let session = self.require_session()?;
        self.with_mirror(|m| self.repo.nickname_in(m, &session.user_id))
    }

    pub fn workouts(&self) -> Result<Vec<Workout>> {
        let session = self.require_session()?;
        self.with_mirror(|m| self.repo.workouts_in(m, &session.user_id))
    }

    /// Snapshot of the mirror for the local cache.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let session = self.require_session()?;
        let user = session.user_id.as_str();
        self.with_mirror(|m| Snapshot {
            user_id: session.user_id.clone(),
            nickname: self.repo.nickname_in(m, user),
            workouts: m.get(&self.repo.workouts_ref(user)).unwrap_or_default(),
        })
    }

    /// Seeds the mirror from a cached snapshot.
    pub fn restore(&self, snapshot: Snapshot) -> Result<()> {
        let mut mirror = DocumentStore::new();
        let user = snapshot.user_id.as_str();
        if !snapshot.workouts.is_empty() {
            mirror.set(&self.repo.workouts_ref(user), snapshot.workouts.clone(), false);
        }
        if let Some(nickname) = &snapshot.nickname {
            let profile = self.repo.put_nickname(user, nickname);
            mirror.apply(&profile.target, &profile.kind)?;
        }
        self.replace_mirror(mirror)
    }

    pub fn workout(&self, id: &str) -> Result<Workout> {
        self.workouts()?
            .into_iter()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::WorkoutNotFound(id.to_string()))
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
