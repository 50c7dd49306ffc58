// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local snapshot of the signed-in user's data.
//!
//! Written after every write so a cold start can show workouts before any
//! remote or queue activity completes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ll_core::{Document, KeyValueStore};
use tracing::{debug, warn};

use crate::error::Result;
use crate::sync::LastSyncStore;

pub const USER_KEY: &str = "liftlog.user";
pub const NICKNAME_KEY: &str = "liftlog.nickname";
pub const WORKOUTS_KEY: &str = "liftlog.workouts";
pub const LAST_SYNC_KEY: &str = "liftlog.last_sync";

/// Everything the cache holds for one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub user_id: String,
    pub nickname: Option<String>,
    /// The user's workouts document, one field per workout id.
    pub workouts: Document,
}

pub struct LocalSnapshotCache {
    store: Arc<dyn KeyValueStore>,
}

impl LocalSnapshotCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        LocalSnapshotCache { store }
    }

    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        self.store.set_item(USER_KEY, &snapshot.user_id)?;
        match &snapshot.nickname {
            Some(nickname) => self.store.set_item(NICKNAME_KEY, nickname)?,
            None => self.store.remove_item(NICKNAME_KEY)?,
        }
        let workouts = serde_json::to_string(&snapshot.workouts)?;
        self.store.set_item(WORKOUTS_KEY, &workouts)?;
        debug!(
            "saved snapshot for {} ({} workouts)",
            snapshot.user_id,
            snapshot.workouts.len()
        );
        Ok(())
    }

    /// User id of the cached snapshot, if any.
    pub fn cached_user(&self) -> Result<Option<String>> {
        Ok(self.store.get_item(USER_KEY)?)
    }

    /// Loads the snapshot of `user_id`. A snapshot of another user is ignored.
    pub fn load(&self, user_id: &str) -> Result<Option<Snapshot>> {
        match self.cached_user()? {
            Some(cached) if cached == user_id => {}
            _ => return Ok(None),
        }
        let nickname = self.store.get_item(NICKNAME_KEY)?;
        let workouts = match self.store.get_item(WORKOUTS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => Document::new(),
        };
        Ok(Some(Snapshot {
            user_id: user_id.to_string(),
            nickname,
            workouts,
        }))
    }

    pub fn save_last_sync(&self, at: DateTime<Utc>) -> Result<()> {
        self.store.set_item(LAST_SYNC_KEY, &ll_core::iso8601(at))?;
        Ok(())
    }

    pub fn last_sync(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .store
            .get_item(LAST_SYNC_KEY)?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|t| t.with_timezone(&Utc)))
    }

    /// Removes every cached key.
    pub fn clear(&self) -> Result<()> {
        self.store
            .multi_remove(&[USER_KEY, NICKNAME_KEY, WORKOUTS_KEY, LAST_SYNC_KEY])?;
        Ok(())
    }
}

impl LastSyncStore for LocalSnapshotCache {
    fn load_last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync()
            .inspect_err(|e| warn!("could not read last sync time: {e}"))
            .ok()
            .flatten()
    }

    fn store_last_sync(&self, at: DateTime<Utc>) {
        if let Err(e) = self.save_last_sync(at) {
            warn!("could not store last sync time: {e}");
        }
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
