// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mutation queue for persisting writes while disconnected.
//!
//! The whole queue is one JSON array stored under [`QUEUE_KEY`] in the local
//! key-value store. Every change rewrites that one value atomically, so a
//! reader sees either the old or the new array, never a torn one. On
//! reconnect the sync engine replays the records in insertion order.

use std::sync::{Arc, Mutex, MutexGuard};

use ll_core::{ClockSource, DocumentRef, KeyValueStore, MutationId, MutationKind, MutationRecord};
use tracing::{debug, warn};

/// Storage key holding the serialized queue.
pub const QUEUE_KEY: &str = "liftlog.offline_queue";

/// Error type for queue operations.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// The key-value store failed.
    #[error("queue storage error: {0}")]
    Storage(#[from] ll_core::Error),

    /// Serialization error.
    #[error("queue serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Durable FIFO of pending mutation records.
pub struct MutationQueue {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn ClockSource>,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl MutationQueue {
    /// Creates a queue over `store`, stamping records with `clock`.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn ClockSource>) -> Self {
        MutationQueue {
            store,
            clock,
            lock: Mutex::new(()),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> QueueResult<Vec<MutationRecord>> {
        match self.store.get_item(QUEUE_KEY)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn write(&self, records: &[MutationRecord]) -> QueueResult<()> {
        if records.is_empty() {
            self.store.remove_item(QUEUE_KEY)?;
        } else {
            let raw = serde_json::to_string(records)?;
            self.store.set_item(QUEUE_KEY, &raw)?;
        }
        Ok(())
    }

    /// Appends a mutation, assigning its id and timestamp.
    ///
    /// The record is persisted before this returns.
    pub fn enqueue(&self, target: DocumentRef, kind: MutationKind) -> QueueResult<MutationId> {
        let _guard = self.guard();
        let record = MutationRecord::new(target, kind, self.clock.now());
        let id = record.id.clone();

        let mut records = self.read().inspect_err(|e| warn!("queue read failed: {e}"))?;
        debug!(
            "enqueue {} {} {} (queue length {})",
            id,
            record.kind.name(),
            record.target,
            records.len() + 1
        );
        records.push(record);
        self.write(&records)
            .inspect_err(|e| warn!("queue write failed: {e}"))?;
        Ok(id)
    }

    /// Returns all pending records, oldest first.
    pub fn list(&self) -> QueueResult<Vec<MutationRecord>> {
        let _guard = self.guard();
        self.read()
    }

    /// Returns the record with `id`, if still queued.
    pub fn get(&self, id: &MutationId) -> QueueResult<Option<MutationRecord>> {
        Ok(self.list()?.into_iter().find(|r| &r.id == id))
    }

    /// Deletes one record by id.
    ///
    /// Returns whether a record was removed; removing an absent id is a no-op.
    pub fn remove(&self, id: &MutationId) -> QueueResult<bool> {
        let _guard = self.guard();
        let mut records = self.read()?;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write(&records)
            .inspect_err(|e| warn!("queue write failed removing {id}: {e}"))?;
        debug!("dequeued {id} ({} left)", records.len());
        Ok(true)
    }

    /// Empties the queue unconditionally.
    pub fn clear(&self) -> QueueResult<()> {
        let _guard = self.guard();
        self.store.remove_item(QUEUE_KEY)?;
        Ok(())
    }

    /// Number of pending records.
    pub fn len(&self) -> QueueResult<usize> {
        Ok(self.list()?.len())
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> QueueResult<bool> {
        Ok(self.len()? == 0)
    }
}
