// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync engine: replays queued mutations against the remote store.
//!
//! A drain takes a snapshot of the queue and replays it in order. Each record
//! is removed only after the remote accepted it; a rejected record stays
//! queued and the drain moves on. If connectivity drops mid-drain the rest of
//! the snapshot is left for the next drain. At most one drain runs at a time;
//! a concurrent request returns immediately with no outcomes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use ll_core::ClockSource;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::connectivity::ConnectivityMonitor;
use super::queue::MutationQueue;
use super::remote::RemoteStore;
use super::report::{summarize, Notifier, ReplayOutcome};

/// Durable home for the last successful sync time.
pub trait LastSyncStore: Send + Sync {
    fn load_last_sync(&self) -> Option<DateTime<Utc>>;
    fn store_last_sync(&self, at: DateTime<Utc>);
}

/// Snapshot of the engine's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub is_online: bool,
    pub pending_count: usize,
    pub sync_in_progress: bool,
    #[serde(with = "ll_core::clock::iso_millis::option")]
    pub last_sync_time: Option<DateTime<Utc>>,
}

/// Releases the drain claim on drop.
struct InProgress<'a>(&'a AtomicBool);

impl<'a> InProgress<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InProgress(flag))
    }
}

impl Drop for InProgress<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Replays the mutation queue when connectivity allows.
pub struct SyncEngine {
    queue: Arc<MutationQueue>,
    remote: Arc<dyn RemoteStore>,
    monitor: Arc<ConnectivityMonitor>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn ClockSource>,
    last_sync_store: Option<Arc<dyn LastSyncStore>>,
    in_progress: AtomicBool,
    pending: AtomicUsize,
    was_online: AtomicBool,
    last_sync: Mutex<Option<DateTime<Utc>>>,
}

impl SyncEngine {
    pub fn new(
        queue: Arc<MutationQueue>,
        remote: Arc<dyn RemoteStore>,
        monitor: Arc<ConnectivityMonitor>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn ClockSource>,
    ) -> Self {
        let was_online = monitor.current();
        SyncEngine {
            queue,
            remote,
            monitor,
            notifier,
            clock,
            last_sync_store: None,
            in_progress: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
            was_online: AtomicBool::new(was_online),
            last_sync: Mutex::new(None),
        }
    }

    /// Persists the last sync time through `store`.
    pub fn with_last_sync_store(mut self, store: Arc<dyn LastSyncStore>) -> Self {
        self.last_sync_store = Some(store);
        self
    }

    /// Loads persisted state: pending count, last sync time, online state.
    pub fn init(&self) {
        self.refresh_pending();
        self.was_online
            .store(self.monitor.current(), Ordering::Release);
        if let Some(store) = &self.last_sync_store {
            *self.last_sync_guard() = store.load_last_sync();
        }
    }

    fn last_sync_guard(&self) -> std::sync::MutexGuard<'_, Option<DateTime<Utc>>> {
        self.last_sync.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The queue this engine drains.
    pub fn queue(&self) -> &Arc<MutationQueue> {
        &self.queue
    }

    pub fn monitor(&self) -> &Arc<ConnectivityMonitor> {
        &self.monitor
    }

    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.remote
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Re-reads the queue length. A failed read keeps the previous count.
    pub fn refresh_pending(&self) -> usize {
        match self.queue.len() {
            Ok(n) => {
                self.pending.store(n, Ordering::Release);
                n
            }
            Err(e) => {
                warn!("could not read queue length: {e}");
                self.pending.load(Ordering::Acquire)
            }
        }
    }

    pub fn state(&self) -> SyncState {
        SyncState {
            is_online: self.monitor.current(),
            pending_count: self.pending.load(Ordering::Acquire),
            sync_in_progress: self.in_progress.load(Ordering::Acquire),
            last_sync_time: *self.last_sync_guard(),
        }
    }

    /// Replays the queue once.
    ///
    /// Returns one outcome per attempted record, in queue order. Returns no
    /// outcomes when offline, when another drain is running, or when the
    /// queue cannot be read.
    pub async fn drain(&self) -> Vec<ReplayOutcome> {
        if !self.monitor.current() {
            debug!("drain skipped: offline");
            return Vec::new();
        }
        let Some(_claim) = InProgress::claim(&self.in_progress) else {
            debug!("drain skipped: already in progress");
            return Vec::new();
        };

        let records = match self.queue.list() {
            Ok(records) => records,
            Err(e) => {
                warn!("drain aborted, queue unreadable: {e}");
                return Vec::new();
            }
        };
        let planned = records.len();
        if planned > 0 {
            info!("replaying {planned} queued mutation(s)");
        }

        let mut outcomes = Vec::with_capacity(planned);
        for record in records {
            if !outcomes.is_empty() && !self.monitor.current() {
                info!("went offline mid-drain, {} left", planned - outcomes.len());
                break;
            }
            match self.remote.apply(&record.target, &record.kind).await {
                Ok(()) => {
                    if let Err(e) = self.queue.remove(&record.id) {
                        // Stays queued and is replayed by the next drain.
                        warn!("could not dequeue {}: {e}", record.id);
                    }
                    debug!("replayed {} {} {}", record.id, record.kind.name(), record.target);
                    outcomes.push(ReplayOutcome::succeeded(record));
                }
                Err(e) => {
                    warn!(
                        "replay of {} {} {} failed: {e}",
                        record.id,
                        record.kind.name(),
                        record.target
                    );
                    outcomes.push(ReplayOutcome::failed(record, e.to_string()));
                }
            }
        }

        self.refresh_pending();
        let now = self.clock.now();
        *self.last_sync_guard() = Some(now);
        if let Some(store) = &self.last_sync_store {
            store.store_last_sync(now);
        }
        if let Some(notification) = summarize(&outcomes, planned) {
            self.notifier.notify(notification);
        }
        outcomes
    }

    /// Explicit user-requested sync.
    pub async fn request_sync(&self) -> Vec<ReplayOutcome> {
        self.drain().await
    }

    /// Drains if online with records pending; returns how many remain.
    pub async fn sync_pending(&self) -> usize {
        if self.monitor.current() && self.refresh_pending() > 0 {
            self.drain().await;
        }
        self.refresh_pending()
    }

    /// Reacts to a connectivity report.
    ///
    /// Only an offline to online transition with records pending triggers a
    /// drain; repeated reports of the same state do nothing.
    pub async fn handle_connectivity(&self, online: bool) -> Option<Vec<ReplayOutcome>> {
        let was_online = self.was_online.swap(online, Ordering::AcqRel);
        if was_online || !online {
            return None;
        }
        if self.refresh_pending() == 0 {
            return None;
        }
        Some(self.drain().await)
    }

    /// Drains on every reconnect until `cancel` fires.
    pub fn spawn_auto_sync(self: Arc<Self>, cancel: CancellationToken) -> JoinHandle<()> {
        let (subscription, mut events) = self.monitor.events();
        tokio::spawn(async move {
            let _subscription = subscription;
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = events.recv() => match event {
                        Some(online) => {
                            self.handle_connectivity(online).await;
                        }
                        None => break,
                    },
                }
            }
            debug!("auto-sync stopped");
        })
    }

    /// Forgets session state after logout.
    pub fn reset(&self) {
        self.pending.store(0, Ordering::Release);
        *self.last_sync_guard() = None;
    }
}
