// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Composition root.
//!
//! [`App`] wires the local store, queue, connectivity, remote client, sync
//! engine, snapshot cache and write façade together, and owns the session
//! lifecycle: `login`, `resume`, `refresh` and `logout`.

use std::path::Path;
use std::sync::Arc;

use ll_core::{
    ClockSource, DocumentStore, KeyValueStore, MutationId, MutationRecord, SqliteStore,
    SystemClock,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::LocalSnapshotCache;
use crate::config::{db_path, Config};
use crate::error::{Error, Result};
use crate::repository::{UserDocumentRepository, WorkoutRepository};
use crate::service::WorkoutService;
use crate::session::{AppState, Session};
use crate::sync::{
    spawn_oracle_feed, ChannelNotifier, ConnectivityMonitor, ConnectivityOracle, ManualOracle,
    MutationQueue, NetworkState, Notification, Notifier, ProbeOracle, RemoteStore, ReplayOutcome,
    SyncEngine, TracingNotifier, WebSocketRemote,
};

/// Startup options from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppOptions {
    /// Never touch the network.
    pub offline: bool,
}

/// Collaborators an [`App`] is built from.
pub struct AppParts {
    pub store: Arc<dyn KeyValueStore>,
    pub remote: Arc<dyn RemoteStore>,
    pub oracle: Arc<dyn ConnectivityOracle>,
    pub clock: Arc<dyn ClockSource>,
}

/// Logs every notification and forwards it to the app's channel.
struct AppNotifier {
    channel: ChannelNotifier,
}

impl Notifier for AppNotifier {
    fn notify(&self, notification: Notification) {
        TracingNotifier.notify(notification.clone());
        self.channel.notify(notification);
    }
}

pub struct App {
    state: Arc<AppState>,
    repo: Arc<dyn WorkoutRepository>,
    engine: Arc<SyncEngine>,
    cache: Arc<LocalSnapshotCache>,
    service: WorkoutService,
    oracle: Arc<dyn ConnectivityOracle>,
    clock: Arc<dyn ClockSource>,
    notes: UnboundedReceiver<Notification>,
}

impl App {
    /// Opens the app over the data directory.
    pub async fn open(data_dir: &Path, options: AppOptions) -> Result<App> {
        let config = Config::load(data_dir)?;
        std::fs::create_dir_all(data_dir)?;
        let store = Arc::new(SqliteStore::open(&db_path(data_dir))?);
        let remote = Arc::new(WebSocketRemote::new(config.remote.client_config()));
        let oracle: Arc<dyn ConnectivityOracle> = if options.offline {
            Arc::new(ManualOracle::new(NetworkState::offline()))
        } else {
            Arc::new(ProbeOracle::new(
                config.probe_addr()?,
                config.probe_interval(),
                config.probe_timeout(),
            ))
        };

        let app = App::assemble(AppParts {
            store,
            remote,
            oracle,
            clock: Arc::new(SystemClock),
        });
        app.start().await;
        Ok(app)
    }

    /// Wires the parts together. Call [`App::start`] before use.
    pub fn assemble(parts: AppParts) -> App {
        let AppParts {
            store,
            remote,
            oracle,
            clock,
        } = parts;

        let queue = Arc::new(MutationQueue::new(store.clone(), clock.clone()));
        let cache = Arc::new(LocalSnapshotCache::new(store));
        let monitor = Arc::new(ConnectivityMonitor::new());
        let (channel, notes) = ChannelNotifier::new();
        let engine = Arc::new(
            SyncEngine::new(
                queue,
                remote,
                monitor,
                Arc::new(AppNotifier { channel }),
                clock.clone(),
            )
            .with_last_sync_store(cache.clone()),
        );
        let repo: Arc<dyn WorkoutRepository> = Arc::new(UserDocumentRepository);
        let state = Arc::new(AppState::new(repo.clone()));
        let service = WorkoutService::new(
            state.clone(),
            repo.clone(),
            engine.clone(),
            cache.clone(),
            clock.clone(),
        );

        App {
            state,
            repo,
            engine,
            cache,
            service,
            oracle,
            clock,
            notes,
        }
    }

    /// Reads the initial connectivity state and the persisted sync state.
    pub async fn start(&self) {
        let initial = self.oracle.fetch().await;
        self.engine.monitor().observe(initial);
        self.engine.init();
        info!(
            "started {}, {} queued write(s)",
            if initial.is_online() { "online" } else { "offline" },
            self.engine.state().pending_count
        );
    }

    /// Feeds connectivity changes to the monitor and drains on reconnect,
    /// until `cancel` fires.
    pub fn spawn_background(&self, cancel: CancellationToken) -> Vec<JoinHandle<()>> {
        let feed = spawn_oracle_feed(self.oracle.clone(), self.engine.monitor().clone());
        let auto_sync = self.engine.clone().spawn_auto_sync(cancel.clone());
        let stop_feed = {
            let abort = feed.abort_handle();
            tokio::spawn(async move {
                cancel.cancelled().await;
                abort.abort();
            })
        };
        vec![feed, auto_sync, stop_feed]
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    pub fn service(&self) -> &WorkoutService {
        &self.service
    }

    pub fn engine(&self) -> &Arc<SyncEngine> {
        &self.engine
    }

    pub fn clock(&self) -> &Arc<dyn ClockSource> {
        &self.clock
    }

    pub fn is_online(&self) -> bool {
        self.engine.monitor().current()
    }

    /// Notifications raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        let mut notes = Vec::new();
        while let Ok(note) = self.notes.try_recv() {
            notes.push(note);
        }
        notes
    }

    pub async fn next_notification(&mut self) -> Option<Notification> {
        self.notes.recv().await
    }

    /// Starts a session for `user_id`.
    ///
    /// Shows the cached snapshot first, then replays the queue and refreshes
    /// from the remote when online.
    pub async fn login(&self, user_id: &str) -> Result<Session> {
        if let Some(cached) = self.cache.cached_user()? {
            if cached != user_id {
                return Err(Error::AlreadyLoggedIn(cached));
            }
        }
        self.state.set_loading(true);
        let result = self.load_session(Session::new(user_id)).await;
        self.state.set_loading(false);
        result
    }

    async fn load_session(&self, session: Session) -> Result<Session> {
        self.restore(session.clone())?;
        if self.is_online() {
            self.refresh().await?;
        }
        self.save_snapshot();
        Ok(session)
    }

    /// Restores the cached session without touching the network.
    pub fn resume(&self) -> Result<Session> {
        let user = self.cache.cached_user()?.ok_or(Error::NotLoggedIn)?;
        let session = Session::new(user);
        self.restore(session.clone())?;
        Ok(session)
    }

    fn restore(&self, session: Session) -> Result<()> {
        let user = session.user_id.clone();
        self.state.init(session);
        if let Some(snapshot) = self.cache.load(&user)? {
            self.state.restore(snapshot)?;
        }
        self.overlay_pending();
        Ok(())
    }

    /// Replays queued writes onto the mirror. Writes the mirror already
    /// holds leave it unchanged.
    fn overlay_pending(&self) {
        let records = match self.engine.queue().list() {
            Ok(records) => records,
            Err(e) => {
                warn!("could not read queue: {e}");
                return;
            }
        };
        for record in records {
            if let Err(e) = self.state.apply(&record.target, &record.kind) {
                warn!("queued {} does not apply locally: {e}", record.id);
            }
        }
    }

    /// Replays the queue, then reloads the user's documents from the remote.
    pub async fn refresh(&self) -> Result<Vec<ReplayOutcome>> {
        let session = self.state.require_session()?;
        let outcomes = self.engine.request_sync().await;
        if !self.is_online() {
            return Ok(outcomes);
        }
        match self.fetch_mirror(&session.user_id).await {
            Ok(mirror) => {
                self.state.replace_mirror(mirror)?;
                self.overlay_pending();
                self.save_snapshot();
                debug!("mirror refreshed from remote");
            }
            Err(e) => warn!("could not refresh from remote: {e}"),
        }
        Ok(outcomes)
    }

    async fn fetch_mirror(&self, user: &str) -> Result<DocumentStore> {
        let remote = self.engine.remote().as_ref();
        Ok(self.repo.fetch_documents(remote, user).await?)
    }

    fn save_snapshot(&self) {
        if let Err(e) = self.state.snapshot().and_then(|s| self.cache.save(&s)) {
            warn!("could not save snapshot: {e}");
        }
    }

    /// Queued writes, oldest first.
    pub fn pending(&self) -> Result<Vec<MutationRecord>> {
        Ok(self.engine.queue().list()?)
    }

    /// Drops a queued write without sending it.
    ///
    /// The mirror keeps the change until the next refresh from the remote.
    pub fn discard(&self, id: &str) -> Result<MutationRecord> {
        let id = MutationId::from(id);
        let record = self
            .engine
            .queue()
            .get(&id)?
            .ok_or_else(|| Error::MutationNotFound(id.to_string()))?;
        self.engine.queue().remove(&id)?;
        self.engine.refresh_pending();
        info!("discarded {} {} {}", record.id, record.kind.name(), record.target);
        Ok(record)
    }

    /// Ends the session and forgets everything stored locally for it.
    pub fn logout(&self) -> Result<()> {
        let dropped = self.engine.queue().len()?;
        if dropped > 0 {
            warn!("logout drops {dropped} unsynced write(s)");
        }
        self.state.teardown();
        self.engine.queue().clear()?;
        self.cache.clear()?;
        self.engine.reset();
        Ok(())
    }
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
