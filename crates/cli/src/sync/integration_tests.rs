// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Integration tests for the sync module.
//!
//! These tests wire the queue, monitor, engine and a remote together:
//! - Offline writes flushed on reconnect
//! - Ordered replay of mixed mutations
//! - Replay through the wire protocol client

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ll_core::protocol::{ClientMessage, ErrorCode, ServerMessage};
use ll_core::{DocumentRef, DocumentStore, FieldPath, FieldWrite, MutationKind, SqliteStore};
use serde_json::json;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

use super::connectivity::{spawn_oracle_feed, ConnectivityMonitor, ManualOracle, NetworkState};
use super::engine::SyncEngine;
use super::queue::MutationQueue;
use super::remote::{RemoteConfig, WebSocketRemote};
use super::report::{ChannelNotifier, Notification};
use super::test_helpers::{doc, test_clock, MockRemote, RemoteCall};
use super::transport_tests::MockTransport;

fn workouts() -> DocumentRef {
    DocumentRef::new("workouts", "user-1")
}

fn create_leg_day() -> MutationKind {
    MutationKind::Set {
        data: doc(json!({
            "leg_day_123": {
                "name": "Leg Day",
                "exercices": [{"id": "exercise_1", "name": "Squat", "type": "muscu"}],
                "perf": {}
            }
        })),
        merge: true,
    }
}

/// Offline write, then reconnect: the automatic drain flushes the queue.
#[tokio::test]
async fn test_offline_write_flushes_on_reconnect() {
    let clock = test_clock();
    let dir = tempdir().unwrap();
    let store = Arc::new(SqliteStore::open(&dir.path().join("liftlog.db")).unwrap());
    let queue = Arc::new(MutationQueue::new(store, clock.clone()));
    let remote = MockRemote::new();
    let oracle = Arc::new(ManualOracle::new(NetworkState::offline()));
    let monitor = Arc::new(ConnectivityMonitor::new());
    let (notifier, mut notes) = ChannelNotifier::new();
    let engine = Arc::new(SyncEngine::new(
        queue.clone(),
        remote.clone(),
        monitor.clone(),
        Arc::new(notifier),
        clock.clone(),
    ));
    engine.init();

    let feed = spawn_oracle_feed(oracle.clone(), monitor.clone());
    let cancel = CancellationToken::new();
    let auto = engine.clone().spawn_auto_sync(cancel.clone());

    queue.enqueue(workouts(), create_leg_day()).unwrap();
    engine.refresh_pending();
    assert_eq!(engine.state().pending_count, 1);
    assert!(remote.calls().is_empty());

    oracle.set(NetworkState::online());
    let note = tokio::time::timeout(Duration::from_secs(5), notes.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(note, Notification::SyncSucceeded { count: 1 });

    let state = engine.state();
    assert_eq!(state.pending_count, 0);
    assert!(state.is_online);
    assert!(state.last_sync_time.is_some());
    let stored = remote.document(&workouts()).unwrap();
    assert_eq!(stored["leg_day_123"]["name"], "Leg Day");

    // A repeated online report does not drain again.
    oracle.set(NetworkState::online());
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(remote.write_calls().len(), 1);

    cancel.cancel();
    auto.await.unwrap();
    drop(oracle);
    feed.await.unwrap();
}

/// A queued delete carries no payload and is replayed exactly once.
#[tokio::test]
async fn test_offline_delete_replays_once() {
    let clock = test_clock();
    let queue = Arc::new(MutationQueue::new(
        Arc::new(ll_core::MemoryStore::new()),
        clock.clone(),
    ));
    let remote = MockRemote::new();
    let target = DocumentRef::new("notes", "n1");
    remote.seed(&target, json!({"text": "hi"}));
    let monitor = Arc::new(ConnectivityMonitor::new());
    let (notifier, _notes) = ChannelNotifier::new();
    let engine = SyncEngine::new(
        queue.clone(),
        remote.clone(),
        monitor.clone(),
        Arc::new(notifier),
        clock,
    );

    queue.enqueue(target.clone(), MutationKind::Delete).unwrap();
    let raw = serde_json::to_value(queue.list().unwrap()).unwrap();
    assert!(raw[0].get("data").is_none());
    assert_eq!(raw[0]["type"], "delete");

    monitor.observe(NetworkState::online());
    engine.handle_connectivity(true).await.unwrap();
    engine.drain().await;

    assert_eq!(remote.write_calls(), vec![RemoteCall::Delete(target.clone())]);
    assert_eq!(remote.document(&target), None);
}

/// Mixed mutations on one document replay in enqueue order.
#[tokio::test]
async fn test_replay_preserves_order() {
    let clock = test_clock();
    let queue = Arc::new(MutationQueue::new(
        Arc::new(ll_core::MemoryStore::new()),
        clock.clone(),
    ));
    let remote = MockRemote::new();
    let monitor = Arc::new(ConnectivityMonitor::new());
    monitor.observe(NetworkState::online());
    let (notifier, _notes) = ChannelNotifier::new();
    let engine = SyncEngine::new(queue.clone(), remote.clone(), monitor, Arc::new(notifier), clock);

    queue.enqueue(workouts(), create_leg_day()).unwrap();
    queue
        .enqueue(
            workouts(),
            MutationKind::Update {
                fields: vec![FieldWrite::put(
                    FieldPath::parse("leg_day_123.name").unwrap(),
                    "Leg Day II",
                )],
            },
        )
        .unwrap();
    queue
        .enqueue(
            workouts(),
            MutationKind::Update {
                fields: vec![FieldWrite::remove(
                    FieldPath::parse("leg_day_123.perf").unwrap(),
                )],
            },
        )
        .unwrap();

    let outcomes = engine.drain().await;
    assert!(outcomes.iter().all(|o| o.success));

    let kinds: Vec<&str> = remote
        .write_calls()
        .iter()
        .map(|c| match c {
            RemoteCall::Set(..) => "set",
            RemoteCall::Update(..) => "update",
            RemoteCall::Delete(_) => "delete",
            RemoteCall::Get(_) => "get",
        })
        .collect();
    assert_eq!(kinds, vec!["set", "update", "update"]);

    let stored = remote.document(&workouts()).unwrap();
    assert_eq!(stored["leg_day_123"]["name"], "Leg Day II");
    assert!(stored["leg_day_123"].get("perf").is_none());
}

/// The engine replays through the wire client exactly as through any remote.
#[tokio::test]
async fn test_replay_over_protocol_client() {
    let server_docs = Arc::new(Mutex::new(DocumentStore::new()));
    let docs = server_docs.clone();
    let transport = MockTransport::new().with_responder(move |msg| match msg {
        ClientMessage::Write {
            request_id,
            target,
            mutation,
        } => Some(match docs.lock().unwrap().apply(target, mutation) {
            Ok(()) => ServerMessage::ack(*request_id),
            Err(e) => ServerMessage::error(Some(*request_id), ErrorCode::NotFound, e.to_string()),
        }),
        _ => None,
    });
    let remote = Arc::new(WebSocketRemote::with_transport(
        RemoteConfig::default(),
        transport,
    ));

    let clock = test_clock();
    let queue = Arc::new(MutationQueue::new(
        Arc::new(ll_core::MemoryStore::new()),
        clock.clone(),
    ));
    let monitor = Arc::new(ConnectivityMonitor::new());
    monitor.observe(NetworkState::online());
    let (notifier, mut notes) = ChannelNotifier::new();
    let engine = SyncEngine::new(queue.clone(), remote, monitor, Arc::new(notifier), clock);

    // The update targets a document that never existed and is refused.
    queue
        .enqueue(
            DocumentRef::new("workouts", "ghost"),
            MutationKind::Update {
                fields: vec![FieldWrite::put(FieldPath::parse("a").unwrap(), 1)],
            },
        )
        .unwrap();
    queue.enqueue(workouts(), create_leg_day()).unwrap();

    let outcomes = engine.drain().await;
    assert_eq!(
        outcomes.iter().map(|o| o.success).collect::<Vec<_>>(),
        vec![false, true]
    );
    assert_eq!(queue.len().unwrap(), 1);
    assert!(server_docs.lock().unwrap().get(&workouts()).is_some());
    assert_eq!(
        notes.try_recv().unwrap(),
        Notification::SyncPartiallyFailed {
            succeeded: 1,
            failed: 1
        }
    );
}
