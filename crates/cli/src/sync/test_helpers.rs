// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ll_core::{
    ClockSource, Document, DocumentRef, DocumentStore, ErrorCode, FieldWrite, KeyValueStore,
    ManualClock, MemoryStore, MutationKind,
};
use serde_json::{json, Value};

use super::connectivity::{ConnectivityMonitor, NetworkState};
use super::queue::MutationQueue;
use super::remote::{RemoteError, RemoteFuture, RemoteStore};

/// A clock pinned to 2024-01-01T12:00:00Z.
pub fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::at("2024-01-01T12:00:00Z").unwrap())
}

/// Builds a document from a JSON object literal.
pub fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap()
}

/// A `set` mutation writing `{"n": n}`.
pub fn set_n(n: i64) -> MutationKind {
    MutationKind::Set {
        data: doc(json!({ "n": n })),
        merge: false,
    }
}

/// A monitor that has already observed `online`.
pub fn monitor(online: bool) -> Arc<ConnectivityMonitor> {
    let monitor = Arc::new(ConnectivityMonitor::new());
    monitor.observe(if online {
        NetworkState::online()
    } else {
        NetworkState::offline()
    });
    monitor
}

/// A queue over a fresh memory store.
pub fn memory_queue(clock: Arc<dyn ClockSource>) -> Arc<MutationQueue> {
    Arc::new(MutationQueue::new(Arc::new(MemoryStore::new()), clock))
}

/// Key-value store whose reads or writes can be made to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    fn check(&self, flag: &AtomicBool) -> ll_core::Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(ll_core::Error::Storage("disk full".into()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for FlakyStore {
    fn get_item(&self, key: &str) -> ll_core::Result<Option<String>> {
        self.check(&self.fail_reads)?;
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> ll_core::Result<()> {
        self.check(&self.fail_writes)?;
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> ll_core::Result<()> {
        self.check(&self.fail_writes)?;
        self.inner.remove_item(key)
    }
}

/// A call the mock remote received.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Get(DocumentRef),
    Set(DocumentRef, Document, bool),
    Update(DocumentRef, Vec<FieldWrite>),
    Delete(DocumentRef),
}

impl RemoteCall {
    pub fn target(&self) -> &DocumentRef {
        match self {
            RemoteCall::Get(t)
            | RemoteCall::Set(t, ..)
            | RemoteCall::Update(t, _)
            | RemoteCall::Delete(t) => t,
        }
    }
}

/// In-memory remote document store with call recording and failure injection.
#[derive(Default)]
pub struct MockRemote {
    pub docs: Mutex<DocumentStore>,
    calls: Mutex<Vec<RemoteCall>>,
    unavailable: AtomicBool,
    /// Documents whose writes are rejected.
    rejected: Mutex<HashSet<DocumentRef>>,
    /// Flip this monitor offline once this many writes have been made.
    offline_after: Mutex<Option<(usize, Arc<ConnectivityMonitor>)>>,
    writes: AtomicUsize,
    /// Yield once per call so concurrent callers interleave.
    yield_first: AtomicBool,
}

impl MockRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn write_calls(&self) -> Vec<RemoteCall> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, RemoteCall::Get(_)))
            .collect()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn reject(&self, target: DocumentRef) {
        self.rejected.lock().unwrap().insert(target);
    }

    pub fn go_offline_after(&self, writes: usize, monitor: Arc<ConnectivityMonitor>) {
        *self.offline_after.lock().unwrap() = Some((writes, monitor));
    }

    pub fn yield_on_call(&self) {
        self.yield_first.store(true, Ordering::SeqCst);
    }

    pub fn document(&self, target: &DocumentRef) -> Option<Document> {
        self.docs.lock().unwrap().get(target)
    }

    pub fn seed(&self, target: &DocumentRef, data: Value) {
        self.docs.lock().unwrap().set(target, doc(data), false);
    }

    async fn call(&self, call: RemoteCall) -> Result<Option<Document>, RemoteError> {
        if self.yield_first.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        let target = call.target().clone();
        self.calls.lock().unwrap().push(call.clone());

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable("mock offline".into()));
        }

        let is_write = !matches!(call, RemoteCall::Get(_));
        let result = if is_write && self.rejected.lock().unwrap().contains(&target) {
            Err(RemoteError::Rejected {
                code: ErrorCode::InvalidArgument,
                message: format!("mock rejected {target}"),
            })
        } else {
            let mut docs = self.docs.lock().unwrap();
            match call {
                RemoteCall::Get(t) => Ok(docs.get(&t)),
                RemoteCall::Set(t, data, merge) => {
                    docs.set(&t, data, merge);
                    Ok(None)
                }
                RemoteCall::Update(t, fields) => docs
                    .update(&t, &fields)
                    .map(|_| None)
                    .map_err(|e| RemoteError::NotFound(e.to_string())),
                RemoteCall::Delete(t) => {
                    docs.delete(&t);
                    Ok(None)
                }
            }
        };

        if is_write {
            let n = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some((after, monitor)) = self.offline_after.lock().unwrap().as_ref() {
                if n >= *after {
                    monitor.observe(NetworkState::offline());
                }
            }
        }
        result
    }
}

impl RemoteStore for MockRemote {
    fn get<'a>(&'a self, target: &'a DocumentRef) -> RemoteFuture<'a, Option<Document>> {
        Box::pin(async move { self.call(RemoteCall::Get(target.clone())).await })
    }

    fn set<'a>(
        &'a self,
        target: &'a DocumentRef,
        data: Document,
        merge: bool,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.call(RemoteCall::Set(target.clone(), data, merge))
                .await
                .map(|_| ())
        })
    }

    fn update<'a>(
        &'a self,
        target: &'a DocumentRef,
        fields: Vec<FieldWrite>,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.call(RemoteCall::Update(target.clone(), fields))
                .await
                .map(|_| ())
        })
    }

    fn delete<'a>(&'a self, target: &'a DocumentRef) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            self.call(RemoteCall::Delete(target.clone()))
                .await
                .map(|_| ())
        })
    }
}
