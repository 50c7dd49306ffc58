// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-capable write synchronization.
//!
//! Writes that cannot reach the remote document store are queued durably and
//! replayed in order once connectivity returns.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  SyncEngine  │────►│ RemoteStore  │────►│  ll-remote  │
//! │   (drain)    │     │   (trait)    │     │   server    │
//! └──────────────┘     └──────────────┘     └─────────────┘
//!    │        ▲
//!    ▼        │ online/offline
//! ┌───────────┐  ┌──────────────┐     ┌────────────┐
//! │  Queue    │  │ Connectivity │◄────│   Oracle   │
//! │ (KV store)│  │   Monitor    │     │  (probe)   │
//! └───────────┘  └──────────────┘     └────────────┘
//! ```
//!
//! # Features
//!
//! - Mutation queue persisted in the local key-value store
//! - FIFO replay with per-record success/failure, failures stay queued
//! - At most one drain in flight
//! - Automatic drain on every Offline→Online transition
//! - Injectable remote, oracle and transport traits for testing

mod connectivity;
mod engine;
mod queue;
mod remote;
mod report;
mod transport;

pub use connectivity::{
    spawn_oracle_feed, ConnectivityMonitor, ConnectivityOracle, ManualOracle, NetworkState,
    ProbeOracle, Subscription,
};
pub use engine::{LastSyncStore, SyncEngine, SyncState};
pub use queue::{MutationQueue, QueueError, QueueResult, QUEUE_KEY};
pub use remote::{
    RemoteConfig, RemoteError, RemoteFuture, RemoteResult, RemoteStore, WebSocketRemote,
};
pub use report::{
    summarize, ChannelNotifier, Notification, Notifier, ReplayOutcome, TracingNotifier,
};
pub use transport::{Transport, TransportError, TransportResult, WebSocketTransport};

#[cfg(test)]
pub(crate) mod test_helpers;



#[cfg(test)]
mod integration_tests;




#[cfg(test)]
mod transport_tests;
