// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity monitoring.
//!
//! A [`ConnectivityOracle`] reports raw network state changes. The
//! [`ConnectivityMonitor`] keeps the last observed state and calls its
//! listeners on every report, duplicates included; listeners must treat a
//! repeated value as a no-op.

use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Network state as reported by an oracle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkState {
    /// A network link is up.
    pub is_connected: bool,
    /// The internet (the remote store) can actually be reached.
    pub is_internet_reachable: bool,
}

impl NetworkState {
    pub fn online() -> Self {
        NetworkState {
            is_connected: true,
            is_internet_reachable: true,
        }
    }

    pub fn offline() -> Self {
        NetworkState::default()
    }

    /// Online means both a link and reachability.
    pub fn is_online(&self) -> bool {
        self.is_connected && self.is_internet_reachable
    }
}

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

struct MonitorInner {
    online: AtomicBool,
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

impl MonitorInner {
    fn detach(&self, id: u64) {
        self.listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(l, _)| *l != id);
    }
}

/// Last known online/offline state plus change listeners.
pub struct ConnectivityMonitor {
    inner: Arc<MonitorInner>,
}

impl ConnectivityMonitor {
    /// Creates a monitor that starts offline.
    pub fn new() -> Self {
        ConnectivityMonitor {
            inner: Arc::new(MonitorInner {
                online: AtomicBool::new(false),
                next_id: AtomicU64::new(0),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Last observed state.
    pub fn current(&self) -> bool {
        self.inner.online.load(Ordering::Acquire)
    }

    /// Records an oracle report and notifies every listener.
    pub fn observe(&self, state: NetworkState) {
        let online = state.is_online();
        let was = self.inner.online.swap(online, Ordering::AcqRel);
        if was != online {
            info!(
                "connectivity: {} (link {}, reachable {})",
                if online { "online" } else { "offline" },
                state.is_connected,
                state.is_internet_reachable
            );
        }

        // Call listeners outside the lock so they may subscribe or unsubscribe.
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(online);
        }
    }

    /// Registers `listener` for every future report.
    ///
    /// The listener stays attached until the returned [`Subscription`] is
    /// dropped or unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(listener)));
        Subscription {
            monitor: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Streams every report through a channel.
    pub fn events(&self) -> (Subscription, mpsc::UnboundedReceiver<bool>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |online| {
            let _ = tx.send(online);
        });
        (subscription, rx)
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle that detaches a listener when dropped.
pub struct Subscription {
    monitor: Weak<MonitorInner>,
    id: u64,
}

impl Subscription {
    /// Detaches the listener now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.monitor.upgrade() {
            inner.detach(self.id);
        }
    }
}

/// Source of network state reports.
pub trait ConnectivityOracle: Send + Sync {
    /// Fetches the current state.
    fn fetch(&self) -> Pin<Box<dyn Future<Output = NetworkState> + Send + '_>>;

    /// Streams subsequent state changes until the receiver is dropped.
    fn watch(&self) -> mpsc::UnboundedReceiver<NetworkState>;
}

/// Forwards every oracle report into `monitor`.
pub fn spawn_oracle_feed(
    oracle: Arc<dyn ConnectivityOracle>,
    monitor: Arc<ConnectivityMonitor>,
) -> JoinHandle<()> {
    let mut changes = oracle.watch();
    tokio::spawn(async move {
        while let Some(state) = changes.recv().await {
            monitor.observe(state);
        }
        debug!("connectivity oracle feed ended");
    })
}

/// Oracle whose state is set by hand.
///
/// Used for `--offline` and in tests. Every [`ManualOracle::set`] is
/// reported, even if the state did not change.
#[derive(Default)]
pub struct ManualOracle {
    state: Mutex<NetworkState>,
    watchers: Mutex<Vec<mpsc::UnboundedSender<NetworkState>>>,
}

impl ManualOracle {
    pub fn new(state: NetworkState) -> Self {
        ManualOracle {
            state: Mutex::new(state),
            watchers: Mutex::new(Vec::new()),
        }
    }

    /// Changes the state and reports it to every watcher.
    pub fn set(&self, state: NetworkState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
        self.watchers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|tx| tx.send(state).is_ok());
    }
}

impl ConnectivityOracle for ManualOracle {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = NetworkState> + Send + '_>> {
        let state = *self.state.lock().unwrap_or_else(|e| e.into_inner());
        Box::pin(async move { state })
    }

    fn watch(&self) -> mpsc::UnboundedReceiver<NetworkState> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.watchers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(tx);
        rx
    }
}

/// Oracle that probes the remote host.
///
/// The link is considered up when the OS has a route to the host, and
/// reachable when a TCP connection to it succeeds within the timeout.
/// [`ConnectivityOracle::watch`] probes on an interval and reports only
/// changes.
#[derive(Debug, Clone)]
pub struct ProbeOracle {
    /// `host:port` to probe.
    pub addr: String,
    pub interval: Duration,
    pub timeout: Duration,
}

impl ProbeOracle {
    pub fn new(addr: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        ProbeOracle {
            addr: addr.into(),
            interval,
            timeout,
        }
    }

    /// Probes once.
    pub async fn probe(&self) -> NetworkState {
        let resolved = tokio::time::timeout(self.timeout, tokio::net::lookup_host(&self.addr))
            .await
            .ok()
            .and_then(|r| r.ok())
            .and_then(|mut addrs| addrs.next());
        // A name that does not resolve counts as no link.
        let Some(addr) = resolved else {
            debug!("probe {}: does not resolve", self.addr);
            return NetworkState::offline();
        };

        let is_connected = has_route(addr).await;
        let is_internet_reachable = is_connected
            && matches!(
                tokio::time::timeout(self.timeout, tokio::net::TcpStream::connect(addr)).await,
                Ok(Ok(_))
            );
        let state = NetworkState {
            is_connected,
            is_internet_reachable,
        };
        debug!("probe {} ({addr}): {:?}", self.addr, state);
        state
    }
}

async fn has_route(addr: SocketAddr) -> bool {
    let local: SocketAddr = if addr.is_ipv4() {
        SocketAddr::from(([0, 0, 0, 0], 0))
    } else {
        SocketAddr::from(([0u16; 8], 0))
    };
    match tokio::net::UdpSocket::bind(local).await {
        Ok(socket) => socket.connect(addr).await.is_ok(),
        Err(_) => false,
    }
}

impl ConnectivityOracle for ProbeOracle {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = NetworkState> + Send + '_>> {
        Box::pin(self.probe())
    }

    fn watch(&self) -> mpsc::UnboundedReceiver<NetworkState> {
        let (tx, rx) = mpsc::unbounded_channel();
        let probe = self.clone();
        tokio::spawn(async move {
            let mut last: Option<NetworkState> = None;
            let mut ticker = tokio::time::interval(probe.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let state = probe.probe().await;
                if last != Some(state) {
                    last = Some(state);
                    if tx.send(state).is_err() {
                        break;
                    }
                } else if tx.is_closed() {
                    break;
                }
            }
        });
        rx
    }
}
