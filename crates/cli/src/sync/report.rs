// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Replay outcomes and user-facing notifications.

use std::fmt;

use ll_core::MutationRecord;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Result of replaying one queued record.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub record: MutationRecord,
    pub success: bool,
    /// Failure description, set only when `success` is false.
    pub error: Option<String>,
}

impl ReplayOutcome {
    pub fn succeeded(record: MutationRecord) -> Self {
        ReplayOutcome {
            record,
            success: true,
            error: None,
        }
    }

    pub fn failed(record: MutationRecord, error: impl Into<String>) -> Self {
        ReplayOutcome {
            record,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Every record of a drain reached the remote.
    SyncSucceeded { count: usize },
    /// Some records were rejected and remain queued.
    SyncPartiallyFailed { succeeded: usize, failed: usize },
    /// Connectivity dropped before the drain got through the queue.
    SyncInterrupted {
        succeeded: usize,
        failed: usize,
        remaining: usize,
    },
    /// A write reached the remote directly.
    WriteConfirmed { what: String },
    /// A write was stored locally and will be sent later.
    WriteQueued { what: String },
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::SyncSucceeded { count } => {
                write!(f, "synced {count} offline change{}", plural(*count))
            }
            Notification::SyncPartiallyFailed { succeeded, failed } => write!(
                f,
                "synced {succeeded} change{}, {failed} failed and stay queued",
                plural(*succeeded)
            ),
            Notification::SyncInterrupted {
                succeeded,
                failed,
                remaining,
            } => write!(
                f,
                "sync interrupted: {succeeded} synced, {failed} failed, {remaining} not attempted"
            ),
            Notification::WriteConfirmed { what } => write!(f, "{what} saved"),
            Notification::WriteQueued { what } => {
                write!(f, "{what} saved offline, will sync when online")
            }
        }
    }
}

/// Summarizes a drain that planned to replay `planned` records.
///
/// Returns `None` when there was nothing to replay.
pub fn summarize(outcomes: &[ReplayOutcome], planned: usize) -> Option<Notification> {
    if planned == 0 {
        return None;
    }
    let succeeded = outcomes.iter().filter(|o| o.success).count();
    let failed = outcomes.len() - succeeded;
    let remaining = planned.saturating_sub(outcomes.len());

    Some(if remaining > 0 {
        Notification::SyncInterrupted {
            succeeded,
            failed,
            remaining,
        }
    } else if failed > 0 {
        Notification::SyncPartiallyFailed { succeeded, failed }
    } else {
        Notification::SyncSucceeded { count: succeeded }
    })
}

/// Receiver of user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that writes to the log.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::SyncPartiallyFailed { .. } | Notification::SyncInterrupted { .. } => {
                warn!("{notification}")
            }
            _ => info!("{notification}"),
        }
    }
}

/// Notifier that forwards notifications into a channel.
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiving end of its channel.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelNotifier { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        debug!("notify: {notification}");
        // Nobody listening is fine.
        let _ = self.tx.send(notification);
    }
}
