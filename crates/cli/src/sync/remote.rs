// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote document store client.
//!
//! [`RemoteStore`] is the seam between the sync engine and the server.
//! [`WebSocketRemote`] speaks the ll-remote request/reply protocol over a
//! [`Transport`], connecting lazily on first use and reconnecting after any
//! failure.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ll_core::protocol::{ClientMessage, ErrorCode, ServerMessage};
use ll_core::{Document, DocumentRef, FieldWrite, MutationKind};
use tracing::{debug, warn};

use super::transport::{Transport, TransportError, WebSocketTransport};

/// Error type for remote operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RemoteError {
    /// The server could not be reached or the exchange timed out.
    #[error("remote unavailable: {0}")]
    Unavailable(String),

    /// The target document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// The server refused the request.
    #[error("remote rejected request ({code}): {message}")]
    Rejected { code: ErrorCode, message: String },
}

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by [`RemoteStore`] methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// Authoritative document store.
pub trait RemoteStore: Send + Sync {
    /// Reads a document. `None` if it does not exist.
    fn get<'a>(&'a self, target: &'a DocumentRef) -> RemoteFuture<'a, Option<Document>>;

    /// Writes a whole document, or deep-merges into it when `merge` is set.
    fn set<'a>(
        &'a self,
        target: &'a DocumentRef,
        data: Document,
        merge: bool,
    ) -> RemoteFuture<'a, ()>;

    /// Applies field writes to an existing document.
    fn update<'a>(
        &'a self,
        target: &'a DocumentRef,
        fields: Vec<FieldWrite>,
    ) -> RemoteFuture<'a, ()>;

    /// Deletes a document. Deleting an absent document succeeds.
    fn delete<'a>(&'a self, target: &'a DocumentRef) -> RemoteFuture<'a, ()>;

    /// Performs the operation `kind` describes.
    fn apply<'a>(
        &'a self,
        target: &'a DocumentRef,
        kind: &'a MutationKind,
    ) -> RemoteFuture<'a, ()> {
        match kind {
            MutationKind::Set { data, merge } => self.set(target, data.clone(), *merge),
            MutationKind::Update { fields } => self.update(target, fields.clone()),
            MutationKind::Delete => self.delete(target),
        }
    }
}

/// Connection settings for [`WebSocketRemote`].
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// URL of the remote server.
    pub url: String,
    pub connect_timeout: Duration,
    /// Upper bound for one request/reply exchange.
    pub request_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            url: "ws://localhost:7890".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
        }
    }
}

/// [`RemoteStore`] backed by the ll-remote server.
///
/// Requests are serialized over one connection; each carries a fresh request
/// id and replies with other ids are discarded.
pub struct WebSocketRemote<T: Transport = WebSocketTransport> {
    config: RemoteConfig,
    transport: tokio::sync::Mutex<T>,
    next_id: AtomicU64,
}

impl WebSocketRemote<WebSocketTransport> {
    /// Create a remote client with the default WebSocket transport.
    pub fn new(config: RemoteConfig) -> Self {
        Self::with_transport(config, WebSocketTransport::new())
    }
}

impl<T: Transport> WebSocketRemote<T> {
    /// Create a remote client with a custom transport (for testing).
    pub fn with_transport(config: RemoteConfig, transport: T) -> Self {
        WebSocketRemote {
            config,
            transport: tokio::sync::Mutex::new(transport),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    async fn round_trip(
        &self,
        build: impl FnOnce(u64) -> ClientMessage,
    ) -> RemoteResult<ServerMessage> {
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let msg = build(request_id);
        let mut transport = self.transport.lock().await;

        if !transport.is_connected() {
            match tokio::time::timeout(
                self.config.connect_timeout,
                transport.connect(&self.config.url),
            )
            .await
            {
                Ok(Ok(())) => debug!("connected to {}", self.config.url),
                Ok(Err(e)) => return Err(RemoteError::Unavailable(e.to_string())),
                Err(_) => {
                    return Err(RemoteError::Unavailable(format!(
                        "connecting to {} timed out",
                        self.config.url
                    )))
                }
            }
        }

        let result = tokio::time::timeout(
            self.config.request_timeout,
            exchange(&mut *transport, msg, request_id),
        )
        .await;
        match result {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(e)) => {
                warn!("request {request_id} failed: {e}");
                let _ = transport.disconnect().await;
                Err(RemoteError::Unavailable(e.to_string()))
            }
            Err(_) => {
                warn!("request {request_id} timed out");
                let _ = transport.disconnect().await;
                Err(RemoteError::Unavailable(format!(
                    "request timed out after {:?}",
                    self.config.request_timeout
                )))
            }
        }
    }

    async fn write(&self, target: &DocumentRef, mutation: MutationKind) -> RemoteResult<()> {
        let kind = mutation.name();
        let reply = self
            .round_trip(|id| ClientMessage::write(id, target.clone(), mutation))
            .await?;
        match reply {
            ServerMessage::Ack { .. } => {
                debug!("{kind} {target} acknowledged");
                Ok(())
            }
            other => Err(reply_error(other)),
        }
    }
}

/// Sends `msg` and waits for the reply carrying `request_id`.
async fn exchange<T: Transport>(
    transport: &mut T,
    msg: ClientMessage,
    request_id: u64,
) -> Result<ServerMessage, TransportError> {
    transport.send(msg).await?;
    loop {
        match transport.recv().await? {
            Some(reply) if reply.request_id() == Some(request_id) => return Ok(reply),
            Some(ServerMessage::Error {
                request_id: None,
                message,
                ..
            }) => return Err(TransportError::ReceiveFailed(message)),
            Some(other) => debug!("discarding unrelated reply {other:?}"),
            None => return Err(TransportError::ConnectionClosed),
        }
    }
}

fn reply_error(reply: ServerMessage) -> RemoteError {
    match reply {
        ServerMessage::Error {
            code: ErrorCode::NotFound,
            message,
            ..
        } => RemoteError::NotFound(message),
        ServerMessage::Error { code, message, .. } => RemoteError::Rejected { code, message },
        other => RemoteError::Rejected {
            code: ErrorCode::Internal,
            message: format!("unexpected reply: {other:?}"),
        },
    }
}

impl<T: Transport> RemoteStore for WebSocketRemote<T> {
    fn get<'a>(&'a self, target: &'a DocumentRef) -> RemoteFuture<'a, Option<Document>> {
        Box::pin(async move {
            let reply = self
                .round_trip(|id| ClientMessage::get(id, target.clone()))
                .await?;
            match reply {
                ServerMessage::Document { data, .. } => Ok(data),
                other => Err(reply_error(other)),
            }
        })
    }

    fn set<'a>(
        &'a self,
        target: &'a DocumentRef,
        data: Document,
        merge: bool,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(self.write(target, MutationKind::Set { data, merge }))
    }

    fn update<'a>(
        &'a self,
        target: &'a DocumentRef,
        fields: Vec<FieldWrite>,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(self.write(target, MutationKind::Update { fields }))
    }

    fn delete<'a>(&'a self, target: &'a DocumentRef) -> RemoteFuture<'a, ()> {
        Box::pin(self.write(target, MutationKind::Delete))
    }
}
