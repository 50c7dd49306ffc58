// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for the document server connection.
//!
//! [`Transport`] moves protocol frames; it knows nothing about requests or
//! documents. [`WebSocketTransport`] is the production implementation, tests
//! substitute a mock.

use std::future::Future;
use std::pin::Pin;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use ll_core::protocol::{ClientMessage, ServerMessage};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Connection closed, or never opened.
    #[error("connection closed")]
    ConnectionClosed,

    /// Send failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Receive failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(String),

    /// A frame could not be encoded or decoded.
    #[error("serialization error: {0}")]
    SerializationError(String),
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

pub(crate) type TransportFuture<'a, T> =
    Pin<Box<dyn Future<Output = TransportResult<T>> + Send + 'a>>;

/// Bidirectional message channel to the document server.
pub trait Transport: Send + Sync {
    /// Connect to the server at `url`.
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()>;

    /// Disconnect from the server. Disconnecting twice is harmless.
    fn disconnect(&mut self) -> TransportFuture<'_, ()>;

    /// Send a message to the server.
    fn send(&mut self, msg: ClientMessage) -> TransportFuture<'_, ()>;

    /// Receive the next message from the server.
    ///
    /// Returns `None` if the connection is closed.
    fn recv(&mut self) -> TransportFuture<'_, Option<ServerMessage>>;

    /// Check if connected.
    fn is_connected(&self) -> bool;
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket transport implementation using tokio-tungstenite.
#[derive(Default)]
pub struct WebSocketTransport {
    sink: Option<SplitSink<WsStream, Message>>,
    stream: Option<SplitStream<WsStream>>,
}

impl WebSocketTransport {
    /// Create a new, unconnected WebSocket transport.
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self) {
        self.sink = None;
        self.stream = None;
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, url: &str) -> TransportFuture<'_, ()> {
        let url = url.to_string();
        Box::pin(async move {
            let (ws, _) = tokio_tungstenite::connect_async(&url)
                .await
                .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
            debug!("connected to {url}");
            let (sink, stream) = ws.split();
            self.sink = Some(sink);
            self.stream = Some(stream);
            Ok(())
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if let Some(mut sink) = self.sink.take() {
                // The peer may already be gone.
                let _ = sink.close().await;
            }
            self.stream = None;
            Ok(())
        })
    }

    fn send(&mut self, msg: ClientMessage) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            let json = msg
                .to_json()
                .map_err(|e| TransportError::SerializationError(e.to_string()))?;
            let sink = self.sink.as_mut().ok_or(TransportError::ConnectionClosed)?;
            trace!("-> {json}");

            // Flush so a broken connection is detected here, not on recv.
            let sent = match sink.send(Message::Text(json.into())).await {
                Ok(()) => sink.flush().await,
                Err(e) => Err(e),
            };
            if let Err(e) = sent {
                self.reset();
                return Err(TransportError::SendFailed(e.to_string()));
            }
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<ServerMessage>> {
        Box::pin(async move {
            let stream = self
                .stream
                .as_mut()
                .ok_or(TransportError::ConnectionClosed)?;

            loop {
                match stream.next().await {
                    Some(Ok(Message::Text(text))) => {
                        trace!("<- {}", text.as_str());
                        return ServerMessage::from_json(&text)
                            .map(Some)
                            .map_err(|e| TransportError::SerializationError(e.to_string()));
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        self.reset();
                        return Ok(None);
                    }
                    // Control and binary frames carry no protocol messages.
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        self.reset();
                        return Err(TransportError::ReceiveFailed(e.to_string()));
                    }
                }
            }
        })
    }

    fn is_connected(&self) -> bool {
        self.sink.is_some() && self.stream.is_some()
    }
}
