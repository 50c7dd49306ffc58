// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the transport module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::transport::{
    Transport, TransportError, TransportFuture, TransportResult, WebSocketTransport,
};
use futures_util::{SinkExt, StreamExt};
use ll_core::protocol::{ClientMessage, ServerMessage};

type Responder = Box<dyn FnMut(&ClientMessage) -> Option<ServerMessage> + Send>;

/// Mock transport for testing without real sockets.
///
/// Replies come from a responder closure run on every send, or from
/// messages queued by hand.
pub struct MockTransport {
    connected: bool,
    /// Messages that will be returned by recv().
    incoming: Arc<Mutex<VecDeque<ServerMessage>>>,
    /// Messages that were sent via send().
    outgoing: Arc<Mutex<Vec<ClientMessage>>>,
    responder: Mutex<Option<Responder>>,
    /// Whether connect should fail.
    pub connect_should_fail: Arc<AtomicBool>,
    /// Whether send should fail (and drop the connection).
    pub send_should_fail: Arc<AtomicBool>,
    connects: Arc<Mutex<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        MockTransport {
            connected: false,
            incoming: Arc::new(Mutex::new(VecDeque::new())),
            outgoing: Arc::new(Mutex::new(Vec::new())),
            responder: Mutex::new(None),
            connect_should_fail: Arc::new(AtomicBool::new(false)),
            send_should_fail: Arc::new(AtomicBool::new(false)),
            connects: Arc::new(Mutex::new(0)),
        }
    }

    /// Answers each sent message with `responder`.
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: FnMut(&ClientMessage) -> Option<ServerMessage> + Send + 'static,
    {
        self.responder = Mutex::new(Some(Box::new(responder)));
        self
    }

    /// Add a message that will be returned by recv().
    pub fn queue_incoming(&self, msg: ServerMessage) {
        self.incoming.lock().unwrap().push_back(msg);
    }

    /// Handle to the messages that were sent.
    pub fn outgoing(&self) -> Arc<Mutex<Vec<ClientMessage>>> {
        Arc::clone(&self.outgoing)
    }

    /// Handle to the number of successful connects.
    pub fn connects(&self) -> Arc<Mutex<usize>> {
        Arc::clone(&self.connects)
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, _url: &str) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if self.connect_should_fail.load(Ordering::SeqCst) {
                Err(TransportError::ConnectionFailed("mock failure".into()))
            } else {
                self.connected = true;
                *self.connects.lock().unwrap() += 1;
                Ok(())
            }
        })
    }

    fn disconnect(&mut self) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            self.connected = false;
            Ok(())
        })
    }

    fn send(&mut self, msg: ClientMessage) -> TransportFuture<'_, ()> {
        Box::pin(async move {
            if !self.connected {
                return Err(TransportError::ConnectionClosed);
            }
            if self.send_should_fail.load(Ordering::SeqCst) {
                self.connected = false;
                return Err(TransportError::SendFailed("mock broken pipe".into()));
            }
            let reply = self.responder.lock().unwrap().as_mut().and_then(|r| r(&msg));
            if let Some(reply) = reply {
                self.incoming.lock().unwrap().push_back(reply);
            }
            self.outgoing.lock().unwrap().push(msg);
            Ok(())
        })
    }

    fn recv(&mut self) -> TransportFuture<'_, Option<ServerMessage>> {
        let incoming = Arc::clone(&self.incoming);
        Box::pin(async move {
            let msg = incoming.lock().unwrap().pop_front();
            Ok(msg)
        })
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[tokio::test]
async fn test_mock_transport_connect() {
    let mut transport = MockTransport::new();
    assert!(!transport.is_connected());

    transport.connect("ws://localhost:1234").await.unwrap();
    assert!(transport.is_connected());

    transport.disconnect().await.unwrap();
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_mock_transport_responder() {
    let mut transport =
        MockTransport::new().with_responder(|msg| Some(ServerMessage::ack(msg.request_id())));
    transport.connect("ws://localhost:1234").await.unwrap();

    transport.send(ClientMessage::ping(42)).await.unwrap();
    assert_eq!(transport.outgoing().lock().unwrap().len(), 1);

    let received = transport.recv().await.unwrap();
    assert_eq!(received, Some(ServerMessage::ack(42)));
    assert!(transport.recv().await.unwrap().is_none());
}

#[tokio::test]
async fn test_mock_transport_send_fail_drops_connection() {
    let mut transport = MockTransport::new();
    transport.connect("ws://localhost:1234").await.unwrap();
    transport.send_should_fail.store(true, Ordering::SeqCst);

    let result: TransportResult<()> = transport.send(ClientMessage::ping(1)).await;
    assert!(matches!(result, Err(TransportError::SendFailed(_))));
    assert!(!transport.is_connected());
}

#[tokio::test]
async fn test_websocket_transport_requires_connection() {
    let mut transport = WebSocketTransport::new();
    assert!(!transport.is_connected());
    assert!(matches!(
        transport.send(ClientMessage::ping(1)).await,
        Err(TransportError::ConnectionClosed)
    ));
    assert!(matches!(
        transport.recv().await,
        Err(TransportError::ConnectionClosed)
    ));
    transport.disconnect().await.unwrap();
}

#[tokio::test]
async fn test_websocket_transport_connect_refused() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut transport = WebSocketTransport::new();
    let result = transport.connect(&format!("ws://{addr}")).await;
    assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
}

#[tokio::test]
async fn test_websocket_transport_round_trip() {
    use tokio_tungstenite::tungstenite::Message;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Answers one ping with a pong, then closes.
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Text(text) = msg {
                if let Ok(ClientMessage::Ping { id }) = ClientMessage::from_json(&text) {
                    let pong = ServerMessage::pong(id).to_json().unwrap();
                    ws.send(Message::Text(pong.into())).await.unwrap();
                    let _ = ws.close(None).await;
                    break;
                }
            }
        }
    });

    let mut transport = WebSocketTransport::new();
    transport.connect(&format!("ws://{addr}")).await.unwrap();
    assert!(transport.is_connected());

    transport.send(ClientMessage::ping(7)).await.unwrap();
    assert_eq!(
        transport.recv().await.unwrap(),
        Some(ServerMessage::pong(7))
    );
    assert_eq!(transport.recv().await.unwrap(), None);
    assert!(!transport.is_connected());

    server.await.unwrap();
}
