// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket server implementation.
//!
//! Every text frame is one request and gets exactly one reply on the same
//! connection, echoing the request id.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use ll_core::protocol::{ClientMessage, ErrorCode, ServerMessage};

use crate::state::ServerState;

/// Run the WebSocket server on the given address.
pub async fn run(addr: SocketAddr, state: ServerState) -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on: {}", addr);

    loop {
        let (stream, peer_addr) = listener.accept().await?;
        let state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, state).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }
}

/// Handle a single WebSocket connection.
pub(crate) async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: ServerState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("New WebSocket connection from: {}", peer_addr);

    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = handle_client_message(text.as_str(), &state).await;
                ws_sink.send(Message::Text(response.to_json()?.into())).await?;
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", peer_addr);
                break;
            }
            Ok(Message::Ping(data)) => {
                ws_sink.send(Message::Pong(data)).await?;
            }
            Ok(_) => {
                // Binary, Pong and raw frames carry no requests.
            }
            Err(e) => {
                warn!("WebSocket error from {}: {}", peer_addr, e);
                break;
            }
        }
    }

    info!("Connection closed: {}", peer_addr);
    Ok(())
}

/// Process a client message and return its reply.
pub(crate) async fn handle_client_message(text: &str, state: &ServerState) -> ServerMessage {
    let msg = match ClientMessage::from_json(text) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("Malformed request: {}", e);
            return ServerMessage::error(None, ErrorCode::InvalidArgument, e.to_string());
        }
    };
    debug!("Received message: {:?}", msg);

    match msg {
        ClientMessage::Get { request_id, target } => {
            let data = state.get(&target).await;
            debug!("Get {}: {}", target, if data.is_some() { "found" } else { "absent" });
            ServerMessage::document(request_id, data)
        }

        ClientMessage::Write {
            request_id,
            target,
            mutation,
        } => match state.apply(&target, &mutation).await {
            Ok(()) => {
                debug!("Applied {} to {}", mutation.name(), target);
                ServerMessage::ack(request_id)
            }
            Err(ll_core::Error::DocumentNotFound(what)) => {
                ServerMessage::error(Some(request_id), ErrorCode::NotFound, what)
            }
            Err(e) => {
                error!("Failed to apply {} to {}: {}", mutation.name(), target, e);
                ServerMessage::error(Some(request_id), ErrorCode::Internal, e.to_string())
            }
        },

        ClientMessage::Ping { id } => {
            debug!("Ping received: {}", id);
            ServerMessage::pong(id)
        }
    }
}
