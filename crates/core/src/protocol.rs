// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket protocol messages for client-server communication.
//!
//! The protocol is request/response:
//! - Client reads a document or writes a mutation, tagged with a request id
//! - Server answers each request exactly once, echoing the id

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentRef};
use crate::mutation::MutationKind;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Read one document.
    Get {
        #[serde(rename = "requestId")]
        request_id: u64,
        target: DocumentRef,
    },

    /// Apply one mutation to a document.
    Write {
        #[serde(rename = "requestId")]
        request_id: u64,
        target: DocumentRef,
        mutation: MutationKind,
    },

    /// Ping message for keepalive.
    Ping {
        /// Client-chosen ID echoed in Pong.
        id: u64,
    },
}

/// Why the server refused a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The target document does not exist (update of a missing document).
    NotFound,
    /// The request was malformed.
    InvalidArgument,
    /// The server failed to apply or persist the request.
    Internal,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Response to a Get request. `data` is absent if there is no such document.
    Document {
        #[serde(rename = "requestId")]
        request_id: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        data: Option<Document>,
    },

    /// A write was applied and persisted.
    Ack {
        #[serde(rename = "requestId")]
        request_id: u64,
    },

    /// A request failed.
    Error {
        /// Absent when the request could not be parsed.
        #[serde(rename = "requestId", default, skip_serializing_if = "Option::is_none")]
        request_id: Option<u64>,
        code: ErrorCode,
        /// Human-readable error description.
        message: String,
    },

    /// Pong response to client Ping.
    Pong {
        /// Echoed from the Ping message.
        id: u64,
    },
}

impl ClientMessage {
    /// Creates a Get message.
    pub fn get(request_id: u64, target: DocumentRef) -> Self {
        ClientMessage::Get { request_id, target }
    }

    /// Creates a Write message.
    pub fn write(request_id: u64, target: DocumentRef, mutation: MutationKind) -> Self {
        ClientMessage::Write {
            request_id,
            target,
            mutation,
        }
    }

    /// Creates a Ping message.
    pub fn ping(id: u64) -> Self {
        ClientMessage::Ping { id }
    }

    /// The request id this message expects an answer for.
    pub fn request_id(&self) -> u64 {
        match self {
            ClientMessage::Get { request_id, .. } | ClientMessage::Write { request_id, .. } => {
                *request_id
            }
            ClientMessage::Ping { id } => *id,
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Creates a Document message.
    pub fn document(request_id: u64, data: Option<Document>) -> Self {
        ServerMessage::Document { request_id, data }
    }

    /// Creates an Ack message.
    pub fn ack(request_id: u64) -> Self {
        ServerMessage::Ack { request_id }
    }

    /// Creates an Error message.
    pub fn error(request_id: Option<u64>, code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            request_id,
            code,
            message: message.into(),
        }
    }

    /// Creates a Pong message.
    pub fn pong(id: u64) -> Self {
        ServerMessage::Pong { id }
    }

    /// The request id this message answers, if any.
    pub fn request_id(&self) -> Option<u64> {
        match self {
            ServerMessage::Document { request_id, .. } | ServerMessage::Ack { request_id } => {
                Some(*request_id)
            }
            ServerMessage::Error { request_id, .. } => *request_id,
            ServerMessage::Pong { id } => Some(*id),
        }
    }

    /// Serializes the message to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes the message from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
