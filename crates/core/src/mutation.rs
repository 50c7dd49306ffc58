// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued mutation records.
//!
//! A [`MutationRecord`] is one durable intent to write a remote document. Once
//! built it is never edited: the queue only appends and deletes records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::{Document, DocumentRef, FieldWrite};

/// Unique identifier assigned to a record at enqueue time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MutationId(String);

impl MutationId {
    /// Generates a fresh random id.
    pub fn generate() -> Self {
        MutationId(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MutationId {
    fn from(s: &str) -> Self {
        MutationId(s.to_string())
    }
}

impl From<String> for MutationId {
    fn from(s: String) -> Self {
        MutationId(s)
    }
}

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a mutation does to its target document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MutationKind {
    /// Write the whole document, merging into the existing one if `merge`.
    Set {
        data: Document,
        #[serde(rename = "mergeOnConflict", default)]
        merge: bool,
    },
    /// Apply field-path writes to an existing document.
    Update { fields: Vec<FieldWrite> },
    /// Delete the whole document.
    Delete,
}

impl MutationKind {
    /// Short lowercase name used in logs and listings.
    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::Set { .. } => "set",
            MutationKind::Update { .. } => "update",
            MutationKind::Delete => "delete",
        }
    }
}

/// A pending write as it is persisted in the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationRecord {
    pub id: MutationId,
    #[serde(flatten)]
    pub target: DocumentRef,
    #[serde(flatten)]
    pub kind: MutationKind,
    #[serde(with = "crate::clock::iso_millis")]
    pub enqueued_at: DateTime<Utc>,
}

impl MutationRecord {
    /// Builds a record with a fresh id.
    pub fn new(target: DocumentRef, kind: MutationKind, enqueued_at: DateTime<Utc>) -> Self {
        MutationRecord {
            id: MutationId::generate(),
            target,
            kind,
            enqueued_at,
        }
    }
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
