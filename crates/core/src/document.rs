// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Document model and field-path write semantics.
//!
//! The remote backend is a document database: collections of JSON documents
//! addressed by id, written whole (`set`, optionally merging) or field by field
//! (`update` with dotted field paths). [`DocumentStore`] implements those
//! semantics in memory. The remote server persists one, and the client keeps
//! one as its optimistic mirror, so both sides apply a write identically.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::mutation::MutationKind;

/// A document body: a JSON object.
pub type Document = Map<String, Value>;

/// Location of one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    /// Collection name (e.g. `workouts`).
    #[serde(rename = "collectionPath")]
    pub collection: String,
    /// Document id within the collection.
    pub document_id: String,
}

impl DocumentRef {
    /// Creates a reference to `collection/document_id`.
    pub fn new(collection: impl Into<String>, document_id: impl Into<String>) -> Self {
        DocumentRef {
            collection: collection.into(),
            document_id: document_id.into(),
        }
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.document_id)
    }
}

/// Path to a (possibly nested) field, e.g. `leg_day.perf.2024-01-01`.
///
/// Built from segments rather than by string concatenation. A segment may not
/// contain `.` because the dotted wire form has no escape syntax.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    /// Builds a path from its segments.
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty() || s.contains('.')) {
            return Err(Error::InvalidFieldPath(segments.join(".")));
        }
        Ok(FieldPath(segments))
    }

    /// Builds a single-segment path.
    pub fn field(name: impl Into<String>) -> Result<Self> {
        FieldPath::new([name.into()])
    }

    /// Parses a dotted path.
    pub fn parse(dotted: &str) -> Result<Self> {
        dotted.parse()
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self> {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        FieldPath::new(segments)
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::InvalidFieldPath(s.to_string()));
        }
        FieldPath::new(s.split('.'))
            .map_err(|_| Error::InvalidFieldPath(s.to_string()))
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One field-level write inside an `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FieldWrite {
    /// Set the value at `path`, creating intermediate maps.
    Put { path: FieldPath, value: Value },
    /// Remove the key at `path`, leaving its siblings untouched.
    Remove { path: FieldPath },
}

impl FieldWrite {
    /// Creates a Put write.
    pub fn put(path: FieldPath, value: impl Into<Value>) -> Self {
        FieldWrite::Put {
            path,
            value: value.into(),
        }
    }

    /// Creates a Remove write.
    pub fn remove(path: FieldPath) -> Self {
        FieldWrite::Remove { path }
    }

    /// The path this write addresses.
    pub fn path(&self) -> &FieldPath {
        match self {
            FieldWrite::Put { path, .. } | FieldWrite::Remove { path } => path,
        }
    }
}

/// Applies field writes to a document in order.
pub fn apply_field_writes(doc: &mut Document, writes: &[FieldWrite]) {
    for write in writes {
        match write {
            FieldWrite::Put { path, value } => put_path(doc, path.segments(), value.clone()),
            FieldWrite::Remove { path } => remove_path(doc, path.segments()),
        }
    }
}

fn put_path(doc: &mut Document, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = doc;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(last.clone(), value);
}

fn remove_path(doc: &mut Document, segments: &[String]) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = doc;
    for segment in parents {
        current = match current.get_mut(segment) {
            Some(Value::Object(map)) => map,
            _ => return,
        };
    }
    current.remove(last);
}

/// Deep-merges `incoming` into `target`.
///
/// Nested objects merge key by key; any other value replaces what was there.
pub fn merge_documents(target: &mut Document, incoming: Document) {
    for (key, value) in incoming {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => {
                merge_documents(existing, nested);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// In-memory document database with remote-store write semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStore {
    docs: BTreeMap<DocumentRef, Document>,
}

impl DocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the document, if present.
    pub fn get(&self, target: &DocumentRef) -> Option<Document> {
        self.docs.get(target).cloned()
    }

    /// Borrows the document, if present.
    pub fn get_ref(&self, target: &DocumentRef) -> Option<&Document> {
        self.docs.get(target)
    }

    /// Writes a whole document, replacing it or merging into it.
    pub fn set(&mut self, target: &DocumentRef, data: Document, merge: bool) {
        if merge {
            let doc = self.docs.entry(target.clone()).or_default();
            merge_documents(doc, data);
        } else {
            self.docs.insert(target.clone(), data);
        }
    }

    /// Applies field writes to an existing document.
    ///
    /// Fails with [`Error::DocumentNotFound`] when the document is absent.
    pub fn update(&mut self, target: &DocumentRef, writes: &[FieldWrite]) -> Result<()> {
        let doc = self
            .docs
            .get_mut(target)
            .ok_or_else(|| Error::DocumentNotFound(target.to_string()))?;
        apply_field_writes(doc, writes);
        Ok(())
    }

    /// Deletes a whole document. Deleting an absent document is a no-op.
    ///
    /// Returns whether a document was removed.
    pub fn delete(&mut self, target: &DocumentRef) -> bool {
        self.docs.remove(target).is_some()
    }

    /// Applies any mutation kind.
    pub fn apply(&mut self, target: &DocumentRef, kind: &MutationKind) -> Result<()> {
        match kind {
            MutationKind::Set { data, merge } => {
                self.set(target, data.clone(), *merge);
                Ok(())
            }
            MutationKind::Update { fields } => self.update(target, fields),
            MutationKind::Delete => {
                self.delete(target);
                Ok(())
            }
        }
    }

    /// Number of documents held.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns true if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Iterates documents in reference order.
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentRef, &Document)> {
        self.docs.iter()
    }

    /// Removes every document.
    pub fn clear(&mut self) {
        self.docs.clear();
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
