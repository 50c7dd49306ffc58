// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Server state management.
//!
//! The canonical documents live in memory behind a mutex and are written
//! through to a key-value store, so a restarted server sees every
//! acknowledged write.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use ll_core::{
    Document, DocumentRef, DocumentStore, KeyValueStore, MutationKind, Result, SqliteStore,
};

const DB_FILE_NAME: &str = "documents.db";
const DOC_KEY_PREFIX: &str = "doc:";

/// A document as persisted: the value under `doc:<collection>/<id>`.
#[derive(Serialize, Deserialize)]
struct StoredDocument {
    #[serde(flatten)]
    target: DocumentRef,
    data: Document,
}

fn storage_key(target: &DocumentRef) -> String {
    format!("{DOC_KEY_PREFIX}{target}")
}

/// Shared server state containing the canonical documents.
#[derive(Clone)]
pub struct ServerState {
    inner: Arc<ServerStateInner>,
}

struct ServerStateInner {
    docs: Mutex<DocumentStore>,
    store: Arc<dyn KeyValueStore>,
}

impl ServerState {
    /// Opens the document database in `data_dir` and loads every document.
    pub fn open(data_dir: &Path) -> Result<Self> {
        let store = SqliteStore::open(&data_dir.join(DB_FILE_NAME))?;
        let mut docs = DocumentStore::new();
        for key in store.keys()? {
            if !key.starts_with(DOC_KEY_PREFIX) {
                continue;
            }
            if let Some(raw) = store.get_item(&key)? {
                let stored: StoredDocument = serde_json::from_str(&raw)?;
                docs.set(&stored.target, stored.data, false);
            }
        }
        Ok(Self::with_store(docs, Arc::new(store)))
    }

    fn with_store(docs: DocumentStore, store: Arc<dyn KeyValueStore>) -> Self {
        ServerState {
            inner: Arc::new(ServerStateInner {
                docs: Mutex::new(docs),
                store,
            }),
        }
    }

    /// Returns a copy of the document, if it exists.
    pub async fn get(&self, target: &DocumentRef) -> Option<Document> {
        self.inner.docs.lock().await.get(target)
    }

    /// Applies a mutation and persists the resulting document.
    ///
    /// Nothing changes in memory unless the write reached storage.
    pub async fn apply(&self, target: &DocumentRef, mutation: &MutationKind) -> Result<()> {
        let mut docs = self.inner.docs.lock().await;

        let mut scratch = DocumentStore::new();
        if let Some(current) = docs.get(target) {
            scratch.set(target, current, false);
        }
        scratch.apply(target, mutation)?;

        match scratch.get(target) {
            Some(data) => {
                let stored = StoredDocument {
                    target: target.clone(),
                    data,
                };
                self.inner
                    .store
                    .set_item(&storage_key(target), &serde_json::to_string(&stored)?)?;
                docs.set(target, stored.data, false);
            }
            None => {
                self.inner.store.remove_item(&storage_key(target))?;
                docs.delete(target);
            }
        }
        Ok(())
    }

    /// Number of documents held.
    pub async fn len(&self) -> usize {
        self.inner.docs.lock().await.len()
    }
}
