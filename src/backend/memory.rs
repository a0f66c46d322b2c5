//! In-Memory Document Store
//!
//! Backs tests and offline use. Supports injecting write failures so
//! the optimistic-rollback paths can be driven deterministically.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, Mutex};

use crate::domain::{DomainError, DomainResult};

use super::{snapshot_channel, CollectionSnapshot, Document, DocumentStore, WriteOp};

#[derive(Default)]
struct Inner {
    collections: HashMap<String, BTreeMap<String, Value>>,
    channels: HashMap<String, broadcast::Sender<CollectionSnapshot>>,
    /// Number of upcoming mutating calls that should fail.
    fail_remaining: u32,
}

/// In-memory implementation of [`DocumentStore`]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Make the next `count` mutating calls (write, delete, batch) fail
    /// with a backend error. Reads are unaffected.
    pub async fn fail_next_writes(&self, count: u32) {
        self.inner.lock().await.fail_remaining = count;
    }

    /// Number of documents currently stored in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        let inner = self.inner.lock().await;
        inner.collections.get(collection).map_or(0, |c| c.len())
    }

    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn take_failure(inner: &mut Inner) -> bool {
    if inner.fail_remaining > 0 {
        inner.fail_remaining -= 1;
        true
    } else {
        false
    }
}

fn snapshot_of(inner: &Inner, collection: &str) -> CollectionSnapshot {
    let documents = inner
        .collections
        .get(collection)
        .map(|docs| {
            docs.iter()
                .map(|(id, fields)| Document {
                    id: id.clone(),
                    fields: fields.clone(),
                })
                .collect()
        })
        .unwrap_or_default();
    CollectionSnapshot {
        collection: collection.to_string(),
        documents,
    }
}

fn notify(inner: &Inner, collection: &str) {
    if let Some(sender) = inner.channels.get(collection) {
        // Nobody listening is fine.
        let _ = sender.send(snapshot_of(inner, collection));
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, doc_id: &str) -> DomainResult<Option<Document>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .collections
            .get(collection)
            .and_then(|docs| docs.get(doc_id))
            .map(|fields| Document {
                id: doc_id.to_string(),
                fields: fields.clone(),
            }))
    }

    async fn write(&self, collection: &str, doc_id: &str, fields: Value) -> DomainResult<()> {
        let mut inner = self.inner.lock().await;
        if take_failure(&mut inner) {
            return Err(DomainError::Backend("injected write failure".into()));
        }
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(doc_id.to_string(), fields);
        notify(&inner, collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, doc_id: &str) -> DomainResult<()> {
        let mut inner = self.inner.lock().await;
        if take_failure(&mut inner) {
            return Err(DomainError::Backend("injected write failure".into()));
        }
        if let Some(docs) = inner.collections.get_mut(collection) {
            docs.remove(doc_id);
        }
        notify(&inner, collection);
        Ok(())
    }

    async fn batch_commit(&self, writes: Vec<WriteOp>) -> DomainResult<()> {
        let mut inner = self.inner.lock().await;
        if take_failure(&mut inner) {
            return Err(DomainError::Backend("injected write failure".into()));
        }

        // Stage on a copy so a batch is all-or-nothing.
        let mut staged = inner.collections.clone();
        let mut touched: Vec<String> = Vec::new();
        for write in writes {
            if !touched.contains(&write.collection().to_string()) {
                touched.push(write.collection().to_string());
            }
            match write {
                WriteOp::Set {
                    collection,
                    doc_id,
                    fields,
                } => {
                    staged.entry(collection).or_default().insert(doc_id, fields);
                }
                WriteOp::Delete { collection, doc_id } => {
                    if let Some(docs) = staged.get_mut(&collection) {
                        docs.remove(&doc_id);
                    }
                }
            }
        }
        inner.collections = staged;
        for collection in touched {
            notify(&inner, &collection);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> DomainResult<Vec<Document>> {
        let inner = self.inner.lock().await;
        Ok(snapshot_of(&inner, collection).documents)
    }

    async fn subscribe(
        &self,
        collection: &str,
    ) -> DomainResult<broadcast::Receiver<CollectionSnapshot>> {
        let mut inner = self.inner.lock().await;
        let sender = inner
            .channels
            .entry(collection.to_string())
            .or_insert_with(snapshot_channel);
        Ok(sender.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_and_get() {
        let store = MemoryStore::new();
        store
            .write("todos", "a", json!({"title": "Task"}))
            .await
            .unwrap();

        let doc = store.get("todos", "a").await.unwrap().unwrap();
        assert_eq!(doc.fields["title"], "Task");
        assert!(store.get("todos", "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_noop() {
        let store = MemoryStore::new();
        store.delete("todos", "ghost").await.unwrap();
        assert!(store.is_empty("todos").await);
    }

    #[tokio::test]
    async fn test_injected_failure_hits_mutations_only() {
        let store = MemoryStore::new();
        store.write("todos", "a", json!({})).await.unwrap();

        store.fail_next_writes(1).await;
        let err = store.write("todos", "b", json!({})).await.unwrap_err();
        assert!(matches!(err, DomainError::Backend(_)));

        // Reads never failed, and the failed write left no trace.
        assert_eq!(store.len("todos").await, 1);
        store.write("todos", "b", json!({})).await.unwrap();
        assert_eq!(store.len("todos").await, 2);
    }

    #[tokio::test]
    async fn test_batch_commit_applies_all() {
        let store = MemoryStore::new();
        store.write("todos", "old", json!({})).await.unwrap();

        store
            .batch_commit(vec![
                WriteOp::delete("todos", "old"),
                WriteOp::set("todos", "new", json!({"title": "n"})),
                WriteOp::set("logs", "2026-08-06", json!({"slots": {}})),
            ])
            .await
            .unwrap();

        assert!(store.get("todos", "old").await.unwrap().is_none());
        assert!(store.get("todos", "new").await.unwrap().is_some());
        assert_eq!(store.len("logs").await, 1);
    }

    #[tokio::test]
    async fn test_subscribe_receives_snapshot() {
        let store = MemoryStore::new();
        let mut rx = store.subscribe("todos").await.unwrap();

        store.write("todos", "a", json!({})).await.unwrap();
        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.collection, "todos");
        assert_eq!(snapshot.documents.len(), 1);
    }
}
