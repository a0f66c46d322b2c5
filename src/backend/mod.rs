//! Backend Layer
//!
//! Abstraction over the managed document backend, plus implementations.
//! The core only ever sees collections of JSON documents with writes,
//! deletes, atomic batches, queries and snapshot listeners.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::broadcast;

use crate::domain::DomainResult;

/// A stored document: id plus JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

/// One entry of an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Set {
        collection: String,
        doc_id: String,
        fields: Value,
    },
    Delete {
        collection: String,
        doc_id: String,
    },
}

impl WriteOp {
    pub fn set(collection: impl Into<String>, doc_id: impl Into<String>, fields: Value) -> Self {
        WriteOp::Set {
            collection: collection.into(),
            doc_id: doc_id.into(),
            fields,
        }
    }

    pub fn delete(collection: impl Into<String>, doc_id: impl Into<String>) -> Self {
        WriteOp::Delete {
            collection: collection.into(),
            doc_id: doc_id.into(),
        }
    }

    pub fn collection(&self) -> &str {
        match self {
            WriteOp::Set { collection, .. } => collection,
            WriteOp::Delete { collection, .. } => collection,
        }
    }
}

/// Full contents of a collection at one point in time, emitted to
/// listeners after every committed change.
#[derive(Debug, Clone)]
pub struct CollectionSnapshot {
    pub collection: String,
    pub documents: Vec<Document>,
}

/// Channel capacity for snapshot listeners.
const SNAPSHOT_CHANNEL_CAPACITY: usize = 16;

pub(crate) fn snapshot_channel() -> broadcast::Sender<CollectionSnapshot> {
    broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY).0
}

/// Abstract interface to the document backend.
///
/// All operations are async; writes are upserts. `batch_commit` is
/// atomic: either every write in the batch lands or none do.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a single document.
    async fn get(&self, collection: &str, doc_id: &str) -> DomainResult<Option<Document>>;

    /// Create or replace a document's fields.
    async fn write(&self, collection: &str, doc_id: &str, fields: Value) -> DomainResult<()>;

    /// Delete a document. Deleting a missing document is a no-op.
    async fn delete(&self, collection: &str, doc_id: &str) -> DomainResult<()>;

    /// Apply a batch of writes atomically.
    async fn batch_commit(&self, writes: Vec<WriteOp>) -> DomainResult<()>;

    /// List all documents in a collection.
    async fn list(&self, collection: &str) -> DomainResult<Vec<Document>>;

    /// Listen for collection snapshots. A snapshot is emitted after
    /// every committed change to the collection.
    async fn subscribe(
        &self,
        collection: &str,
    ) -> DomainResult<broadcast::Receiver<CollectionSnapshot>>;
}
