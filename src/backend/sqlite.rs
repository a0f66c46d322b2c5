//! SQLite Document Store
//!
//! Local [`DocumentStore`] implementation on a single `documents`
//! table. Batches commit inside one transaction.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::Value;
use tokio::sync::{broadcast, Mutex};

use crate::domain::{DomainError, DomainResult};

use super::{snapshot_channel, CollectionSnapshot, Document, DocumentStore, WriteOp};

/// SQLite-backed implementation of [`DocumentStore`]
pub struct SqliteStore {
    conn: Mutex<Connection>,
    channels: Mutex<HashMap<String, broadcast::Sender<CollectionSnapshot>>>,
}

impl SqliteStore {
    /// Open (and migrate) a database file.
    pub fn open(path: &Path) -> DomainResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DomainError::Internal(format!("open database: {}", e)))?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database, mainly for tests.
    pub fn open_in_memory() -> DomainResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| DomainError::Internal(format!("open database: {}", e)))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> DomainResult<Self> {
        run_migrations(&conn).map_err(|e| DomainError::Internal(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            channels: Mutex::new(HashMap::new()),
        })
    }

    async fn notify(&self, collections: &[String]) {
        // Snapshot emission is best effort; a failed read here must not
        // fail the committed write.
        let channels = self.channels.lock().await;
        for collection in collections {
            let Some(sender) = channels.get(collection) else {
                continue;
            };
            match self.list_internal(collection).await {
                Ok(documents) => {
                    let _ = sender.send(CollectionSnapshot {
                        collection: collection.clone(),
                        documents,
                    });
                }
                Err(err) => log::warn!("snapshot of {} failed: {}", collection, err),
            }
        }
    }

    async fn list_internal(&self, collection: &str) -> DomainResult<Vec<Document>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT doc_id, fields FROM documents WHERE collection = ?1 ORDER BY doc_id")
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let rows = stmt
            .query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let mut documents = Vec::new();
        for row in rows {
            let (id, fields) = row.map_err(|e| DomainError::Internal(e.to_string()))?;
            let fields: Value = serde_json::from_str(&fields)
                .map_err(|e| DomainError::Internal(format!("corrupt document {}: {}", id, e)))?;
            documents.push(Document { id, fields });
        }
        Ok(documents)
    }
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            doc_id TEXT NOT NULL,
            fields TEXT NOT NULL,
            PRIMARY KEY (collection, doc_id)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection)",
        [],
    )?;
    Ok(())
}

fn encode_fields(fields: &Value) -> DomainResult<String> {
    serde_json::to_string(fields).map_err(|e| DomainError::Internal(format!("encode fields: {}", e)))
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, collection: &str, doc_id: &str) -> DomainResult<Option<Document>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT fields FROM documents WHERE collection = ?1 AND doc_id = ?2")
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        let mut rows = stmt
            .query(params![collection, doc_id])
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        match rows.next().map_err(|e| DomainError::Internal(e.to_string()))? {
            Some(row) => {
                let raw: String = row
                    .get(0)
                    .map_err(|e| DomainError::Internal(e.to_string()))?;
                let fields: Value = serde_json::from_str(&raw).map_err(|e| {
                    DomainError::Internal(format!("corrupt document {}: {}", doc_id, e))
                })?;
                Ok(Some(Document {
                    id: doc_id.to_string(),
                    fields,
                }))
            }
            None => Ok(None),
        }
    }

    async fn write(&self, collection: &str, doc_id: &str, fields: Value) -> DomainResult<()> {
        let encoded = encode_fields(&fields)?;
        {
            let conn = self.conn.lock().await;
            conn.execute(
                "INSERT INTO documents (collection, doc_id, fields) VALUES (?1, ?2, ?3)
                 ON CONFLICT(collection, doc_id) DO UPDATE SET fields = excluded.fields",
                params![collection, doc_id, encoded],
            )
            .map_err(|e| DomainError::Backend(e.to_string()))?;
        }
        self.notify(&[collection.to_string()]).await;
        Ok(())
    }

    async fn delete(&self, collection: &str, doc_id: &str) -> DomainResult<()> {
        {
            let conn = self.conn.lock().await;
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2",
                params![collection, doc_id],
            )
            .map_err(|e| DomainError::Backend(e.to_string()))?;
        }
        self.notify(&[collection.to_string()]).await;
        Ok(())
    }

    async fn batch_commit(&self, writes: Vec<WriteOp>) -> DomainResult<()> {
        let mut touched: Vec<String> = Vec::new();
        {
            let mut conn = self.conn.lock().await;
            let tx = conn
                .transaction()
                .map_err(|e| DomainError::Backend(e.to_string()))?;
            for write in &writes {
                if !touched.contains(&write.collection().to_string()) {
                    touched.push(write.collection().to_string());
                }
                match write {
                    WriteOp::Set {
                        collection,
                        doc_id,
                        fields,
                    } => {
                        let encoded = encode_fields(fields)?;
                        tx.execute(
                            "INSERT INTO documents (collection, doc_id, fields) VALUES (?1, ?2, ?3)
                             ON CONFLICT(collection, doc_id) DO UPDATE SET fields = excluded.fields",
                            params![collection, doc_id, encoded],
                        )
                        .map_err(|e| DomainError::Backend(e.to_string()))?;
                    }
                    WriteOp::Delete { collection, doc_id } => {
                        tx.execute(
                            "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2",
                            params![collection, doc_id],
                        )
                        .map_err(|e| DomainError::Backend(e.to_string()))?;
                    }
                }
            }
            tx.commit().map_err(|e| DomainError::Backend(e.to_string()))?;
        }
        self.notify(&touched).await;
        Ok(())
    }

    async fn list(&self, collection: &str) -> DomainResult<Vec<Document>> {
        self.list_internal(collection).await
    }

    async fn subscribe(
        &self,
        collection: &str,
    ) -> DomainResult<broadcast::Receiver<CollectionSnapshot>> {
        let mut channels = self.channels.lock().await;
        let sender = channels
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
    async fn test_write_get_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .write("todos", "a", json!({"title": "Task", "priority": "high"}))
            .await
            .unwrap();

        let doc = store.get("todos", "a").await.unwrap().unwrap();
        assert_eq!(doc.fields["priority"], "high");
    }

    #[tokio::test]
    async fn test_write_is_upsert() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.write("todos", "a", json!({"v": 1})).await.unwrap();
        store.write("todos", "a", json!({"v": 2})).await.unwrap();

        let docs = store.list("todos").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].fields["v"], 2);
    }

    #[tokio::test]
    async fn test_batch_commit_and_delete() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.write("todos", "old", json!({})).await.unwrap();

        store
            .batch_commit(vec![
                WriteOp::delete("todos", "old"),
                WriteOp::set("todos", "a", json!({"title": "a"})),
                WriteOp::set("todos", "b", json!({"title": "b"})),
            ])
            .await
            .unwrap();

        let docs = store.list("todos").await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(docs.iter().all(|d| d.id != "old"));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store
                .write("logs", "2026-08-06", json!({"slots": {"1": "math"}}))
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let doc = store.get("logs", "2026-08-06").await.unwrap().unwrap();
        assert_eq!(doc.fields["slots"]["1"], "math");
    }

    #[tokio::test]
    async fn test_subscribe_receives_snapshot() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut rx = store.subscribe("logs").await.unwrap();

        store
            .write("logs", "2026-08-06", json!({"slots": {}}))
            .await
            .unwrap();

        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.documents.len(), 1);
    }
}
