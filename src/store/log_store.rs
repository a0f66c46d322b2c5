//! Daily Log Store
//!
//! Optimistic sync service for study-session logs. One document per
//! calendar day, keyed by date, holding the completed slots.
//!
//! Concurrency note: the store is the sole mutator of its own state.
//! Two rapid mutations of the same day race last-writer-wins, locally
//! and remotely; there is no version check (see DESIGN.md).

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::broadcast;

use crate::backend::{CollectionSnapshot, DocumentStore, WriteOp};
use crate::domain::{hour_to_slot, DailyLog, DomainError, DomainResult};

use super::{logs_collection, require_attached, MutationOutcome};

/// Optimistic store for daily study logs
pub struct LogStore {
    backend: Arc<dyn DocumentStore>,
    collection: Option<String>,
    logs: Vec<DailyLog>,
}

impl LogStore {
    pub fn new(backend: Arc<dyn DocumentStore>) -> Self {
        Self {
            backend,
            collection: None,
            logs: Vec::new(),
        }
    }

    /// All fetched logs, sorted by date.
    pub fn logs(&self) -> &[DailyLog] {
        &self.logs
    }

    pub fn is_attached(&self) -> bool {
        self.collection.is_some()
    }

    /// Bind the store to a user and fetch their logs.
    pub async fn attach(&mut self, uid: &str) -> DomainResult<()> {
        self.collection = Some(logs_collection(uid));
        self.refresh().await
    }

    /// Reload all logs from the backend.
    pub async fn refresh(&mut self) -> DomainResult<()> {
        let collection = require_attached(&self.collection)?;
        let documents = self.backend.list(&collection).await?;

        let mut logs = Vec::with_capacity(documents.len());
        for doc in documents {
            logs.push(DailyLog::from_document(&doc.id, &doc.fields)?);
        }
        logs.sort_by(|a, b| a.date_key.cmp(&b.date_key));
        self.logs = logs;
        Ok(())
    }

    /// Drop all local state and the user binding.
    pub fn reset(&mut self) {
        self.collection = None;
        self.logs.clear();
    }

    /// Record a completed 30-minute slot for a date. Overwrites the tag
    /// if the slot was already recorded.
    pub async fn record_slot(
        &mut self,
        date: NaiveDate,
        slot: u8,
        tag: &str,
    ) -> DomainResult<MutationOutcome> {
        let collection = require_attached(&self.collection)?;

        // Validate against a copy so a bad slot rejects before any
        // state is touched.
        let mut log = self
            .find_log(date)
            .cloned()
            .unwrap_or_else(|| DailyLog::new(date));
        log.set_slot(slot, tag)?;

        let snapshot = self.logs.clone();
        self.upsert_local(log.clone());

        let result = self.backend.write(&collection, &log.date_key, log.fields()).await;
        match result {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(err) => {
                log::warn!("recording slot {} failed, rolling back: {}", slot, err);
                self.logs = snapshot;
                Ok(MutationOutcome::Reverted(err))
            }
        }
    }

    /// Remove a recorded slot from a date's log.
    pub async fn clear_slot(&mut self, date: NaiveDate, slot: u8) -> DomainResult<MutationOutcome> {
        let collection = require_attached(&self.collection)?;

        let mut log = self
            .find_log(date)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("no log for {}", date)))?;
        if log.clear_slot(slot).is_none() {
            return Err(DomainError::NotFound(format!(
                "slot {} is not recorded on {}",
                slot, date
            )));
        }

        let snapshot = self.logs.clone();
        self.upsert_local(log.clone());

        let result = self.backend.write(&collection, &log.date_key, log.fields()).await;
        match result {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(err) => {
                log::warn!("clearing slot {} failed, rolling back: {}", slot, err);
                self.logs = snapshot;
                Ok(MutationOutcome::Reverted(err))
            }
        }
    }

    /// Record today's slot for a wall-clock hour.
    pub async fn record_hour_now(&mut self, hour: u32, tag: &str) -> DomainResult<MutationOutcome> {
        let slot = hour_to_slot(hour)
            .ok_or_else(|| DomainError::InvalidInput(format!("hour {} is not tracked", hour)))?;
        self.record_slot(Local::now().date_naive(), slot, tag).await
    }

    /// Clear today's slot for a wall-clock hour.
    pub async fn clear_hour_now(&mut self, hour: u32) -> DomainResult<MutationOutcome> {
        let slot = hour_to_slot(hour)
            .ok_or_else(|| DomainError::InvalidInput(format!("hour {} is not tracked", hour)))?;
        self.clear_slot(Local::now().date_naive(), slot).await
    }

    /// Replace the whole collection, locally and remotely, in one
    /// atomic batch. Used by import.
    pub async fn replace_all(&mut self, logs: Vec<DailyLog>) -> DomainResult<MutationOutcome> {
        let collection = require_attached(&self.collection)?;
        let writes = self.replacement_writes(&collection, &logs).await?;

        let snapshot = self.local_replace(logs);
        let result = self.backend.batch_commit(writes).await;
        match result {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(err) => {
                log::warn!("log import failed, rolling back: {}", err);
                self.logs = snapshot;
                Ok(MutationOutcome::Reverted(err))
            }
        }
    }

    /// Listen for remote snapshots of the bound collection.
    pub async fn subscribe_remote(&self) -> DomainResult<broadcast::Receiver<CollectionSnapshot>> {
        let collection = require_attached(&self.collection)?;
        self.backend.subscribe(&collection).await
    }

    /// Batch that deletes every remote document and sets the new ones.
    /// Read-only, so import can build its writes before mutating.
    pub(crate) async fn replacement_writes(
        &self,
        collection: &str,
        logs: &[DailyLog],
    ) -> DomainResult<Vec<WriteOp>> {
        let existing = self.backend.list(collection).await?;
        let mut writes: Vec<WriteOp> = existing
            .into_iter()
            .map(|doc| WriteOp::delete(collection, doc.id))
            .collect();
        for log in logs {
            writes.push(WriteOp::set(collection, log.date_key.clone(), log.fields()));
        }
        Ok(writes)
    }

    /// Swap local state, returning the prior logs for rollback.
    pub(crate) fn local_replace(&mut self, logs: Vec<DailyLog>) -> Vec<DailyLog> {
        let prior = std::mem::replace(&mut self.logs, logs);
        self.logs.sort_by(|a, b| a.date_key.cmp(&b.date_key));
        prior
    }

    pub(crate) fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    fn find_log(&self, date: NaiveDate) -> Option<&DailyLog> {
        let key = DailyLog::new(date).date_key;
        self.logs.iter().find(|l| l.date_key == key)
    }

    fn upsert_local(&mut self, log: DailyLog) {
        match self.logs.iter_mut().find(|l| l.date_key == log.date_key) {
            Some(existing) => *existing = log,
            None => {
                self.logs.push(log);
                self.logs.sort_by(|a, b| a.date_key.cmp(&b.date_key));
            }
        }
    }
}
