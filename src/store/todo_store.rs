//! Todo Store
//!
//! Optimistic sync service for the task board. Tasks are ordered
//! newest-first; ids are client-generated, so a rolled-back add leaves
//! the list exactly as it was.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::backend::{CollectionSnapshot, DocumentStore, WriteOp};
use crate::domain::{DomainError, DomainResult, Todo, TodoDraft, TodoStatus};

use super::{require_attached, todos_collection, MutationOutcome};

/// Optimistic store for todo tasks
pub struct TodoStore {
    backend: Arc<dyn DocumentStore>,
    collection: Option<String>,
    todos: Vec<Todo>,
}

impl TodoStore {
    pub fn new(backend: Arc<dyn DocumentStore>) -> Self {
        Self {
            backend,
            collection: None,
            todos: Vec::new(),
        }
    }

    /// All fetched tasks, newest first.
    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn is_attached(&self) -> bool {
        self.collection.is_some()
    }

    /// Bind the store to a user and fetch their tasks.
    pub async fn attach(&mut self, uid: &str) -> DomainResult<()> {
        self.collection = Some(todos_collection(uid));
        self.refresh().await
    }

    /// Reload all tasks from the backend.
    pub async fn refresh(&mut self) -> DomainResult<()> {
        let collection = require_attached(&self.collection)?;
        let documents = self.backend.list(&collection).await?;

        let mut todos = Vec::with_capacity(documents.len());
        for doc in documents {
            todos.push(Todo::from_document(&doc.id, &doc.fields)?);
        }
        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.todos = todos;
        Ok(())
    }

    /// Drop all local state and the user binding.
    pub fn reset(&mut self) {
        self.collection = None;
        self.todos.clear();
    }

    /// Add a task from draft fields.
    pub async fn add_task(&mut self, draft: TodoDraft) -> DomainResult<MutationOutcome> {
        let collection = require_attached(&self.collection)?;
        let todo = Todo::from_draft(draft)?;
        let fields = todo.fields()?;
        let id = todo.id.clone();

        self.todos.insert(0, todo);

        let result = self.backend.write(&collection, &id, fields).await;
        match result {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(err) => {
                log::warn!("adding task failed, rolling back: {}", err);
                self.todos.retain(|t| t.id != id);
                Ok(MutationOutcome::Reverted(err))
            }
        }
    }

    /// Replace an existing task wholesale.
    pub async fn update_task(&mut self, updated: Todo) -> DomainResult<MutationOutcome> {
        let collection = require_attached(&self.collection)?;
        let position = self
            .todos
            .iter()
            .position(|t| t.id == updated.id)
            .ok_or_else(|| DomainError::NotFound(format!("task {}", updated.id)))?;
        let fields = updated.fields()?;

        let snapshot = self.todos.clone();
        self.todos[position] = updated.clone();

        let result = self.backend.write(&collection, &updated.id, fields).await;
        match result {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(err) => {
                log::warn!("updating task {} failed, rolling back: {}", updated.id, err);
                self.todos = snapshot;
                Ok(MutationOutcome::Reverted(err))
            }
        }
    }

    /// Delete a task.
    pub async fn delete_task(&mut self, id: &str) -> DomainResult<MutationOutcome> {
        let collection = require_attached(&self.collection)?;
        if !self.todos.iter().any(|t| t.id == id) {
            return Err(DomainError::NotFound(format!("task {}", id)));
        }

        let snapshot = self.todos.clone();
        self.todos.retain(|t| t.id != id);

        let result = self.backend.delete(&collection, id).await;
        match result {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(err) => {
                log::warn!("deleting task {} failed, rolling back: {}", id, err);
                self.todos = snapshot;
                Ok(MutationOutcome::Reverted(err))
            }
        }
    }

    /// Move a task to another workflow state.
    pub async fn set_status(&mut self, id: &str, status: TodoStatus) -> DomainResult<MutationOutcome> {
        let mut todo = self
            .todos
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("task {}", id)))?;
        todo.status = status;
        self.update_task(todo).await
    }

    /// Flip one subtask's done flag.
    pub async fn toggle_subtask(
        &mut self,
        todo_id: &str,
        subtask_id: &str,
    ) -> DomainResult<MutationOutcome> {
        let mut todo = self
            .todos
            .iter()
            .find(|t| t.id == todo_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("task {}", todo_id)))?;
        if !todo.toggle_subtask(subtask_id) {
            return Err(DomainError::NotFound(format!(
                "subtask {} on task {}",
                subtask_id, todo_id
            )));
        }
        self.update_task(todo).await
    }

    /// Delete several tasks in one atomic batch.
    pub async fn delete_many(&mut self, ids: &[String]) -> DomainResult<MutationOutcome> {
        let collection = require_attached(&self.collection)?;
        if ids.is_empty() {
            return Ok(MutationOutcome::Applied);
        }

        let snapshot = self.todos.clone();
        self.todos.retain(|t| !ids.contains(&t.id));

        let writes = ids
            .iter()
            .map(|id| WriteOp::delete(collection.clone(), id.clone()))
            .collect();
        let result = self.backend.batch_commit(writes).await;
        match result {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(err) => {
                log::warn!("deleting {} tasks failed, rolling back: {}", ids.len(), err);
                self.todos = snapshot;
                Ok(MutationOutcome::Reverted(err))
            }
        }
    }

    /// Mark several tasks completed in one atomic batch.
    pub async fn complete_many(&mut self, ids: &[String]) -> DomainResult<MutationOutcome> {
        let collection = require_attached(&self.collection)?;
        if ids.is_empty() {
            return Ok(MutationOutcome::Applied);
        }

        // Stage on a copy so a serialization error rejects cleanly.
        let mut updated = self.todos.clone();
        let mut writes = Vec::new();
        for todo in updated.iter_mut().filter(|t| ids.contains(&t.id)) {
            todo.status = TodoStatus::Completed;
            writes.push(WriteOp::set(collection.clone(), todo.id.clone(), todo.fields()?));
        }

        let snapshot = std::mem::replace(&mut self.todos, updated);
        let result = self.backend.batch_commit(writes).await;
        match result {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(err) => {
                log::warn!("completing {} tasks failed, rolling back: {}", ids.len(), err);
                self.todos = snapshot;
                Ok(MutationOutcome::Reverted(err))
            }
        }
    }

    /// Replace the whole collection, locally and remotely, in one
    /// atomic batch. Used by import.
    pub async fn replace_all(&mut self, todos: Vec<Todo>) -> DomainResult<MutationOutcome> {
        let collection = require_attached(&self.collection)?;
        let writes = self.replacement_writes(&collection, &todos).await?;

        let snapshot = self.local_replace(todos);
        let result = self.backend.batch_commit(writes).await;
        match result {
            Ok(()) => Ok(MutationOutcome::Applied),
            Err(err) => {
                log::warn!("task import failed, rolling back: {}", err);
                self.todos = snapshot;
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
        todos: &[Todo],
    ) -> DomainResult<Vec<WriteOp>> {
        let existing = self.backend.list(collection).await?;
        let mut writes: Vec<WriteOp> = existing
            .into_iter()
            .map(|doc| WriteOp::delete(collection, doc.id))
            .collect();
        for todo in todos {
            writes.push(WriteOp::set(collection, todo.id.clone(), todo.fields()?));
        }
        Ok(writes)
    }

    /// Swap local state, returning the prior tasks for rollback.
    pub(crate) fn local_replace(&mut self, todos: Vec<Todo>) -> Vec<Todo> {
        let prior = std::mem::replace(&mut self.todos, todos);
        self.todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        prior
    }

    pub(crate) fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }
}
