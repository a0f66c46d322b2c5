//! Todo Entity
//!
//! A task on the todo board, with an ordered list of subtasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::entity::{DomainError, DomainResult, Entity};

/// Workflow state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in-progress",
            TodoStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "in-progress" => TodoStatus::InProgress,
            "completed" => TodoStatus::Completed,
            _ => TodoStatus::Pending,
        }
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TodoPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TodoPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoPriority::Low => "low",
            TodoPriority::Medium => "medium",
            TodoPriority::High => "high",
        }
    }
}

/// A single step within a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtask {
    pub id: String,
    pub text: String,
    pub done: bool,
}

impl Subtask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            done: false,
        }
    }
}

/// A task item on the todo board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier (document id in the backend)
    pub id: String,
    pub title: String,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    /// Optional subject tag, e.g. "math"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Ordered list of steps
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Creation timestamp, serialized as ISO-8601
    pub created_at: DateTime<Utc>,
}

/// User-entered fields for a new task, before an id and timestamp are
/// assigned.
#[derive(Debug, Clone, Default)]
pub struct TodoDraft {
    pub title: String,
    pub priority: TodoPriority,
    pub tag: Option<String>,
    pub subtasks: Vec<String>,
}

impl Todo {
    /// Build a task from user-entered draft fields.
    ///
    /// Rejects an empty title before anything is assigned.
    pub fn from_draft(draft: TodoDraft) -> DomainResult<Self> {
        if draft.title.trim().is_empty() {
            return Err(DomainError::InvalidInput("task title must not be empty".into()));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            status: TodoStatus::Pending,
            priority: draft.priority,
            tag: draft.tag,
            subtasks: draft.subtasks.into_iter().map(Subtask::new).collect(),
            created_at: Utc::now(),
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == TodoStatus::Completed
    }

    /// Flip a subtask's done flag. Returns false if the subtask is unknown.
    pub fn toggle_subtask(&mut self, subtask_id: &str) -> bool {
        match self.subtasks.iter_mut().find(|s| s.id == subtask_id) {
            Some(subtask) => {
                subtask.done = !subtask.done;
                true
            }
            None => false,
        }
    }

    /// Document fields as stored in the backend. The id travels as the
    /// document id, not as a field.
    pub fn fields(&self) -> DomainResult<Value> {
        let mut value = serde_json::to_value(self)
            .map_err(|e| DomainError::Internal(format!("serialize task: {}", e)))?;
        if let Some(map) = value.as_object_mut() {
            map.remove("id");
        }
        Ok(value)
    }

    /// Rebuild a task from a backend document id and fields.
    pub fn from_document(doc_id: &str, fields: &Value) -> DomainResult<Self> {
        let mut value = fields.clone();
        match value.as_object_mut() {
            Some(map) => {
                map.insert("id".to_string(), Value::String(doc_id.to_string()));
            }
            None => {
                return Err(DomainError::Internal(format!(
                    "task document {} is not an object",
                    doc_id
                )))
            }
        }
        serde_json::from_value(value)
            .map_err(|e| DomainError::Internal(format!("malformed task {}: {}", doc_id, e)))
    }
}

impl Entity for Todo {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_creates_pending_task() {
        let todo = Todo::from_draft(TodoDraft {
            title: "Review notes".to_string(),
            priority: TodoPriority::High,
            tag: Some("math".to_string()),
            subtasks: vec!["chapter 1".to_string(), "chapter 2".to_string()],
        })
        .unwrap();

        assert_eq!(todo.status, TodoStatus::Pending);
        assert_eq!(todo.priority, TodoPriority::High);
        assert_eq!(todo.subtasks.len(), 2);
        assert!(todo.subtasks.iter().all(|s| !s.done));
        assert!(!todo.id.is_empty());
    }

    #[test]
    fn test_empty_title_rejected() {
        let result = Todo::from_draft(TodoDraft {
            title: "   ".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_toggle_subtask() {
        let mut todo = Todo::from_draft(TodoDraft {
            title: "Task".to_string(),
            subtasks: vec!["step".to_string()],
            ..Default::default()
        })
        .unwrap();
        let subtask_id = todo.subtasks[0].id.clone();

        assert!(todo.toggle_subtask(&subtask_id));
        assert!(todo.subtasks[0].done);
        assert!(todo.toggle_subtask(&subtask_id));
        assert!(!todo.subtasks[0].done);
        assert!(!todo.toggle_subtask("missing"));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(TodoStatus::InProgress.as_str(), "in-progress");
        assert_eq!(TodoStatus::from_str("completed"), TodoStatus::Completed);
        let json = serde_json::to_string(&TodoStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
    }

    #[test]
    fn test_document_round_trip() {
        let todo = Todo::from_draft(TodoDraft {
            title: "Task".to_string(),
            tag: Some("physics".to_string()),
            subtasks: vec!["step".to_string()],
            ..Default::default()
        })
        .unwrap();

        let fields = todo.fields().unwrap();
        assert!(fields.get("id").is_none());

        let restored = Todo::from_document(&todo.id, &fields).unwrap();
        assert_eq!(restored, todo);
    }
}
