//! Export / Import
//!
//! File-level JSON snapshot of all user data:
//!
//! ```json
//! { "dailyLogs": { "2026-08-06": { "slots": { "1": "math" } } },
//!   "todos": [ ... ] }
//! ```
//!
//! A snapshot is validated in full before anything is imported; a
//! malformed file is rejected without touching any state.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{parse_date_key, DailyLog, DomainError, DomainResult, Todo, SLOT_COUNT};

/// Per-day entry of the export format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LogEntry {
    #[serde(default)]
    pub slots: BTreeMap<u8, String>,
}

/// Full export of a user's data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub daily_logs: BTreeMap<String, LogEntry>,
    #[serde(default)]
    pub todos: Vec<Todo>,
}

impl Snapshot {
    /// Build a snapshot from store state.
    pub fn from_state(logs: &[DailyLog], todos: &[Todo]) -> Self {
        Self {
            daily_logs: logs
                .iter()
                .map(|log| {
                    (
                        log.date_key.clone(),
                        LogEntry {
                            slots: log.slots.clone(),
                        },
                    )
                })
                .collect(),
            todos: todos.to_vec(),
        }
    }

    /// Parse and fully validate a snapshot. Nothing is imported from a
    /// file that fails here.
    pub fn from_json(text: &str) -> DomainResult<Self> {
        let snapshot: Snapshot = serde_json::from_str(text)
            .map_err(|e| DomainError::InvalidInput(format!("malformed import file: {}", e)))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> DomainResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::Internal(format!("serialize snapshot: {}", e)))
    }

    /// Check every record before any of them is used.
    pub fn validate(&self) -> DomainResult<()> {
        for (date_key, entry) in &self.daily_logs {
            parse_date_key(date_key)?;
            for slot in entry.slots.keys() {
                if !(1..=SLOT_COUNT).contains(slot) {
                    return Err(DomainError::InvalidInput(format!(
                        "slot {} on {} is outside the tracked range 1-{}",
                        slot, date_key, SLOT_COUNT
                    )));
                }
            }
        }

        let mut seen = HashSet::new();
        for todo in &self.todos {
            if todo.id.is_empty() || todo.title.trim().is_empty() {
                return Err(DomainError::InvalidInput(format!(
                    "task {:?} is missing an id or title",
                    todo.id
                )));
            }
            if !seen.insert(&todo.id) {
                return Err(DomainError::InvalidInput(format!(
                    "duplicate task id {}",
                    todo.id
                )));
            }
        }
        Ok(())
    }

    /// The snapshot's logs as domain entities.
    pub fn to_logs(&self) -> DomainResult<Vec<DailyLog>> {
        let mut logs = Vec::with_capacity(self.daily_logs.len());
        for (date_key, entry) in &self.daily_logs {
            let mut log = DailyLog::from_date_key(date_key)?;
            log.slots = entry.slots.clone();
            logs.push(log);
        }
        Ok(logs)
    }
}

/// Write a snapshot to a file as pretty-printed JSON.
pub fn save_snapshot(path: &Path, snapshot: &Snapshot) -> DomainResult<()> {
    let json = snapshot.to_json()?;
    std::fs::write(path, json)
        .map_err(|e| DomainError::Internal(format!("write {}: {}", path.display(), e)))
}

/// Read and validate a snapshot file.
pub fn load_snapshot(path: &Path) -> DomainResult<Snapshot> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Internal(format!("read {}: {}", path.display(), e)))?;
    Snapshot::from_json(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TodoDraft, TodoPriority};
    use chrono::NaiveDate;

    fn sample_snapshot() -> Snapshot {
        let mut log = DailyLog::new(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());
        log.set_slot(1, "math").unwrap();
        log.set_slot(9, "physics").unwrap();

        let todo = Todo::from_draft(TodoDraft {
            title: "Review notes".to_string(),
            priority: TodoPriority::High,
            tag: Some("math".to_string()),
            subtasks: vec!["chapter 1".to_string()],
        })
        .unwrap();

        Snapshot::from_state(&[log], &[todo])
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = sample_snapshot();
        let json = snapshot.to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }

    #[test]
    fn test_export_shape() {
        let json = sample_snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["dailyLogs"]["2026-08-06"]["slots"]["1"], "math");
        assert!(value["todos"].is_array());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(Snapshot::from_json("not json").is_err());
        assert!(Snapshot::from_json("{\"dailyLogs\": 42}").is_err());
    }

    #[test]
    fn test_bad_date_key_rejected() {
        let json = r#"{ "dailyLogs": { "08/06/2026": { "slots": {} } }, "todos": [] }"#;
        assert!(matches!(
            Snapshot::from_json(json),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_out_of_range_slot_rejected() {
        let json = r#"{ "dailyLogs": { "2026-08-06": { "slots": { "17": "x" } } }, "todos": [] }"#;
        assert!(Snapshot::from_json(json).is_err());
    }

    #[test]
    fn test_duplicate_task_id_rejected() {
        let todo = Todo::from_draft(TodoDraft {
            title: "Task".to_string(),
            ..Default::default()
        })
        .unwrap();
        let snapshot = Snapshot::from_state(&[], &[todo.clone(), todo]);
        assert!(snapshot.validate().is_err());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");

        let snapshot = sample_snapshot();
        save_snapshot(&path, &snapshot).unwrap();
        assert_eq!(load_snapshot(&path).unwrap(), snapshot);
    }
}
