//! Application Configuration
//!
//! Goal and timer settings, persisted as a JSON sidecar file next to
//! the application data.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, DAILY_GOAL_MINUTES, SHIFT_GOAL_MINUTES, SLOT_MINUTES};

/// User-tunable settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Minutes per day that count as a perfect day.
    pub daily_goal_minutes: u32,
    /// Minutes per shift that count as a completed shift.
    pub shift_goal_minutes: u32,
    /// Length of one focus session in minutes.
    pub focus_session_minutes: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            daily_goal_minutes: DAILY_GOAL_MINUTES,
            shift_goal_minutes: SHIFT_GOAL_MINUTES,
            focus_session_minutes: SLOT_MINUTES,
        }
    }
}

impl AppConfig {
    /// Load the config file, falling back to defaults if it is missing
    /// or unreadable. A corrupt file is logged and ignored rather than
    /// blocking startup.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("ignoring corrupt config {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> DomainResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DomainError::Internal(format!("serialize config: {}", e)))?;
        std::fs::write(path, json)
            .map_err(|e| DomainError::Internal(format!("write {}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.daily_goal_minutes, 480);
        assert_eq!(config.shift_goal_minutes, 120);
        assert_eq!(config.focus_session_minutes, 30);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = AppConfig {
            daily_goal_minutes: 360,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path), config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.json"));
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"dailyGoalMinutes": 300}"#).unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.daily_goal_minutes, 300);
        assert_eq!(config.shift_goal_minutes, 120);
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{{{").unwrap();
        assert_eq!(AppConfig::load(&path), AppConfig::default());
    }
}
