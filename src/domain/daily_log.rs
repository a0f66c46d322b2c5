//! Daily Log Entity
//!
//! One log per calendar day. Each entry in `slots` is a completed
//! 30-minute study unit, keyed by slot number and tagged with what was
//! studied. The log's date key doubles as its document id.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::entity::{DomainError, DomainResult, Entity};
use super::schedule::{SLOT_COUNT, SLOT_MINUTES};

/// Format of a daily log date key, e.g. "2026-08-06".
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date key.
pub fn parse_date_key(key: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .map_err(|_| DomainError::InvalidInput(format!("invalid date key: {}", key)))
}

/// A tracked day's completed study slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLog {
    /// Calendar day this log covers, formatted `YYYY-MM-DD`.
    pub date_key: String,
    /// Completed 30-minute units: slot number (1-16) mapped to a tag
    /// naming what was studied.
    pub slots: BTreeMap<u8, String>,
}

impl DailyLog {
    /// Create an empty log for a date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date_key: date.format(DATE_KEY_FORMAT).to_string(),
            slots: BTreeMap::new(),
        }
    }

    /// Create an empty log from a raw date key, validating the format.
    pub fn from_date_key(date_key: &str) -> DomainResult<Self> {
        parse_date_key(date_key)?;
        Ok(Self {
            date_key: date_key.to_string(),
            slots: BTreeMap::new(),
        })
    }

    /// The calendar day this log covers.
    pub fn date(&self) -> DomainResult<NaiveDate> {
        parse_date_key(&self.date_key)
    }

    /// Total studied minutes recorded in this log.
    pub fn total_minutes(&self) -> u32 {
        self.slots.len() as u32 * SLOT_MINUTES
    }

    /// Record a completed slot. Overwrites the tag if the slot was
    /// already recorded.
    pub fn set_slot(&mut self, slot: u8, tag: impl Into<String>) -> DomainResult<()> {
        validate_slot(slot)?;
        self.slots.insert(slot, tag.into());
        Ok(())
    }

    /// Remove a recorded slot. Returns the tag it carried, if any.
    pub fn clear_slot(&mut self, slot: u8) -> Option<String> {
        self.slots.remove(&slot)
    }

    /// Document fields as stored in the backend: `{"slots": {...}}`.
    pub fn fields(&self) -> Value {
        json!({ "slots": self.slots })
    }

    /// Rebuild a log from a backend document id and fields.
    pub fn from_document(doc_id: &str, fields: &Value) -> DomainResult<Self> {
        parse_date_key(doc_id)?;
        let slots: BTreeMap<u8, String> = match fields.get("slots") {
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| DomainError::Internal(format!("malformed slots for {}: {}", doc_id, e)))?,
            None => BTreeMap::new(),
        };
        let log = Self {
            date_key: doc_id.to_string(),
            slots,
        };
        for slot in log.slots.keys() {
            validate_slot(*slot)?;
        }
        Ok(log)
    }
}

/// Check that a slot number is within the tracked 1-16 range.
pub(crate) fn validate_slot(slot: u8) -> DomainResult<()> {
    if (1..=SLOT_COUNT).contains(&slot) {
        Ok(())
    } else {
        Err(DomainError::InvalidInput(format!(
            "slot {} is outside the tracked range 1-{}",
            slot, SLOT_COUNT
        )))
    }
}

impl Entity for DailyLog {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.date_key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = DailyLog::new(date(2026, 8, 6));
        assert_eq!(log.date_key, "2026-08-06");
        assert_eq!(log.total_minutes(), 0);
    }

    #[test]
    fn test_set_and_clear_slot() {
        let mut log = DailyLog::new(date(2026, 8, 6));
        log.set_slot(3, "math").unwrap();
        log.set_slot(4, "physics").unwrap();
        assert_eq!(log.total_minutes(), 60);

        assert_eq!(log.clear_slot(3), Some("math".to_string()));
        assert_eq!(log.clear_slot(3), None);
        assert_eq!(log.total_minutes(), 30);
    }

    #[test]
    fn test_slot_range_enforced() {
        let mut log = DailyLog::new(date(2026, 8, 6));
        assert!(log.set_slot(0, "x").is_err());
        assert!(log.set_slot(17, "x").is_err());
    }

    #[test]
    fn test_document_round_trip() {
        let mut log = DailyLog::new(date(2026, 8, 6));
        log.set_slot(1, "math").unwrap();
        log.set_slot(16, "review").unwrap();

        let restored = DailyLog::from_document(&log.date_key, &log.fields()).unwrap();
        assert_eq!(restored, log);
    }

    #[test]
    fn test_bad_date_key_rejected() {
        assert!(DailyLog::from_date_key("06-08-2026").is_err());
        assert!(DailyLog::from_date_key("not-a-date").is_err());
        assert!(DailyLog::from_date_key("2026-08-06").is_ok());
    }
}
