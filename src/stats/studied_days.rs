//! Studied-Day Aggregation
//!
//! Turns raw daily logs into the keyed-by-date structure every
//! dashboard calculation works over.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{DailyLog, SLOT_MINUTES};

/// One processed day's study data
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayStudy {
    pub total_minutes: u32,
    /// Completed slot numbers mapped to their tags
    pub slots: BTreeMap<u8, String>,
}

/// All tracked days, sorted chronologically by the map order.
pub type StudiedDays = BTreeMap<NaiveDate, DayStudy>;

/// Build the studied-day map from raw logs.
///
/// Logs whose date key does not parse are skipped with a warning rather
/// than poisoning every downstream calculation.
pub fn studied_days(logs: &[DailyLog]) -> StudiedDays {
    let mut days = StudiedDays::new();
    for log in logs {
        let date = match log.date() {
            Ok(date) => date,
            Err(err) => {
                log::warn!("skipping daily log with bad date key: {}", err);
                continue;
            }
        };
        days.insert(
            date,
            DayStudy {
                total_minutes: log.slots.len() as u32 * SLOT_MINUTES,
                slots: log.slots.clone(),
            },
        );
    }
    days
}

/// Total studied minutes across all tracked days.
pub fn total_minutes(days: &StudiedDays) -> u32 {
    days.values().map(|day| day.total_minutes).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_build_from_logs() {
        let mut log = DailyLog::new(NaiveDate::from_ymd_opt(2026, 8, 6).unwrap());
        log.set_slot(1, "math").unwrap();
        log.set_slot(2, "math").unwrap();

        let days = studied_days(&[log]);
        assert_eq!(days.len(), 1);
        let day = days.values().next().unwrap();
        assert_eq!(day.total_minutes, 60);
        assert_eq!(total_minutes(&days), 60);
    }

    #[test]
    fn test_bad_date_key_is_skipped() {
        let bad = DailyLog {
            date_key: "nonsense".to_string(),
            slots: BTreeMap::new(),
        };
        let days = studied_days(&[bad]);
        assert!(days.is_empty());
    }
}
