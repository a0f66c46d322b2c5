//! Dashboard Overview Calculations
//!
//! Aggregate totals, per-shift breakdowns and recent-history series.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::domain::{shift_index_for_hour, slot_to_hour, SHIFT_COUNT, SLOT_MINUTES};

use super::streaks::StreakSummary;
use super::studied_days::StudiedDays;

/// Aggregate totals across the tracked history
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_minutes: u32,
    pub total_days: u32,
    pub avg_daily_minutes: f64,
    pub avg_shift_minutes: f64,
}

/// One day of a recent-history series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    /// Short weekday label, e.g. "Wed"
    pub label: String,
    pub minutes: u32,
}

pub fn overall_stats(days: &StudiedDays) -> OverallStats {
    let total_days = days.len() as u32;
    if total_days == 0 {
        return OverallStats::default();
    }

    let total_minutes: u32 = days.values().map(|d| d.total_minutes).sum();
    OverallStats {
        total_minutes,
        total_days,
        avg_daily_minutes: total_minutes as f64 / total_days as f64,
        avg_shift_minutes: total_minutes as f64 / (total_days as usize * SHIFT_COUNT) as f64,
    }
}

/// Minutes studied per shift on one date. Entries follow the order of
/// the shift table.
pub fn shift_minutes(days: &StudiedDays, date: NaiveDate) -> [u32; SHIFT_COUNT] {
    let mut minutes = [0u32; SHIFT_COUNT];
    let Some(day) = days.get(&date) else {
        return minutes;
    };
    for slot in day.slots.keys() {
        let Some(hour) = slot_to_hour(*slot) else {
            continue;
        };
        if let Some(index) = shift_index_for_hour(hour) {
            minutes[index] += SLOT_MINUTES;
        }
    }
    minutes
}

/// Studied minutes for each of the last seven days, ending today.
pub fn past_week_series(days: &StudiedDays, today: NaiveDate) -> Vec<DayPoint> {
    trend_series(days, today, 7)
}

/// Studied minutes for the last `len` days, oldest first, ending today.
/// Days with no tracked study report zero.
pub fn trend_series(days: &StudiedDays, today: NaiveDate, len: usize) -> Vec<DayPoint> {
    (0..len)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back as u64)))
        .map(|date| DayPoint {
            date,
            label: date.format("%a").to_string(),
            minutes: days.get(&date).map_or(0, |d| d.total_minutes),
        })
        .collect()
}

/// Share of tracked days that met the daily goal, as a percentage.
pub fn goal_completion_rate(streaks: &StreakSummary, stats: &OverallStats) -> f64 {
    if stats.total_days == 0 {
        return 0.0;
    }
    streaks.perfect_days as f64 / stats.total_days as f64 * 100.0
}
