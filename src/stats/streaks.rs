//! Streak and Goal Tracking
//!
//! A day is "perfect" when its studied minutes meet the daily goal.
//! Consecutive perfect days on adjacent calendar dates form a streak.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::studied_days::StudiedDays;

/// Streak counters for the tracked history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    pub longest_streak: u32,
    pub current_streak: u32,
    pub perfect_days: u32,
}

/// Scan the tracked days chronologically and compute streak counters.
///
/// The current streak only survives if the most recent tracked day is
/// `today` or the day before; anything older is stale and reports 0.
/// A single qualifying day with no predecessor starts a streak of 1.
pub fn calculate_streaks(days: &StudiedDays, today: NaiveDate, goal_minutes: u32) -> StreakSummary {
    if days.is_empty() {
        return StreakSummary::default();
    }

    let mut longest_streak = 0u32;
    let mut current_streak = 0u32;
    let mut perfect_days = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for (&date, day) in days {
        if day.total_minutes >= goal_minutes {
            perfect_days += 1;
            let continues = matches!(
                (previous, date.pred_opt()),
                (Some(prev), Some(expected)) if prev == expected
            );
            current_streak = if continues { current_streak + 1 } else { 1 };
        } else {
            current_streak = 0;
        }
        longest_streak = longest_streak.max(current_streak);
        previous = Some(date);
    }

    if let Some(last_tracked) = previous {
        let is_fresh = last_tracked == today || Some(last_tracked) == today.pred_opt();
        if !is_fresh {
            current_streak = 0;
        }
    }

    StreakSummary {
        longest_streak,
        current_streak,
        perfect_days,
    }
}

/// [`calculate_streaks`] against the current local date.
pub fn calculate_streaks_now(days: &StudiedDays, goal_minutes: u32) -> StreakSummary {
    calculate_streaks(days, Local::now().date_naive(), goal_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DAILY_GOAL_MINUTES;
    use crate::stats::studied_days::DayStudy;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn day(minutes: u32) -> DayStudy {
        DayStudy {
            total_minutes: minutes,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_history() {
        let summary = calculate_streaks(&StudiedDays::new(), date(2026, 8, 6), DAILY_GOAL_MINUTES);
        assert_eq!(summary, StreakSummary::default());
    }

    #[test]
    fn test_single_qualifying_day_starts_streak_of_one() {
        let mut days = StudiedDays::new();
        days.insert(date(2026, 8, 6), day(480));

        let summary = calculate_streaks(&days, date(2026, 8, 6), DAILY_GOAL_MINUTES);
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.longest_streak, 1);
        assert_eq!(summary.perfect_days, 1);
    }

    #[test]
    fn test_gap_resets_current_but_keeps_longest() {
        let mut days = StudiedDays::new();
        days.insert(date(2026, 8, 1), day(480));
        days.insert(date(2026, 8, 2), day(500));
        days.insert(date(2026, 8, 3), day(480));
        // Gap on the 4th, then one more perfect day.
        days.insert(date(2026, 8, 5), day(480));

        let summary = calculate_streaks(&days, date(2026, 8, 5), DAILY_GOAL_MINUTES);
        assert_eq!(summary.longest_streak, 3);
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.perfect_days, 4);
    }

    #[test]
    fn test_short_day_breaks_streak() {
        let mut days = StudiedDays::new();
        days.insert(date(2026, 8, 1), day(480));
        days.insert(date(2026, 8, 2), day(90));
        days.insert(date(2026, 8, 3), day(480));

        let summary = calculate_streaks(&days, date(2026, 8, 3), DAILY_GOAL_MINUTES);
        assert_eq!(summary.longest_streak, 1);
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.perfect_days, 2);
    }

    #[test]
    fn test_stale_streak_reports_zero() {
        let mut days = StudiedDays::new();
        days.insert(date(2026, 8, 1), day(480));
        days.insert(date(2026, 8, 2), day(480));
        days.insert(date(2026, 8, 3), day(480));

        // Yesterday still counts as fresh.
        let fresh = calculate_streaks(&days, date(2026, 8, 4), DAILY_GOAL_MINUTES);
        assert_eq!(fresh.current_streak, 3);

        // Two days later the streak is stale.
        let stale = calculate_streaks(&days, date(2026, 8, 5), DAILY_GOAL_MINUTES);
        assert_eq!(stale.current_streak, 0);
        assert_eq!(stale.longest_streak, 3);
    }

    #[test]
    fn test_streak_restarts_after_failed_day() {
        let mut days = StudiedDays::new();
        days.insert(date(2026, 8, 1), day(100));
        days.insert(date(2026, 8, 2), day(480));

        // Previous calendar day is tracked but failed the goal, so the
        // streak restarts at 1 rather than continuing.
        let summary = calculate_streaks(&days, date(2026, 8, 2), DAILY_GOAL_MINUTES);
        assert_eq!(summary.current_streak, 1);
    }
}
