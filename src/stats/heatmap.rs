//! Contribution Heatmap
//!
//! Bins daily studied minutes into intensity levels and lays the days
//! out on a Sunday-aligned week grid for a rolling window.

use chrono::{Datelike, Days, NaiveDate};

use super::studied_days::StudiedDays;

/// Intensity bucket for one heatmap cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatIntensity {
    Empty,
    Faint,
    Light,
    Medium,
    Strong,
    /// The daily goal was met.
    Perfect,
}

/// Bin a day's studied minutes against the daily goal.
pub fn intensity(minutes: u32, goal_minutes: u32) -> HeatIntensity {
    if minutes == 0 {
        HeatIntensity::Empty
    } else if minutes >= goal_minutes {
        HeatIntensity::Perfect
    } else if minutes < 120 {
        HeatIntensity::Faint
    } else if minutes < 240 {
        HeatIntensity::Light
    } else if minutes < 360 {
        HeatIntensity::Medium
    } else {
        HeatIntensity::Strong
    }
}

/// One day on the heatmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapCell {
    pub date: NaiveDate,
    pub minutes: u32,
}

/// Every tracked day with its studied minutes, chronological order.
pub fn heatmap_cells(days: &StudiedDays) -> Vec<HeatmapCell> {
    days.iter()
        .map(|(&date, day)| HeatmapCell {
            date,
            minutes: day.total_minutes,
        })
        .collect()
}

/// Lay out the `window_days` ending at `end` on a week grid.
///
/// The grid starts on the Sunday at or before the window start, so the
/// first week may carry lead-in days and the last week may run a few
/// days past `end`; untracked days report zero minutes.
pub fn heatmap_grid(days: &StudiedDays, end: NaiveDate, window_days: u32) -> Vec<[HeatmapCell; 7]> {
    let span = window_days.max(1) as u64 - 1;
    let start = end.checked_sub_days(Days::new(span)).unwrap_or(end);
    let lead_in = start.weekday().num_days_from_sunday() as u64;
    let grid_start = start.checked_sub_days(Days::new(lead_in)).unwrap_or(start);

    let total_days = (end - grid_start).num_days().max(0) as u64 + 1;
    let weeks = total_days.div_ceil(7);

    (0..weeks)
        .map(|week| {
            std::array::from_fn(|weekday| {
                let date = grid_start
                    .checked_add_days(Days::new(week * 7 + weekday as u64))
                    .unwrap_or(grid_start);
                HeatmapCell {
                    date,
                    minutes: days.get(&date).map_or(0, |d| d.total_minutes),
                }
            })
        })
        .collect()
}
