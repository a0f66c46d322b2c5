//! Statistics Layer
//!
//! Pure calculators over studied-day data. Nothing here touches the
//! backend or the clock directly; functions that depend on "today" take
//! it as a parameter and offer a `_now` convenience wrapper.

mod heatmap;
mod overview;
mod streaks;
mod studied_days;

pub use heatmap::{heatmap_cells, heatmap_grid, intensity, HeatIntensity, HeatmapCell};
pub use overview::{
    goal_completion_rate, overall_stats, past_week_series, shift_minutes, trend_series, DayPoint,
    OverallStats,
};
pub use streaks::{calculate_streaks, calculate_streaks_now, StreakSummary};
pub use studied_days::{studied_days, total_minutes, DayStudy, StudiedDays};
