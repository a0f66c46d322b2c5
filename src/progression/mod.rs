//! Progression Layer
//!
//! Maps accumulated experience points onto the static rank ladder.
//! Everything here is pure and recomputed on every XP change; only the
//! XP total itself is ever persisted.

mod ranks;

pub use ranks::{RankThreshold, RANKS};

use serde::Serialize;

/// Derived rank/level/progress state for an XP total
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    pub rank_name: &'static str,
    pub level_title: &'static str,
    pub current_level: u32,
    /// XP earned within the current level bracket
    pub xp_progress: u32,
    /// XP spanned by the current level bracket
    pub xp_needed: u32,
    pub progress_percentage: f64,
    pub is_max_level: bool,
}

/// A noteworthy step between two progression states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advancement {
    LevelUp,
    RankUp,
}

/// Experience earned for a number of studied minutes: one XP per minute.
pub fn xp_for_minutes(minutes: u32) -> u32 {
    minutes
}

/// Calculates the current rank, level, and XP progress for an XP total.
///
/// Total over all inputs: finds the last ladder entry whose threshold is
/// covered by `total_xp`. With the ladder starting at 0 XP the fallback
/// branch is unreachable, but the function stays defined without it.
pub fn calculate_progression(total_xp: u32) -> Progression {
    let current_index = match RANKS.iter().rposition(|r| total_xp >= r.cumulative_xp_required) {
        Some(index) => index,
        None => {
            return Progression {
                rank_name: "Recruit",
                level_title: "Newcomer",
                current_level: 0,
                xp_progress: 0,
                xp_needed: 1,
                progress_percentage: 0.0,
                is_max_level: false,
            }
        }
    };

    let current = &RANKS[current_index];

    if current_index == RANKS.len() - 1 {
        // At the ceiling the bracket is reported against the previous
        // threshold and progress pins at 100%.
        let bracket_floor = RANKS[current_index - 1].cumulative_xp_required;
        return Progression {
            rank_name: current.rank_name,
            level_title: current.sub_title,
            current_level: current.level,
            xp_progress: total_xp - bracket_floor,
            xp_needed: current.cumulative_xp_required - bracket_floor,
            progress_percentage: 100.0,
            is_max_level: true,
        };
    }

    let next = &RANKS[current_index + 1];
    let bracket_floor = current.cumulative_xp_required;
    let xp_needed = next.cumulative_xp_required - bracket_floor;
    let xp_progress = total_xp - bracket_floor;

    Progression {
        rank_name: current.rank_name,
        level_title: current.sub_title,
        current_level: current.level,
        xp_progress,
        xp_needed,
        progress_percentage: xp_progress as f64 / xp_needed as f64 * 100.0,
        is_max_level: false,
    }
}

/// Detects a level-up or rank-up between two progression states, so the
/// caller can surface feedback. Returns `None` when nothing advanced.
pub fn advancement(before: &Progression, after: &Progression) -> Option<Advancement> {
    if after.current_level <= before.current_level {
        return None;
    }
    if after.rank_name != before.rank_name {
        Some(Advancement::RankUp)
    } else {
        Some(Advancement::LevelUp)
    }
}
