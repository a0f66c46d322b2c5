//! Rank Table
//!
//! Static 50-level progression ladder. Thresholds are cumulative XP and
//! strictly increasing; one XP corresponds to one studied minute, so a
//! completed 30-minute slot grants 30 XP.

/// One row of the rank ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankThreshold {
    pub level: u32,
    /// Main rank shared by a band of levels, e.g. "Knight"
    pub rank_name: &'static str,
    /// Title of this specific level, e.g. "Paladin"
    pub sub_title: &'static str,
    /// Total XP required to reach this level
    pub cumulative_xp_required: u32,
}

/// All levels, ordered ascending by level and threshold.
pub static RANKS: &[RankThreshold] = &[
    RankThreshold { level: 1, rank_name: "Recruit", sub_title: "Novice", cumulative_xp_required: 0 },
    RankThreshold { level: 2, rank_name: "Recruit", sub_title: "Initiate", cumulative_xp_required: 480 },
    RankThreshold { level: 3, rank_name: "Recruit", sub_title: "Apprentice", cumulative_xp_required: 1200 },
    RankThreshold { level: 4, rank_name: "Recruit", sub_title: "Adept", cumulative_xp_required: 1920 },
    RankThreshold { level: 5, rank_name: "Recruit", sub_title: "Squire", cumulative_xp_required: 2880 },
    RankThreshold { level: 6, rank_name: "Warrior", sub_title: "Fighter", cumulative_xp_required: 4200 },
    RankThreshold { level: 7, rank_name: "Warrior", sub_title: "Bladebearer", cumulative_xp_required: 5400 },
    RankThreshold { level: 8, rank_name: "Warrior", sub_title: "Vanguard", cumulative_xp_required: 6900 },
    RankThreshold { level: 9, rank_name: "Warrior", sub_title: "Battlemaster", cumulative_xp_required: 8640 },
    RankThreshold { level: 10, rank_name: "Warrior", sub_title: "Knight Aspirant", cumulative_xp_required: 10800 },
    RankThreshold { level: 11, rank_name: "Knight", sub_title: "Sentinel", cumulative_xp_required: 13200 },
    RankThreshold { level: 12, rank_name: "Knight", sub_title: "Warder", cumulative_xp_required: 15900 },
    RankThreshold { level: 13, rank_name: "Knight", sub_title: "Lancer", cumulative_xp_required: 18900 },
    RankThreshold { level: 14, rank_name: "Knight", sub_title: "Champion", cumulative_xp_required: 22200 },
    RankThreshold { level: 15, rank_name: "Knight", sub_title: "Paladin", cumulative_xp_required: 25800 },
    RankThreshold { level: 16, rank_name: "Elite Knight", sub_title: "Crusader", cumulative_xp_required: 29800 },
    RankThreshold { level: 17, rank_name: "Elite Knight", sub_title: "Cavalier", cumulative_xp_required: 34200 },
    RankThreshold { level: 18, rank_name: "Elite Knight", sub_title: "Warlord", cumulative_xp_required: 39000 },
    RankThreshold { level: 19, rank_name: "Elite Knight", sub_title: "Knight Marshal", cumulative_xp_required: 44400 },
    RankThreshold { level: 20, rank_name: "Elite Knight", sub_title: "Dragonguard", cumulative_xp_required: 50400 },
    RankThreshold { level: 21, rank_name: "Lord", sub_title: "Baron", cumulative_xp_required: 57000 },
    RankThreshold { level: 22, rank_name: "Lord", sub_title: "Viscount", cumulative_xp_required: 64200 },
    RankThreshold { level: 23, rank_name: "Lord", sub_title: "Count", cumulative_xp_required: 72000 },
    RankThreshold { level: 24, rank_name: "Lord", sub_title: "Marquis", cumulative_xp_required: 80400 },
    RankThreshold { level: 25, rank_name: "Lord", sub_title: "High Lord", cumulative_xp_required: 89400 },
    RankThreshold { level: 26, rank_name: "Warlord", sub_title: "Brigadier", cumulative_xp_required: 99000 },
    RankThreshold { level: 27, rank_name: "Warlord", sub_title: "Colonel", cumulative_xp_required: 109200 },
    RankThreshold { level: 28, rank_name: "Warlord", sub_title: "General", cumulative_xp_required: 120000 },
    RankThreshold { level: 29, rank_name: "Warlord", sub_title: "Lieutenant-General", cumulative_xp_required: 131400 },
    RankThreshold { level: 30, rank_name: "Warlord", sub_title: "Supreme Commander", cumulative_xp_required: 143400 },
    RankThreshold { level: 31, rank_name: "Champion", sub_title: "Knight of Legends", cumulative_xp_required: 156000 },
    RankThreshold { level: 32, rank_name: "Champion", sub_title: "Grand Champion", cumulative_xp_required: 169200 },
    RankThreshold { level: 33, rank_name: "Champion", sub_title: "Field Champion", cumulative_xp_required: 182400 },
    RankThreshold { level: 34, rank_name: "Champion", sub_title: "Champion of Realms", cumulative_xp_required: 196200 },
    RankThreshold { level: 35, rank_name: "Champion", sub_title: "Legendary Champion", cumulative_xp_required: 210600 },
    RankThreshold { level: 36, rank_name: "Noble Commander", sub_title: "Marshal", cumulative_xp_required: 225600 },
    RankThreshold { level: 37, rank_name: "Noble Commander", sub_title: "Count Marshal", cumulative_xp_required: 241200 },
    RankThreshold { level: 38, rank_name: "Noble Commander", sub_title: "Duke Marshal", cumulative_xp_required: 257400 },
    RankThreshold { level: 39, rank_name: "Noble Commander", sub_title: "Grand Duke Commander", cumulative_xp_required: 274200 },
    RankThreshold { level: 40, rank_name: "Noble Commander", sub_title: "High Commander", cumulative_xp_required: 291600 },
    RankThreshold { level: 41, rank_name: "Marshal", sub_title: "Field Marshal", cumulative_xp_required: 309600 },
    RankThreshold { level: 42, rank_name: "Marshal", sub_title: "Grand Marshal", cumulative_xp_required: 328200 },
    RankThreshold { level: 43, rank_name: "Marshal", sub_title: "Supreme Marshal", cumulative_xp_required: 347400 },
    RankThreshold { level: 44, rank_name: "Marshal", sub_title: "Commander-in-Chief", cumulative_xp_required: 367200 },
    RankThreshold { level: 45, rank_name: "Marshal", sub_title: "Legendary Marshal", cumulative_xp_required: 387600 },
    RankThreshold { level: 46, rank_name: "Legendary Hero", sub_title: "Hero", cumulative_xp_required: 408600 },
    RankThreshold { level: 47, rank_name: "Legendary Hero", sub_title: "Dragon Slayer", cumulative_xp_required: 430200 },
    RankThreshold { level: 48, rank_name: "Legendary Hero", sub_title: "King's Champion", cumulative_xp_required: 470000 },
    RankThreshold { level: 49, rank_name: "Legendary Hero", sub_title: "Lord Protector", cumulative_xp_required: 485000 },
    RankThreshold { level: 50, rank_name: "Legendary Hero", sub_title: "Eternal Warlord", cumulative_xp_required: 500000 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_strictly_increasing() {
        for window in RANKS.windows(2) {
            assert!(window[1].level == window[0].level + 1);
            assert!(window[1].cumulative_xp_required > window[0].cumulative_xp_required);
        }
    }

    #[test]
    fn test_table_bounds() {
        assert_eq!(RANKS.len(), 50);
        assert_eq!(RANKS[0].cumulative_xp_required, 0);
        assert_eq!(RANKS[RANKS.len() - 1].cumulative_xp_required, 500_000);
    }
}
