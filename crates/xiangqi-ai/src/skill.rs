//! Opponent strength scaled to the player's rating.

use crate::SearchConfig;
use serde::{Deserialize, Serialize};

/// Rating tiers, weakest first. Each tier searches at least as deep and plays
/// at least as accurately as the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    /// Rating below 1000.
    Novice,
    /// Rating 1000-1199.
    Club,
    /// Rating 1200-1399.
    Expert,
    /// Rating 1400 and above.
    Master,
}

impl SkillLevel {
    /// Every tier, weakest first.
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Novice,
        SkillLevel::Club,
        SkillLevel::Expert,
        SkillLevel::Master,
    ];

    /// Picks the tier for a player rating.
    pub const fn for_rating(rating: i32) -> Self {
        if rating < 1000 {
            SkillLevel::Novice
        } else if rating < 1200 {
            SkillLevel::Club
        } else if rating < 1400 {
            SkillLevel::Expert
        } else {
            SkillLevel::Master
        }
    }

    /// Search settings for this tier.
    pub const fn config(self) -> SearchConfig {
        let (depth, random_factor) = match self {
            SkillLevel::Novice => (2, 0.3),
            SkillLevel::Club => (2, 0.1),
            SkillLevel::Expert => (3, 0.05),
            SkillLevel::Master => (3, 0.0),
        };
        SearchConfig {
            depth,
            random_factor,
        }
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SkillLevel::Novice => "Novice",
            SkillLevel::Club => "Club",
            SkillLevel::Expert => "Expert",
            SkillLevel::Master => "Master",
        };
        write!(f, "{}", name)
    }
}
