//! Elo rating calculation.
//!
//! Uses a K-factor of 40 and rates the player against an opponent 50 points
//! stronger than the player's current rating.

use serde::{Deserialize, Serialize};

/// Maximum rating change per game.
pub const K_FACTOR: f64 = 40.0;

/// How far the engine's effective rating sits above the player's.
pub const OPPONENT_OFFSET: i32 = 50;

/// Result of a game from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Loss,
    Draw,
}

impl MatchResult {
    /// Actual score for the Elo formula.
    pub const fn score(self) -> f64 {
        match self {
            MatchResult::Win => 1.0,
            MatchResult::Loss => 0.0,
            MatchResult::Draw => 0.5,
        }
    }
}

/// A settled rating change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub before: i32,
    pub after: i32,
    pub change: i32,
}

/// Calculate expected score for a player against an opponent.
fn expected_score(rating: i32, opponent_rating: i32) -> f64 {
    1.0 / (1.0 + 10_f64.powf((opponent_rating - rating) as f64 / 400.0))
}

/// Rating change for one game, rounded to the nearest point.
pub fn elo_change(rating: i32, opponent_rating: i32, result: MatchResult) -> i32 {
    let expected = expected_score(rating, opponent_rating);
    (K_FACTOR * (result.score() - expected)).round() as i32
}

/// Settles a finished practice game against the engine.
pub fn settle(rating: i32, result: MatchResult) -> RatingUpdate {
    let change = elo_change(rating, rating + OPPONENT_OFFSET, result);
    let update = RatingUpdate {
        before: rating,
        after: rating + change,
        change,
    };
    tracing::info!(?result, before = update.before, after = update.after, "rating settled");
    update
}
