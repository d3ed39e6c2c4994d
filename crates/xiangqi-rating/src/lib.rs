//! Player rating for xiangqi practice.
//!
//! - [`elo`] - K = 40 Elo updates against an engine rated slightly above the player
//! - [`rank_title`] - human-readable rank for a rating
//! - [`RatingStore`] - load-at-start / save-at-end persistence contract

pub mod elo;
mod rank;
mod store;

pub use elo::{elo_change, settle, MatchResult, RatingUpdate, K_FACTOR, OPPONENT_OFFSET};
pub use rank::rank_title;
pub use store::{load_or_default, JsonFileStore, MemoryStore, RatingStore, StoreError, DEFAULT_RATING};
