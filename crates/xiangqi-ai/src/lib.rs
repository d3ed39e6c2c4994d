//! Xiangqi opponent.
//!
//! - [`evaluate`] - static material and positional score, black positive
//! - [`Searcher`] - fixed-depth minimax with alpha-beta pruning
//! - [`SearchEngine`] - root move ranking and skill-scaled move choice
//! - [`SkillLevel`] - search depth and randomness keyed by player rating
//! - [`analysis`] - post-game move quality and critical-mistake detection
//!
//! The engine plays black: black is the maximizing side of every score.
//!
//! # Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use xiangqi_ai::{SearchEngine, SkillLevel};
//! use xiangqi_core::Color;
//! use xiangqi_engine::Board;
//!
//! let engine = SearchEngine::new(SkillLevel::for_rating(900).config());
//! let mut rng = StdRng::seed_from_u64(7);
//! let board = Board::initial();
//! let result = engine.choose_move(&board, Color::Black, &mut rng).unwrap();
//! assert!(board.get(result.chosen.mov.from).is_some());
//! ```

pub mod analysis;
mod evaluation;
mod search;
mod skill;

pub use analysis::{analyze_history, critical_index, MoveAnalysis, MoveQuality, PlayerStats};
pub use evaluation::{evaluate, piece_score};
pub use search::{ScoredMove, SearchConfig, SearchEngine, SearchResult, Searcher, WIN_SCORE};
pub use skill::SkillLevel;
