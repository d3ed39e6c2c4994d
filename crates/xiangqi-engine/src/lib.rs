//! Xiangqi rules engine.
//!
//! This crate provides:
//! - [`Board`] - immutable 9x10 grid with a pure [`Board::apply`] transform
//! - [`rules`] - per-piece legality, check and flying-general detection
//! - [`movegen`] - fully legal move generation with capture-first ordering
//! - [`GameSession`] - turn sequencing over an append-only move history
//! - [`replay`] - deterministic reconstruction of historical positions
//!
//! # Example
//!
//! ```
//! use xiangqi_core::{Color, Move, Square};
//! use xiangqi_engine::{generate_moves, Board, GameSession};
//!
//! let board = Board::initial();
//! let moves = generate_moves(&board, Color::Red);
//! assert_eq!(moves.len(), 44);
//!
//! let mut game = GameSession::new();
//! game.play(Move::new(Square::at(0, 9), Square::at(0, 7))).unwrap();
//! assert_eq!(game.turn(), Color::Black);
//! ```

mod board;
mod game;
pub mod movegen;
pub mod replay;
pub mod rules;

pub use board::{Board, SnapshotError};
pub use game::{EndReason, GameError, GameOutcome, GameSession};
pub use movegen::{generate_moves, legal_targets, MoveList};
pub use replay::{board_at, practice_from, reconstruct, ReplayFrame};
pub use rules::{generals_facing, is_basic_legal, is_in_check, is_legal};
