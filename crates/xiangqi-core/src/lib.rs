//! Core types for xiangqi.
//!
//! This crate provides the fundamental types shared by the engine, the AI
//! and the practice host:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates
//! - [`Move`] and [`MoveRecord`] for moves and recorded history
//!
//! # Orientation
//!
//! The board is 9 files wide (`x` in `0..=8`) and 10 rows tall (`y` in
//! `0..=9`). Black always occupies the top rows (`y <= 4`) and red the bottom
//! rows (`y >= 5`); the river lies between rows 4 and 5.

mod color;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use mov::{Move, MoveRecord};
pub use piece::{Piece, PieceKind};
pub use square::Square;
