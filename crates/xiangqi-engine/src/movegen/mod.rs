//! Legal move generation.
//!
//! Every own piece is tried against every board square and only fully legal
//! moves are kept. The resulting list is ordered captures first, most valuable
//! victim first, so that alpha-beta search sees the sharpest moves early.

mod perft;

pub use perft::{perft, perft_divide};

use crate::rules::is_legal;
use crate::Board;
use std::cmp::Reverse;
use xiangqi_core::{Color, Move, Square};

/// A list of moves with a fixed maximum capacity.
///
/// Xiangqi positions have far fewer than 256 legal moves, so a fixed-size
/// array avoids heap allocations at every search node.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    /// Capacity of the list.
    pub const MAX_MOVES: usize = 256;

    const NULL: Move = Move::new(Square::at(0, 0), Square::at(0, 0));

    /// Creates an empty move list.
    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Self::NULL; Self::MAX_MOVES],
            len: 0,
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    /// Returns the number of moves.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Returns true if the list contains `m`.
    #[inline]
    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    /// Iterates over the moves.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Stable-sorts the moves so captures come first, by descending victim value.
    pub fn order_captures_first(&mut self, board: &Board) {
        self.moves[..self.len]
            .sort_by_key(|m| Reverse(board.get(m.to).map_or(0, |p| p.kind.value())));
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        debug_assert!(index < self.len);
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates every fully legal move for `side`, captures first.
///
/// An empty list means `side` has no legal response and has lost: xiangqi has
/// no stalemate draw.
pub fn generate_moves(board: &Board, side: Color) -> MoveList {
    let mut list = MoveList::new();
    for (from, _) in board.pieces_of(side) {
        for to in Square::all() {
            if is_legal(board, from, to, side) {
                list.push(Move::new(from, to));
            }
        }
    }
    list.order_captures_first(board);
    list
}

/// Returns the legal destination squares for the piece on `from`.
///
/// Empty when `from` holds no piece.
pub fn legal_targets(board: &Board, from: Square) -> Vec<Square> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    Square::all()
        .filter(|&to| is_legal(board, from, to, piece.color))
        .collect()
}
