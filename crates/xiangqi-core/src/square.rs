//! Board square representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An intersection on the xiangqi board.
///
/// `x` is the file (0-8, left to right) and `y` the row (0-9, top to bottom).
/// Row 0 is black's back rank, row 9 is red's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(u8, u8)", into = "(u8, u8)")]
pub struct Square {
    x: u8,
    y: u8,
}

impl Square {
    /// Number of files.
    pub const FILES: u8 = 9;
    /// Number of rows.
    pub const ROWS: u8 = 10;
    /// Total number of squares.
    pub const COUNT: usize = 90;

    /// Creates a square, returning `None` if it lies off the board.
    #[inline]
    pub const fn new(x: u8, y: u8) -> Option<Self> {
        if x < Self::FILES && y < Self::ROWS {
            Some(Square { x, y })
        } else {
            None
        }
    }

    /// Creates a square from coordinates known to be on the board.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are off the board.
    #[inline]
    pub const fn at(x: u8, y: u8) -> Self {
        assert!(x < Self::FILES && y < Self::ROWS, "square off the board");
        Square { x, y }
    }

    /// Creates a square from a row-major index (0-89).
    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Square {
                x: (index % Self::FILES as usize) as u8,
                y: (index / Self::FILES as usize) as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn x(self) -> u8 {
        self.x
    }

    #[inline]
    pub const fn y(self) -> u8 {
        self.y
    }

    /// Returns the row-major index (0-89).
    #[inline]
    pub const fn index(self) -> usize {
        self.y as usize * Self::FILES as usize + self.x as usize
    }

    /// Returns the square displaced by `(dx, dy)`, or `None` off the board.
    #[inline]
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        let x = self.x as i8 + dx;
        let y = self.y as i8 + dy;
        if x < 0 || y < 0 {
            return None;
        }
        Self::new(x as u8, y as u8)
    }

    /// Returns true if the square lies inside the 3x3 palace of `color`.
    #[inline]
    pub const fn in_palace(self, color: crate::Color) -> bool {
        self.x >= 3 && self.x <= 5 && color.palace_row(self.y)
    }

    /// Iterates over every square in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::COUNT).filter_map(Square::from_index)
    }
}

impl TryFrom<(u8, u8)> for Square {
    type Error = String;

    fn try_from((x, y): (u8, u8)) -> Result<Self, Self::Error> {
        Square::new(x, y).ok_or_else(|| format!("square ({},{}) is off the board", x, y))
    }
}

impl From<Square> for (u8, u8) {
    fn from(sq: Square) -> Self {
        (sq.x, sq.y)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn bounds() {
        assert!(Square::new(8, 9).is_some());
        assert!(Square::new(9, 0).is_none());
        assert!(Square::new(0, 10).is_none());
    }

    #[test]
    fn index_round_trip() {
        for sq in Square::all() {
            assert_eq!(Square::from_index(sq.index()), Some(sq));
        }
        assert_eq!(Square::all().count(), Square::COUNT);
        assert_eq!(Square::from_index(90), None);
    }

    #[test]
    fn offsets() {
        let sq = Square::at(0, 9);
        assert_eq!(sq.offset(0, -2), Some(Square::at(0, 7)));
        assert_eq!(sq.offset(-1, 0), None);
        assert_eq!(sq.offset(0, 1), None);
    }

    #[test]
    fn palaces() {
        assert!(Square::at(4, 9).in_palace(Color::Red));
        assert!(Square::at(3, 7).in_palace(Color::Red));
        assert!(!Square::at(2, 9).in_palace(Color::Red));
        assert!(!Square::at(4, 6).in_palace(Color::Red));
        assert!(Square::at(5, 0).in_palace(Color::Black));
        assert!(!Square::at(4, 3).in_palace(Color::Black));
    }

    #[test]
    fn display() {
        assert_eq!(Square::at(4, 0).to_string(), "(4,0)");
    }

    #[test]
    fn serde_rejects_off_board() {
        let sq: Square = serde_json::from_str("[3,7]").unwrap();
        assert_eq!(sq, Square::at(3, 7));
        assert!(serde_json::from_str::<Square>("[9,7]").is_err());
    }
}
