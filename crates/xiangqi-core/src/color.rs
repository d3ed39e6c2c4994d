//! Player color representation.

use serde::{Deserialize, Serialize};

/// The two sides of a xiangqi game.
///
/// Red moves first and sits on the bottom half of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    Red = 0,
    Black = 1,
}

impl Color {
    /// Both colors, red first.
    pub const ALL: [Color; 2] = [Color::Red, Color::Black];

    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// Returns the index (0 for Red, 1 for Black).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the row step a soldier of this color takes when advancing
    /// (-1 for Red, +1 for Black).
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::Red => -1,
            Color::Black => 1,
        }
    }

    /// Returns true if row `y` lies on this color's own half of the board.
    #[inline]
    pub const fn owns_row(self, y: u8) -> bool {
        match self {
            Color::Red => y >= 5,
            Color::Black => y <= 4,
        }
    }

    /// Returns true if row `y` lies inside this color's palace rows.
    #[inline]
    pub const fn palace_row(self, y: u8) -> bool {
        match self {
            Color::Red => y >= 7,
            Color::Black => y <= 2,
        }
    }

    /// The side to move after `plies` half-moves from the initial setup.
    #[inline]
    pub const fn to_move_after(plies: usize) -> Self {
        if plies % 2 == 0 {
            Color::Red
        } else {
            Color::Black
        }
    }

    /// Single-character code used in board snapshots.
    #[inline]
    pub const fn code(self) -> char {
        match self {
            Color::Red => 'r',
            Color::Black => 'b',
        }
    }

    /// Parses a snapshot color code.
    #[inline]
    pub const fn from_code(c: char) -> Option<Self> {
        match c {
            'r' => Some(Color::Red),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::Black => write!(f, "Black"),
        }
    }
}
