//! Move representation.

use crate::{Color, Piece, Square};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A move from one square to another.
///
/// A move carries no legality information; captures are implied by the
/// destination being occupied on the board it is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move { from, to }
    }

    /// Parses `"x1,y1 x2,y2"` or `"x1 y1 x2 y2"` text into a move.
    pub fn parse(text: &str) -> Option<Self> {
        let nums: Vec<u8> = text
            .split(|c: char| c.is_whitespace() || c == ',' || c == '-' || c == '>')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().ok())
            .collect::<Option<_>>()?;
        match nums.as_slice() {
            [x1, y1, x2, y2] => Some(Move::new(Square::new(*x1, *y1)?, Square::new(*x2, *y2)?)),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}

/// One entry of a game's move history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    /// The side that made the move.
    pub color: Color,
    /// Human-readable description, e.g. `"Red Chariot (0,9)->(0,7)"`.
    pub description: String,
}

impl MoveRecord {
    /// Records `mov` made by `piece`, capturing `captured` if present.
    pub fn new(piece: Piece, mov: Move, captured: Option<Piece>) -> Self {
        let description = match captured {
            Some(target) => format!("{} {} takes {}", piece, mov, target.kind),
            None => format!("{} {}", piece, mov),
        };
        MoveRecord {
            from: mov.from,
            to: mov.to,
            color: piece.color,
            description,
        }
    }

    /// The bare move of this record.
    #[inline]
    pub const fn mov(&self) -> Move {
        Move::new(self.from, self.to)
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PieceKind;

    #[test]
    fn parse_forms() {
        let expected = Move::new(Square::at(0, 9), Square::at(0, 7));
        assert_eq!(Move::parse("0,9 0,7"), Some(expected));
        assert_eq!(Move::parse("0 9 0 7"), Some(expected));
        assert_eq!(Move::parse("0,9->0,7"), Some(expected));
        assert_eq!(Move::parse("0,9 0,10"), None);
        assert_eq!(Move::parse("0,9"), None);
        assert_eq!(Move::parse("a,b c,d"), None);
    }

    #[test]
    fn record_description() {
        let chariot = Piece::new(PieceKind::Chariot, Color::Red);
        let mov = Move::new(Square::at(0, 9), Square::at(0, 7));
        let record = MoveRecord::new(chariot, mov, None);
        assert_eq!(record.description, "Red Chariot (0,9)->(0,7)");
        assert_eq!(record.color, Color::Red);
        assert_eq!(record.mov(), mov);

        let cannon = Piece::new(PieceKind::Cannon, Color::Black);
        let take = Move::new(Square::at(1, 2), Square::at(1, 9));
        let horse = Piece::new(PieceKind::Horse, Color::Red);
        let record = MoveRecord::new(cannon, take, Some(horse));
        assert_eq!(record.description, "Black Cannon (1,2)->(1,9) takes Horse");
    }

    #[test]
    fn record_serde_shape() {
        let chariot = Piece::new(PieceKind::Chariot, Color::Red);
        let record = MoveRecord::new(chariot, Move::new(Square::at(0, 9), Square::at(0, 8)), None);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"color\":\"red\""));
        let back: MoveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
