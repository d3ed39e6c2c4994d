//! Xiangqi piece representation.

use crate::Color;
use serde::{Deserialize, Serialize};

/// The seven types of xiangqi pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum PieceKind {
    General = 0,
    Advisor = 1,
    Elephant = 2,
    Horse = 3,
    Chariot = 4,
    Cannon = 5,
    Soldier = 6,
}

impl PieceKind {
    /// All piece kinds in order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    /// Returns the index of this piece kind (0-6).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Static material value, also used to order captures.
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            PieceKind::General => 10_000,
            PieceKind::Chariot => 90,
            PieceKind::Cannon => 45,
            PieceKind::Horse => 40,
            PieceKind::Elephant => 20,
            PieceKind::Advisor => 20,
            PieceKind::Soldier => 10,
        }
    }

    /// Snapshot letter for this kind.
    pub const fn code(self) -> char {
        match self {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        }
    }

    /// Parses a snapshot letter.
    pub const fn from_code(c: char) -> Option<Self> {
        match c {
            'k' => Some(PieceKind::General),
            'a' => Some(PieceKind::Advisor),
            'b' => Some(PieceKind::Elephant),
            'n' => Some(PieceKind::Horse),
            'r' => Some(PieceKind::Chariot),
            'c' => Some(PieceKind::Cannon),
            'p' => Some(PieceKind::Soldier),
            _ => None,
        }
    }
}

impl std::fmt::Display for PieceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PieceKind::General => "General",
            PieceKind::Advisor => "Advisor",
            PieceKind::Elephant => "Elephant",
            PieceKind::Horse => "Horse",
            PieceKind::Chariot => "Chariot",
            PieceKind::Cannon => "Cannon",
            PieceKind::Soldier => "Soldier",
        };
        write!(f, "{}", name)
    }
}

/// A piece on the board: a kind owned by a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    /// Two-character snapshot code, color first (e.g. `"rk"` for the red general).
    pub fn code(self) -> String {
        let mut s = String::with_capacity(2);
        s.push(self.color.code());
        s.push(self.kind.code());
        s
    }

    /// Parses a color code followed by a kind code.
    pub const fn from_code(color: char, kind: char) -> Option<Self> {
        match (Color::from_code(color), PieceKind::from_code(kind)) {
            (Some(color), Some(kind)) => Some(Piece { kind, color }),
            _ => None,
        }
    }

    /// Traditional board glyph; the two sides use different characters for
    /// general, advisor, elephant and soldier.
    pub const fn glyph(self) -> char {
        match (self.color, self.kind) {
            (Color::Red, PieceKind::General) => '帥',
            (Color::Black, PieceKind::General) => '將',
            (Color::Red, PieceKind::Advisor) => '仕',
            (Color::Black, PieceKind::Advisor) => '士',
            (Color::Red, PieceKind::Elephant) => '相',
            (Color::Black, PieceKind::Elephant) => '象',
            (_, PieceKind::Horse) => '馬',
            (_, PieceKind::Chariot) => '車',
            (_, PieceKind::Cannon) => '炮',
            (Color::Red, PieceKind::Soldier) => '兵',
            (Color::Black, PieceKind::Soldier) => '卒',
        }
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.color, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_codes() {
        let general = Piece::new(PieceKind::General, Color::Red);
        assert_eq!(general.code(), "rk");
        assert_eq!(Piece::from_code('b', 'c'), Some(Piece::new(PieceKind::Cannon, Color::Black)));
        assert_eq!(Piece::from_code('x', 'c'), None);
        assert_eq!(Piece::from_code('r', 'q'), None);
    }

    #[test]
    fn kind_codes_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn value_ordering() {
        assert!(PieceKind::General.value() > PieceKind::Chariot.value());
        assert!(PieceKind::Chariot.value() > PieceKind::Cannon.value());
        assert!(PieceKind::Cannon.value() >= PieceKind::Horse.value());
        assert!(PieceKind::Horse.value() > PieceKind::Elephant.value());
        assert_eq!(PieceKind::Elephant.value(), PieceKind::Advisor.value());
        assert!(PieceKind::Advisor.value() > PieceKind::Soldier.value());
    }

    #[test]
    fn glyphs_differ_by_side() {
        let red = Piece::new(PieceKind::Soldier, Color::Red);
        let black = Piece::new(PieceKind::Soldier, Color::Black);
        assert_ne!(red.glyph(), black.glyph());
    }

    #[test]
    fn display() {
        let piece = Piece::new(PieceKind::Horse, Color::Black);
        assert_eq!(format!("{}", piece), "Black Horse");
    }
}
