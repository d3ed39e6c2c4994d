//! Board model.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use xiangqi_core::{Color, Move, Piece, PieceKind, Square};

const FILES: usize = Square::FILES as usize;
const ROWS: usize = Square::ROWS as usize;

/// Errors that can occur when parsing a board snapshot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("invalid snapshot: expected 10 rows, got {0}")]
    RowCount(usize),

    #[error("invalid snapshot: row {row} has {width} cells, expected 9")]
    RowWidth { row: usize, width: usize },

    #[error("invalid snapshot: unknown piece code '{code}' in row {row}")]
    InvalidCode { row: usize, code: String },
}

/// A xiangqi board: 10 rows of 9 intersections, each holding at most one piece.
///
/// `Board` is a plain `Copy` value. Applying a move produces a new board and
/// never touches the original, so search and replay can hold any number of
/// boards without aliasing or heap allocation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<Piece>; FILES]; ROWS],
}

impl Board {
    /// Snapshot of the initial setup.
    pub const INITIAL_SNAPSHOT: &'static str = "brbnbbbabkbabbbnbr/........./.bc.....bc./bp.bp.bp.bp.bp/........./\
         ........./rp.rp.rp.rp.rp/.rc.....rc./........./rrrnrbrarkrarbrnrr";

    /// Creates an empty board.
    pub const fn empty() -> Self {
        Board {
            cells: [[None; FILES]; ROWS],
        }
    }

    /// Creates the standard starting position.
    ///
    /// Each side, mirrored across the river: chariots in the back-rank corners,
    /// horses inside them, elephants inside those, advisors flanking the general
    /// at the centre; cannons two rows forward on files 1 and 7; five soldiers on
    /// the even files of the row next to the river.
    pub fn initial() -> Self {
        const BACK_RANK: [PieceKind; FILES] = [
            PieceKind::Chariot,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Chariot,
        ];

        let mut board = Board::empty();
        for (color, back, cannon, soldier) in [(Color::Black, 0, 2, 3), (Color::Red, 9, 7, 6)] {
            for (x, kind) in BACK_RANK.iter().enumerate() {
                board.cells[back][x] = Some(Piece::new(*kind, color));
            }
            for x in [1, 7] {
                board.cells[cannon][x] = Some(Piece::new(PieceKind::Cannon, color));
            }
            for x in [0, 2, 4, 6, 8] {
                board.cells[soldier][x] = Some(Piece::new(PieceKind::Soldier, color));
            }
        }
        board
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.y() as usize][sq.x() as usize]
    }

    /// Returns a copy of the board with `sq` set to `piece`.
    #[must_use]
    pub fn with(mut self, sq: Square, piece: Option<Piece>) -> Self {
        self.cells[sq.y() as usize][sq.x() as usize] = piece;
        self
    }

    /// Returns a new board with the piece on `mov.from` moved to `mov.to`.
    ///
    /// Any occupant of the destination is overwritten (a capture). No legality
    /// is checked here; an empty origin simply clears the destination.
    #[must_use]
    pub fn apply(&self, mov: Move) -> Board {
        let piece = self.get(mov.from);
        self.with(mov.from, None).with(mov.to, piece)
    }

    /// Iterates over every occupied square in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Locates the general of `color`, or `None` if it has been captured.
    pub fn general(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, p)| p.kind == PieceKind::General)
            .map(|(sq, _)| sq)
    }

    /// Counts the generals of `color` on the board.
    pub fn general_count(&self, color: Color) -> usize {
        self.pieces_of(color)
            .filter(|(_, p)| p.kind == PieceKind::General)
            .count()
    }

    /// Counts the pieces strictly between two squares on the same file or row.
    ///
    /// Returns `None` if the squares are not on a common line.
    pub fn count_between(&self, from: Square, to: Square) -> Option<usize> {
        if from.x() != to.x() && from.y() != to.y() {
            return None;
        }
        let dx = (to.x() as i8 - from.x() as i8).signum();
        let dy = (to.y() as i8 - from.y() as i8).signum();
        let mut count = 0;
        let mut cur = from.offset(dx, dy);
        while let Some(sq) = cur {
            if sq == to {
                break;
            }
            if self.get(sq).is_some() {
                count += 1;
            }
            cur = sq.offset(dx, dy);
        }
        Some(count)
    }

    /// Serializes the board as ten `/`-separated rows, top row first.
    ///
    /// Each cell is `.` when empty or a two-character piece code such as `rk`.
    pub fn to_snapshot(&self) -> String {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.map_or_else(|| ".".to_string(), Piece::code))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Parses a snapshot produced by [`Board::to_snapshot`].
    pub fn from_snapshot(snapshot: &str) -> Result<Self, SnapshotError> {
        let rows: Vec<&str> = snapshot.trim().split('/').collect();
        if rows.len() != ROWS {
            return Err(SnapshotError::RowCount(rows.len()));
        }

        let mut board = Board::empty();
        for (y, row) in rows.iter().enumerate() {
            let mut chars = row.chars();
            let mut x = 0;
            while let Some(c) = chars.next() {
                let cell = if c == '.' {
                    None
                } else {
                    let kind = chars.next().unwrap_or(' ');
                    let piece = Piece::from_code(c, kind).ok_or_else(|| SnapshotError::InvalidCode {
                        row: y,
                        code: format!("{}{}", c, kind).trim().to_string(),
                    })?;
                    Some(piece)
                };
                if x < FILES {
                    board.cells[y][x] = cell;
                }
                x += 1;
            }
            if x != FILES {
                return Err(SnapshotError::RowWidth { row: y, width: x });
            }
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_snapshot())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "   0 1 2 3 4 5 6 7 8")?;
        for (y, row) in self.cells.iter().enumerate() {
            write!(f, "{} ", y)?;
            for cell in row {
                match cell {
                    Some(piece) => write!(f, "{}", piece.glyph())?,
                    None => write!(f, " ·")?,
                }
            }
            writeln!(f)?;
            if y == 4 {
                writeln!(f, "  ~~~~~~~~~~~~~~~~~~")?;
            }
        }
        Ok(())
    }
}
