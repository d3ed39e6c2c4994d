//! Static position evaluation.

use xiangqi_core::{Color, Piece, PieceKind, Square};
use xiangqi_engine::Board;

/// Bonus for a soldier standing on the far side of the river.
const SOLDIER_CROSSED_BONUS: i32 = 10;
/// Further bonus for a soldier deep in enemy territory, close to the palace.
const SOLDIER_DEEP_BONUS: i32 = 10;
/// Bonus for a chariot or cannon on the central file.
const CENTRAL_FILE_BONUS: i32 = 10;

const CENTRAL_FILE: u8 = 4;

/// Value of `piece` standing on `sq`: material plus positional bonus, unsigned.
pub fn piece_score(piece: Piece, sq: Square) -> i32 {
    let mut value = piece.kind.value();
    match piece.kind {
        PieceKind::Soldier => {
            if !piece.color.owns_row(sq.y()) {
                value += SOLDIER_CROSSED_BONUS;
            }
            let deep = match piece.color {
                Color::Black => sq.y() > 6,
                Color::Red => sq.y() < 3,
            };
            if deep {
                value += SOLDIER_DEEP_BONUS;
            }
        }
        PieceKind::Chariot | PieceKind::Cannon if sq.x() == CENTRAL_FILE => {
            value += CENTRAL_FILE_BONUS;
        }
        _ => {}
    }
    value
}

/// Scores the board: black pieces count positive, red pieces negative.
pub fn evaluate(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(sq, piece)| match piece.color {
            Color::Black => piece_score(piece, sq),
            Color::Red => -piece_score(piece, sq),
        })
        .sum()
}
