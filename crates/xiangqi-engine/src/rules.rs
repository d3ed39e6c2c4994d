//! Move validation.
//!
//! Legality is split in two layers:
//! - [`is_basic_legal`] checks ownership and the per-piece geometry, including
//!   the obstruction counts of chariot and cannon and the blocking cells of
//!   horse and elephant.
//! - [`is_legal`] additionally simulates the move and rejects it if the
//!   mover's own general would be in check afterwards.

use crate::Board;
use xiangqi_core::{Color, Move, PieceKind, Square};

/// Returns true if `from -> to` is a geometrically valid move for the piece on
/// `from`, owned by `turn`, ignoring whether it exposes its own general.
pub fn is_basic_legal(board: &Board, from: Square, to: Square, turn: Color) -> bool {
    let Some(piece) = board.get(from) else {
        return false;
    };
    if piece.color != turn || from == to {
        return false;
    }
    let target = board.get(to);
    if target.is_some_and(|t| t.color == turn) {
        return false;
    }

    let dx = to.x() as i8 - from.x() as i8;
    let dy = to.y() as i8 - from.y() as i8;
    let (adx, ady) = (dx.abs(), dy.abs());

    match piece.kind {
        PieceKind::Chariot => board.count_between(from, to) == Some(0),
        PieceKind::Cannon => match board.count_between(from, to) {
            Some(screens) if target.is_some() => screens == 1,
            Some(screens) => screens == 0,
            None => false,
        },
        PieceKind::Horse => {
            let leg = match (adx, ady) {
                (2, 1) => from.offset(dx / 2, 0),
                (1, 2) => from.offset(0, dy / 2),
                _ => return false,
            };
            leg.is_some_and(|leg| board.get(leg).is_none())
        }
        PieceKind::Soldier => {
            let forward = turn.forward();
            if dy == forward && dx == 0 {
                return true;
            }
            // Sideways steps only once the soldier stands on the far side of the river.
            dy == 0 && adx == 1 && !turn.owns_row(from.y())
        }
        PieceKind::General => to.in_palace(turn) && adx + ady == 1,
        PieceKind::Advisor => to.in_palace(turn) && adx == 1 && ady == 1,
        PieceKind::Elephant => {
            if !turn.owns_row(to.y()) || adx != 2 || ady != 2 {
                return false;
            }
            from.offset(dx / 2, dy / 2)
                .is_some_and(|eye| board.get(eye).is_none())
        }
    }
}

/// Returns true if both generals stand on the same file with nothing between them.
pub fn generals_facing(board: &Board) -> bool {
    match (board.general(Color::Red), board.general(Color::Black)) {
        (Some(red), Some(black)) => {
            red.x() == black.x() && board.count_between(red, black) == Some(0)
        }
        _ => false,
    }
}

/// Returns true if the general of `color` is in check.
///
/// A missing general counts as in check (it has been captured), and two
/// generals facing each other on an open file put both sides in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    let Some(general) = board.general(color) else {
        return true;
    };
    if generals_facing(board) {
        return true;
    }
    let enemy = color.opposite();
    board
        .pieces_of(enemy)
        .any(|(sq, _)| is_basic_legal(board, sq, general, enemy))
}

/// Returns true if `from -> to` is fully legal for `turn`: geometrically valid
/// and not leaving the mover's general in check.
pub fn is_legal(board: &Board, from: Square, to: Square, turn: Color) -> bool {
    is_basic_legal(board, from, to, turn)
        && !is_in_check(&board.apply(Move::new(from, to)), turn)
}
