//! Deterministic replay of historical positions.
//!
//! Every function here rebuilds boards from the initial setup on each call.
//! Nothing is cached, so a replayed board can never drift from the history it
//! was derived from.

use crate::{Board, GameError, GameSession};
use serde::Serialize;
use xiangqi_core::MoveRecord;

/// The position around one move of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayFrame {
    /// Board with every move strictly before the index applied.
    pub before: Board,
    /// `before` with the indexed move applied on top.
    pub after: Board,
    /// The indexed move.
    pub record: MoveRecord,
}

/// Returns the board after the first `plies` moves of `history`.
///
/// Moves are applied structurally, without legality checks; `plies` beyond the
/// end of the history replays everything.
pub fn board_at(history: &[MoveRecord], plies: usize) -> Board {
    history
        .iter()
        .take(plies)
        .fold(Board::initial(), |board, record| board.apply(record.mov()))
}

/// Rebuilds the boards before and after move `index` of `history`.
pub fn reconstruct(history: &[MoveRecord], index: usize) -> Result<ReplayFrame, GameError> {
    let record = history.get(index).ok_or(GameError::IndexOutOfRange {
        index,
        len: history.len(),
    })?;
    let before = board_at(history, index);
    let after = before.apply(record.mov());
    Ok(ReplayFrame {
        before,
        after,
        record: record.clone(),
    })
}

/// Starts a new game from the moves strictly before `index`.
///
/// Used to retry a game from just before a flagged mistake. The side to move
/// follows the prefix length: even means red.
pub fn practice_from(history: &[MoveRecord], index: usize) -> Result<GameSession, GameError> {
    if index > history.len() {
        return Err(GameError::IndexOutOfRange {
            index,
            len: history.len(),
        });
    }
    GameSession::from_history(&history[..index])
}
