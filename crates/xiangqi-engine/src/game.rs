//! Game session management with history tracking.
//!
//! A [`GameSession`] owns an append-only move history starting from the
//! initial setup (or from a replayed prefix) and tracks the side to move and
//! the result. It is the only place where a game is allowed to end: by a
//! captured general, by the side to move having no legal moves, or by
//! resignation.

use crate::movegen::{generate_moves, legal_targets, MoveList};
use crate::rules::{is_in_check, is_legal};
use crate::Board;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use xiangqi_core::{Color, Move, MoveRecord, PieceKind, Square};

/// Error type for game operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    /// The move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(Move),

    /// A replayed history entry is not legal at its position.
    #[error("history entry {index} is not a legal move: {description}")]
    IllegalHistory { index: usize, description: String },

    /// The game ended before the supplied history was fully replayed.
    #[error("history continues after the game ended at move {index}")]
    HistoryAfterEnd { index: usize },

    /// A history index lies outside the recorded moves.
    #[error("history index {index} out of range for {len} moves")]
    IndexOutOfRange { index: usize, len: usize },

    /// The game has already ended.
    #[error("game has already ended")]
    GameAlreadyOver,
}

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// The loser's general was taken.
    GeneralCaptured,
    /// The loser had no legal move on their turn.
    NoLegalMoves,
    /// The loser resigned.
    Resignation,
}

/// Result of a finished game. Xiangqi as played here has no draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Color,
    pub reason: EndReason,
}

impl GameOutcome {
    /// The losing side.
    #[inline]
    pub const fn loser(&self) -> Color {
        self.winner.opposite()
    }
}

/// A xiangqi game in progress.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Current board, always equal to the history replayed from the initial setup.
    board: Board,
    /// Side to move.
    turn: Color,
    /// Every move played, oldest first.
    history: Vec<MoveRecord>,
    /// Set once the game has ended.
    outcome: Option<GameOutcome>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Creates a new game from the initial setup, red to move.
    pub fn new() -> Self {
        GameSession {
            board: Board::initial(),
            turn: Color::Red,
            history: Vec::new(),
            outcome: None,
        }
    }

    /// Creates a game by replaying `prefix` from the initial setup.
    ///
    /// Every entry must be a legal move for the side whose turn it is, so the
    /// side to move afterwards follows the prefix length parity (even length
    /// means red to move). Recorded descriptions are kept verbatim.
    pub fn from_history(prefix: &[MoveRecord]) -> Result<Self, GameError> {
        let mut game = Self::new();
        for (index, record) in prefix.iter().enumerate() {
            if game.outcome.is_some() {
                return Err(GameError::HistoryAfterEnd {
                    index: index.saturating_sub(1),
                });
            }
            if record.color != game.turn
                || !is_legal(&game.board, record.from, record.to, game.turn)
            {
                return Err(GameError::IllegalHistory {
                    index,
                    description: record.description.clone(),
                });
            }
            game.push(record.clone());
        }
        if game.outcome.is_none() {
            game.check_no_moves();
        }
        Ok(game)
    }

    /// Returns the current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the move history.
    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Returns the number of half-moves played.
    pub fn ply_count(&self) -> usize {
        self.history.len()
    }

    /// Returns the most recent move, if any.
    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.history.last()
    }

    /// Returns the outcome if the game is over.
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// Returns true if the game has ended.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns all legal moves for the side to move.
    pub fn legal_moves(&self) -> MoveList {
        generate_moves(&self.board, self.turn)
    }

    /// Returns the legal destinations of the piece on `from`, if it belongs to
    /// the side to move.
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        match self.board.get(from) {
            Some(piece) if piece.color == self.turn && !self.is_over() => {
                legal_targets(&self.board, from)
            }
            _ => Vec::new(),
        }
    }

    /// Returns true if `mov` is legal for the side to move.
    pub fn is_legal(&self, mov: Move) -> bool {
        !self.is_over() && is_legal(&self.board, mov.from, mov.to, self.turn)
    }

    /// Returns true if the side to move is in check.
    pub fn is_check(&self) -> bool {
        is_in_check(&self.board, self.turn)
    }

    /// Plays a legal move for the side to move and returns its record.
    pub fn play(&mut self, mov: Move) -> Result<MoveRecord, GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        if !is_legal(&self.board, mov.from, mov.to, self.turn) {
            return Err(GameError::IllegalMove(mov));
        }
        let piece = self.board.get(mov.from).ok_or(GameError::IllegalMove(mov))?;
        let record = MoveRecord::new(piece, mov, self.board.get(mov.to));
        self.push(record.clone());
        if self.outcome.is_none() {
            self.check_no_moves();
        }
        Ok(record)
    }

    /// Resigns on behalf of `color`.
    pub fn resign(&mut self, color: Color) -> Result<GameOutcome, GameError> {
        if self.is_over() {
            return Err(GameError::GameAlreadyOver);
        }
        let outcome = GameOutcome {
            winner: color.opposite(),
            reason: EndReason::Resignation,
        };
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    /// Appends a record, applies it and flips the turn unless a general fell.
    fn push(&mut self, record: MoveRecord) {
        let captured = self.board.get(record.to);
        self.board = self.board.apply(record.mov());
        self.history.push(record);

        if captured.is_some_and(|p| p.kind == PieceKind::General) {
            self.outcome = Some(GameOutcome {
                winner: self.turn,
                reason: EndReason::GeneralCaptured,
            });
            return;
        }
        self.turn = self.turn.opposite();
    }

    /// Ends the game if the side to move has no legal response.
    fn check_no_moves(&mut self) {
        if self.legal_moves().is_empty() {
            self.outcome = Some(GameOutcome {
                winner: self.turn.opposite(),
                reason: EndReason::NoLegalMoves,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiangqi_core::Piece;

    fn mv(x1: u8, y1: u8, x2: u8, y2: u8) -> Move {
        Move::new(Square::at(x1, y1), Square::at(x2, y2))
    }

    #[test]
    fn new_game() {
        let game = GameSession::new();
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.turn(), Color::Red);
        assert!(!game.is_over());
        assert!(!game.is_check());
        assert_eq!(game.legal_moves().len(), 44);
    }

    #[test]
    fn play_records_and_flips_turn() {
        let mut game = GameSession::new();
        let record = game.play(mv(0, 9, 0, 7)).unwrap();
        assert_eq!(record.description, "Red Chariot (0,9)->(0,7)");
        assert_eq!(game.turn(), Color::Black);
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.last_move(), Some(&record));
        assert!(!is_in_check(game.board(), Color::Black));
    }

    #[test]
    fn illegal_move_is_rejected_without_change() {
        let mut game = GameSession::new();
        let result = game.play(mv(0, 9, 0, 4));
        assert_eq!(result, Err(GameError::IllegalMove(mv(0, 9, 0, 4))));
        // Moving the opponent's piece.
        assert!(game.play(mv(0, 0, 0, 1)).is_err());
        assert_eq!(game.ply_count(), 0);
        assert_eq!(game.board(), &Board::initial());
    }

    #[test]
    fn legal_targets_only_for_side_to_move() {
        let game = GameSession::new();
        assert_eq!(game.legal_targets(Square::at(0, 9)).len(), 2);
        assert!(game.legal_targets(Square::at(0, 0)).is_empty());
    }

    #[test]
    fn resign() {
        let mut game = GameSession::new();
        let outcome = game.resign(Color::Red).unwrap();
        assert_eq!(outcome.winner, Color::Black);
        assert_eq!(outcome.reason, EndReason::Resignation);
        assert!(game.is_over());
        assert_eq!(game.play(mv(0, 9, 0, 7)), Err(GameError::GameAlreadyOver));
        assert_eq!(game.resign(Color::Black), Err(GameError::GameAlreadyOver));
    }

    #[test]
    fn from_history_replays_and_derives_turn() {
        let mut game = GameSession::new();
        game.play(mv(0, 9, 0, 7)).unwrap();
        game.play(mv(0, 0, 0, 2)).unwrap();
        game.play(mv(1, 7, 4, 7)).unwrap();

        let replayed = GameSession::from_history(&game.history()[..2]).unwrap();
        assert_eq!(replayed.turn(), Color::Red);
        assert_eq!(replayed.ply_count(), 2);

        let replayed = GameSession::from_history(game.history()).unwrap();
        assert_eq!(replayed.turn(), Color::Black);
        assert_eq!(replayed.board(), game.board());
    }

    #[test]
    fn from_history_rejects_illegal_entries() {
        let mut game = GameSession::new();
        let record = game.play(mv(0, 9, 0, 7)).unwrap();
        // The same red move twice in a row is out of turn.
        let bad = vec![record.clone(), record];
        assert!(matches!(
            GameSession::from_history(&bad),
            Err(GameError::IllegalHistory { index: 1, .. })
        ));
    }

    #[test]
    fn capturing_the_general_ends_the_game() {
        // Replays never produce this through legal moves; push it directly to check
        // that the capture rule fires and the turn does not flip.
        let mut game = GameSession::new();
        game.board = Board::empty()
            .with(Square::at(3, 9), Some(Piece::new(PieceKind::General, Color::Red)))
            .with(Square::at(5, 0), Some(Piece::new(PieceKind::General, Color::Black)))
            .with(Square::at(5, 5), Some(Piece::new(PieceKind::Chariot, Color::Red)));
        let chariot = Piece::new(PieceKind::Chariot, Color::Red);
        let general = Piece::new(PieceKind::General, Color::Black);
        game.push(MoveRecord::new(chariot, mv(5, 5, 5, 0), Some(general)));
        assert_eq!(
            game.outcome(),
            Some(GameOutcome {
                winner: Color::Red,
                reason: EndReason::GeneralCaptured
            })
        );
        assert_eq!(game.turn(), Color::Red);
        assert_eq!(game.board().general_count(Color::Black), 0);
    }

    #[test]
    fn mate_ends_game() {
        let mut game = GameSession::new();
        game.board = Board::empty()
            .with(Square::at(4, 9), Some(Piece::new(PieceKind::General, Color::Red)))
            .with(Square::at(3, 0), Some(Piece::new(PieceKind::General, Color::Black)))
            .with(Square::at(8, 0), Some(Piece::new(PieceKind::Chariot, Color::Red)))
            .with(Square::at(8, 2), Some(Piece::new(PieceKind::Chariot, Color::Red)));
        game.play(mv(8, 2, 8, 1)).unwrap();
        assert_eq!(
            game.outcome(),
            Some(GameOutcome {
                winner: Color::Red,
                reason: EndReason::NoLegalMoves
            })
        );
        assert_eq!(game.turn(), Color::Black);
    }
}
