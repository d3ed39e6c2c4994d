//! Game controller: the interaction state machine for one human-vs-engine game.
//!
//! The human plays red, the engine black. Every input is an explicit command
//! (`click`, `press_restart`, `press_resign`, `resolve_ai`) and every command
//! returns what happened; nothing advances on its own. Time enters only
//! through the `now` argument of the confirm commands.
//!
//! Engine turns are split in two so the search can run elsewhere:
//! [`Controller::begin_ai_search`] hands out a request stamped with the
//! session version, and [`Controller::resolve_ai`] applies the reply only if
//! that version is still current. Restarting, resigning or starting a new
//! session bumps the version, which turns any reply still in flight stale.

use crate::PracticeError;
use serde::Serialize;
use std::time::{Duration, Instant};
use xiangqi_core::{Color, Move, MoveRecord, Square};
use xiangqi_engine::{Board, EndReason, GameError, GameOutcome, GameSession};
use xiangqi_rating::MatchResult;

/// Side played by the human.
pub const HUMAN: Color = Color::Red;
/// Side played by the engine.
pub const ENGINE: Color = Color::Black;

/// How long a first restart or resign press stays armed.
pub const DEFAULT_CONFIRM_WINDOW: Duration = Duration::from_secs(3);

/// Interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    AwaitingPlayerMove,
    PlayerPieceSelected(Square),
    AiThinking,
    GameOver,
}

/// Which destructive action is waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    Restart,
    Resign,
}

#[derive(Debug, Clone, Copy)]
struct PendingConfirm {
    kind: ConfirmKind,
    armed_at: Instant,
}

/// Result of a finished game from the human's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerResult {
    Win,
    Loss,
}

impl From<PlayerResult> for MatchResult {
    fn from(result: PlayerResult) -> Self {
        match result {
            PlayerResult::Win => MatchResult::Win,
            PlayerResult::Loss => MatchResult::Loss,
        }
    }
}

/// A finished game: who won, why, and every move played.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinishedGame {
    pub winner: Color,
    pub reason: EndReason,
    pub history: Vec<MoveRecord>,
}

impl FinishedGame {
    fn from_session(outcome: GameOutcome, game: &GameSession) -> Self {
        FinishedGame {
            winner: outcome.winner,
            reason: outcome.reason,
            history: game.history().to_vec(),
        }
    }

    /// The human's result.
    pub fn player_result(&self) -> PlayerResult {
        if self.winner == HUMAN {
            PlayerResult::Win
        } else {
            PlayerResult::Loss
        }
    }
}

/// What a board click did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// An own piece is now selected; `targets` are its legal destinations.
    Selected { from: Square, targets: Vec<Square> },
    /// The selected piece moved.
    Moved {
        record: MoveRecord,
        finished: Option<FinishedGame>,
    },
    /// Not a legal move. `selection` is what remains selected afterwards.
    Rejected { selection: Option<Square> },
    /// The click was not accepted in the current state.
    Ignored,
}

/// What a restart or resign press did.
#[derive(Debug, Clone, PartialEq)]
pub enum PressOutcome {
    /// First press; a second press of the same kind inside the window confirms.
    Armed(ConfirmKind),
    Restarted,
    Resigned(FinishedGame),
    Ignored,
}

/// A search job for the engine side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiRequest {
    pub version: u64,
    pub board: Board,
    pub side: Color,
}

/// The engine's answer to an [`AiRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiReply {
    pub version: u64,
    /// `None` when the engine side had no legal move.
    pub mov: Option<Move>,
    pub score: Option<i32>,
    pub nodes: u64,
}

/// What resolving an engine reply did.
#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome {
    Moved {
        record: MoveRecord,
        finished: Option<FinishedGame>,
    },
    GameOver(FinishedGame),
    /// The reply belongs to an older session version and was discarded.
    Stale,
}

/// Drives one practice game.
#[derive(Debug, Clone)]
pub struct Controller {
    game: GameSession,
    /// Game as it was seeded; restarts return here.
    seed: GameSession,
    state: ControllerState,
    confirm: Option<PendingConfirm>,
    confirm_window: Duration,
    version: u64,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_WINDOW)
    }
}

impl Controller {
    /// Starts a game from the initial setup.
    pub fn new(confirm_window: Duration) -> Self {
        Self::from_game(GameSession::new(), confirm_window, 0)
    }

    /// Starts a practice game seeded with `prefix`, replayed from the initial
    /// setup. The side to move follows the prefix length parity.
    pub fn from_prefix(prefix: &[MoveRecord], confirm_window: Duration) -> Result<Self, GameError> {
        Ok(Self::from_game(GameSession::from_history(prefix)?, confirm_window, 0))
    }

    fn from_game(game: GameSession, confirm_window: Duration, version: u64) -> Self {
        let state = Self::resting_state(&game);
        Controller {
            seed: game.clone(),
            game,
            state,
            confirm: None,
            confirm_window,
            version,
        }
    }

    fn resting_state(game: &GameSession) -> ControllerState {
        if game.is_over() {
            ControllerState::GameOver
        } else if game.turn() == ENGINE {
            ControllerState::AiThinking
        } else {
            ControllerState::AwaitingPlayerMove
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Current session version. Changes on restart, resignation and new session.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn game(&self) -> &GameSession {
        &self.game
    }

    pub fn board(&self) -> &Board {
        self.game.board()
    }

    pub fn history(&self) -> &[MoveRecord] {
        self.game.history()
    }

    /// Number of moves the game was seeded with.
    pub fn seed_len(&self) -> usize {
        self.seed.ply_count()
    }

    pub fn selected(&self) -> Option<Square> {
        match self.state {
            ControllerState::PlayerPieceSelected(from) => Some(from),
            _ => None,
        }
    }

    /// The armed confirmation, if any.
    pub fn pending_confirm(&self) -> Option<ConfirmKind> {
        self.confirm.map(|c| c.kind)
    }

    /// The finished game, once it is over.
    pub fn finished(&self) -> Option<FinishedGame> {
        self.game
            .outcome()
            .map(|outcome| FinishedGame::from_session(outcome, &self.game))
    }

    /// Squares to highlight for the piece on `from`.
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        if self.accepts_clicks() {
            self.game.legal_targets(from)
        } else {
            Vec::new()
        }
    }

    fn accepts_clicks(&self) -> bool {
        matches!(
            self.state,
            ControllerState::AwaitingPlayerMove | ControllerState::PlayerPieceSelected(_)
        ) && self.game.turn() == HUMAN
    }

    /// Handles a click on `sq`.
    pub fn click(&mut self, sq: Square) -> ClickOutcome {
        if !self.accepts_clicks() {
            return ClickOutcome::Ignored;
        }

        let clicked = self.board().get(sq);
        if clicked.is_some_and(|p| p.color == HUMAN) {
            self.state = ControllerState::PlayerPieceSelected(sq);
            let targets = self.game.legal_targets(sq);
            tracing::debug!(%sq, targets = targets.len(), "piece selected");
            return ClickOutcome::Selected { from: sq, targets };
        }

        let Some(from) = self.selected() else {
            return ClickOutcome::Rejected { selection: None };
        };

        match self.game.play(Move::new(from, sq)) {
            Ok(record) => {
                let finished = self.after_move();
                tracing::debug!(%record, state = ?self.state, "player moved");
                ClickOutcome::Moved { record, finished }
            }
            Err(_) if clicked.is_none() => {
                self.state = ControllerState::AwaitingPlayerMove;
                ClickOutcome::Rejected { selection: None }
            }
            Err(_) => ClickOutcome::Rejected {
                selection: Some(from),
            },
        }
    }

    /// Plays `mov` as a select then target click pair.
    ///
    /// Rejected without touching the current selection unless `mov.from`
    /// holds one of the player's pieces, so an earlier selection can never
    /// stand in for the requested piece.
    pub fn play_move(&mut self, mov: Move) -> ClickOutcome {
        if !self.accepts_clicks() {
            return ClickOutcome::Ignored;
        }
        if !self.board().get(mov.from).is_some_and(|p| p.color == HUMAN) {
            return ClickOutcome::Rejected {
                selection: self.selected(),
            };
        }
        self.click(mov.from);
        self.click(mov.to)
    }

    /// Settles the state after any applied move.
    fn after_move(&mut self) -> Option<FinishedGame> {
        self.state = Self::resting_state(&self.game);
        let finished = self.finished();
        if let Some(game) = &finished {
            tracing::info!(winner = %game.winner, reason = ?game.reason, moves = game.history.len(), "game over");
        }
        finished
    }

    /// Hands out the search job for the engine's turn, if it is the engine's turn.
    pub fn begin_ai_search(&self) -> Option<AiRequest> {
        (self.state == ControllerState::AiThinking).then(|| AiRequest {
            version: self.version,
            board: *self.game.board(),
            side: ENGINE,
        })
    }

    /// Applies an engine reply produced for session `reply.version`.
    pub fn resolve_ai(&mut self, reply: AiReply) -> Result<AiOutcome, PracticeError> {
        if reply.version != self.version || self.state != ControllerState::AiThinking {
            tracing::warn!(
                reply = reply.version,
                current = self.version,
                "discarding stale engine reply"
            );
            return Ok(AiOutcome::Stale);
        }

        let Some(mov) = reply.mov else {
            // Only reachable when the session already ended on the engine's turn.
            return self
                .finished()
                .map(AiOutcome::GameOver)
                .ok_or(PracticeError::EngineWithoutMove);
        };

        let record = self.game.play(mov)?;
        let finished = self.after_move();
        tracing::debug!(%record, score = ?reply.score, nodes = reply.nodes, "engine moved");
        Ok(AiOutcome::Moved { record, finished })
    }

    /// First press arms a restart; a second press inside the window restarts
    /// from the seeded position. A finished game restarts at once.
    pub fn press_restart(&mut self, now: Instant) -> PressOutcome {
        if self.state != ControllerState::GameOver && !self.confirm(ConfirmKind::Restart, now) {
            return PressOutcome::Armed(ConfirmKind::Restart);
        }
        self.restart();
        PressOutcome::Restarted
    }

    /// First press arms a resignation; a second press inside the window resigns.
    pub fn press_resign(&mut self, now: Instant) -> PressOutcome {
        if self.state == ControllerState::GameOver {
            return PressOutcome::Ignored;
        }
        if !self.confirm(ConfirmKind::Resign, now) {
            return PressOutcome::Armed(ConfirmKind::Resign);
        }
        match self.game.resign(HUMAN) {
            Ok(_) => {
                self.version += 1;
                match self.after_move() {
                    Some(finished) => PressOutcome::Resigned(finished),
                    None => PressOutcome::Ignored,
                }
            }
            Err(_) => PressOutcome::Ignored,
        }
    }

    /// Returns true when the press confirms an armed action of the same kind.
    /// Otherwise (re)arms `kind` at `now`.
    fn confirm(&mut self, kind: ConfirmKind, now: Instant) -> bool {
        match self.confirm {
            Some(pending)
                if pending.kind == kind
                    && now.saturating_duration_since(pending.armed_at) <= self.confirm_window =>
            {
                self.confirm = None;
                true
            }
            _ => {
                self.confirm = Some(PendingConfirm {
                    kind,
                    armed_at: now,
                });
                tracing::debug!(?kind, "confirmation armed");
                false
            }
        }
    }

    /// Disarms a pending confirmation once its window has passed. Returns true
    /// if one was disarmed.
    pub fn expire_confirm(&mut self, now: Instant) -> bool {
        match self.confirm {
            Some(pending) if now.saturating_duration_since(pending.armed_at) > self.confirm_window => {
                self.confirm = None;
                true
            }
            _ => false,
        }
    }

    fn restart(&mut self) {
        *self = Self::from_game(self.seed.clone(), self.confirm_window, self.version + 1);
        tracing::debug!(version = self.version, seeded = self.seed_len(), "game restarted");
    }

    /// Replaces the game with a fresh one from the initial setup.
    pub fn new_session(&mut self) {
        *self = Self::from_game(GameSession::new(), self.confirm_window, self.version + 1);
    }

    /// Replaces the game with `game`, which restarts will return to.
    pub fn reseed(&mut self, game: GameSession) {
        *self = Self::from_game(game, self.confirm_window, self.version + 1);
    }
}
