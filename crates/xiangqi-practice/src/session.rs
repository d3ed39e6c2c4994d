//! Practice session host.
//!
//! Owns the controller, the rating store and the engine's random source.
//! The rating is loaded once at start and settled exactly once per finished
//! game.

use crate::controller::{
    AiOutcome, AiReply, AiRequest, ClickOutcome, Controller, FinishedGame, PressOutcome, HUMAN,
};
use crate::dispatch::{run_search, spawn_search, SearchHandle};
use crate::{PracticeConfig, PracticeError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use xiangqi_ai::{analyze_history, critical_index, MoveAnalysis, SearchEngine, SkillLevel};
use xiangqi_core::{Move, Square};
use xiangqi_engine::{reconstruct, GameError, ReplayFrame};
use xiangqi_rating::{rank_title, settle, RatingStore, RatingUpdate};

/// Depth used to grade the moves of a finished game.
const ANALYSIS_DEPTH: u8 = 2;

/// A finished game with its settled rating and move review.
#[derive(Debug, Clone)]
pub struct GameReport {
    pub game: FinishedGame,
    pub rating: RatingUpdate,
    /// False when the rating store rejected the new rating.
    pub saved: bool,
    pub analysis: Vec<MoveAnalysis>,
    /// The human's costliest move, if any move lost points.
    pub critical_index: Option<usize>,
}

pub struct PracticeSession<S: RatingStore> {
    controller: Controller,
    store: S,
    rating: i32,
    rng: StdRng,
    think_delay: Duration,
    /// Version of the game whose rating has been settled.
    settled_version: Option<u64>,
    last_report: Option<GameReport>,
}

impl<S: RatingStore> PracticeSession<S> {
    /// Starts a session, loading the rating from `store`.
    pub fn new(config: &PracticeConfig, store: S) -> Result<Self, PracticeError> {
        let rating = store.load()?.unwrap_or(config.initial_rating);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        tracing::info!(rating, rank = rank_title(rating), "practice session started");

        Ok(PracticeSession {
            controller: Controller::new(config.confirm_window()),
            store,
            rating,
            rng,
            think_delay: config.ai_delay(),
            settled_version: None,
            last_report: None,
        })
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn rating(&self) -> i32 {
        self.rating
    }

    pub fn rank(&self) -> &'static str {
        rank_title(self.rating)
    }

    /// Engine strength for the current rating.
    pub fn skill(&self) -> SkillLevel {
        SkillLevel::for_rating(self.rating)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Report of the most recently finished game.
    pub fn last_report(&self) -> Option<&GameReport> {
        self.last_report.as_ref()
    }

    /// Forwards a board click. A finishing move settles the game.
    pub fn click(&mut self, sq: Square) -> ClickOutcome {
        let outcome = self.controller.click(sq);
        self.settle_click(&outcome);
        outcome
    }

    /// Plays a typed move. See [`Controller::play_move`].
    pub fn play_move(&mut self, mov: Move) -> ClickOutcome {
        let outcome = self.controller.play_move(mov);
        self.settle_click(&outcome);
        outcome
    }

    fn settle_click(&mut self, outcome: &ClickOutcome) {
        if let ClickOutcome::Moved {
            finished: Some(game),
            ..
        } = outcome
        {
            self.finish(game.clone());
        }
    }

    pub fn press_restart(&mut self, now: Instant) -> PressOutcome {
        self.controller.press_restart(now)
    }

    /// Forwards a resign press. A confirmed resignation settles the game.
    pub fn press_resign(&mut self, now: Instant) -> PressOutcome {
        let outcome = self.controller.press_resign(now);
        if let PressOutcome::Resigned(game) = &outcome {
            self.finish(game.clone());
        }
        outcome
    }

    pub fn expire_confirm(&mut self, now: Instant) -> bool {
        self.controller.expire_confirm(now)
    }

    /// Spawns the engine's search if its turn is due. The reply goes back
    /// through [`PracticeSession::apply_ai_reply`], which drops it if the
    /// game was restarted or resigned in the meantime.
    pub fn start_ai_turn(&mut self) -> Option<SearchHandle> {
        let (request, engine, rng) = self.prepare_search()?;
        Some(spawn_search(request, engine, rng, self.think_delay))
    }

    /// Plays the engine's turn if it is due. Returns `None` when it is not.
    pub async fn run_ai_turn(&mut self) -> Result<Option<AiOutcome>, PracticeError> {
        let Some((request, engine, rng)) = self.prepare_search() else {
            return Ok(None);
        };
        let reply = run_search(request, engine, rng, self.think_delay).await?;
        self.apply_ai_reply(reply).map(Some)
    }

    fn prepare_search(&mut self) -> Option<(AiRequest, SearchEngine, StdRng)> {
        let request = self.controller.begin_ai_search()?;
        let engine = SearchEngine::new(self.skill().config());
        let rng = StdRng::seed_from_u64(self.rng.gen());
        Some((request, engine, rng))
    }

    /// Applies an engine reply, settling the game if it ended.
    pub fn apply_ai_reply(&mut self, reply: AiReply) -> Result<AiOutcome, PracticeError> {
        let outcome = self.controller.resolve_ai(reply)?;
        match &outcome {
            AiOutcome::Moved {
                finished: Some(game),
                ..
            }
            | AiOutcome::GameOver(game) => self.finish(game.clone()),
            _ => {}
        }
        Ok(outcome)
    }

    /// Settles the rating and reviews the game, once per game version.
    ///
    /// The report is recorded before the rating is saved; a failed save is
    /// logged and flagged on the report.
    fn finish(&mut self, game: FinishedGame) {
        let version = self.controller.version();
        if self.settled_version == Some(version) {
            return;
        }
        let update = settle(self.rating, game.player_result().into());
        self.rating = update.after;
        self.settled_version = Some(version);

        let saved = match self.store.save(self.rating) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, rating = self.rating, "rating not saved");
                false
            }
        };

        let analysis = analyze_history(&game.history, ANALYSIS_DEPTH);
        let critical = critical_index(&analysis, HUMAN);
        tracing::info!(
            result = ?game.player_result(),
            change = update.change,
            rating = update.after,
            rank = rank_title(update.after),
            "game settled"
        );
        self.last_report = Some(GameReport {
            game,
            rating: update,
            saved,
            analysis,
            critical_index: critical,
        });
    }

    fn reviewed(&self) -> Result<&FinishedGame, PracticeError> {
        self.last_report
            .as_ref()
            .map(|r| &r.game)
            .ok_or(PracticeError::NoFinishedGame)
    }

    /// Index shown by default in the review: the critical move, else the last.
    pub fn review_index(&self) -> Result<usize, PracticeError> {
        let report = self.last_report.as_ref().ok_or(PracticeError::NoFinishedGame)?;
        Ok(report
            .critical_index
            .unwrap_or(report.game.history.len().saturating_sub(1)))
    }

    /// Before and after boards around move `index` of the last finished game.
    pub fn replay(&self, index: usize) -> Result<ReplayFrame, PracticeError> {
        Ok(reconstruct(&self.reviewed()?.history, index)?)
    }

    /// Starts a new practice game from the last finished game, seeded with
    /// every move strictly before `index`. `index` must name a played move.
    pub fn practice_from(&mut self, index: usize) -> Result<(), PracticeError> {
        let history = &self.reviewed()?.history;
        if index >= history.len() {
            return Err(GameError::IndexOutOfRange {
                index,
                len: history.len(),
            }
            .into());
        }
        let game = xiangqi_engine::practice_from(history, index)?;
        self.controller.reseed(game);
        tracing::debug!(index, "practice game seeded");
        Ok(())
    }

    /// Abandons the current game for a fresh one.
    pub fn new_game(&mut self) {
        self.controller.new_session();
    }
}
