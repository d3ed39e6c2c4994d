use thiserror::Error;
use xiangqi_engine::GameError;
use xiangqi_rating::StoreError;

/// Errors from driving a practice session.
#[derive(Error, Debug)]
pub enum PracticeError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("rating store: {0}")]
    Store(#[from] StoreError),

    #[error("engine search task failed: {0}")]
    SearchTask(String),

    #[error("engine returned no move while the game is still running")]
    EngineWithoutMove,

    #[error("no finished game to review")]
    NoFinishedGame,
}
