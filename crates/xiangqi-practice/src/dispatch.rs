//! Runs engine searches off the interactive path.
//!
//! The search itself is synchronous and CPU bound, so it goes to tokio's
//! blocking pool. The reply carries the version of the request it answers;
//! the controller decides whether it still applies.

use crate::controller::{AiReply, AiRequest};
use crate::PracticeError;
use rand::rngs::StdRng;
use std::time::Duration;
use tokio::task::JoinHandle;
use xiangqi_ai::SearchEngine;

/// A spawned engine search.
pub type SearchHandle = JoinHandle<Result<AiReply, PracticeError>>;

/// Waits `think_delay`, then searches `request` on the blocking pool.
pub async fn run_search(
    request: AiRequest,
    engine: SearchEngine,
    mut rng: StdRng,
    think_delay: Duration,
) -> Result<AiReply, PracticeError> {
    if !think_delay.is_zero() {
        tokio::time::sleep(think_delay).await;
    }

    let result = tokio::task::spawn_blocking(move || {
        engine.choose_move(&request.board, request.side, &mut rng)
    })
    .await
    .map_err(|e| PracticeError::SearchTask(e.to_string()))?;

    Ok(AiReply {
        version: request.version,
        mov: result.as_ref().map(|r| r.chosen.mov),
        score: result.as_ref().map(|r| r.chosen.score),
        nodes: result.as_ref().map_or(0, |r| r.nodes),
    })
}

/// Spawns [`run_search`] as a task so the caller can keep handling input.
pub fn spawn_search(
    request: AiRequest,
    engine: SearchEngine,
    rng: StdRng,
    think_delay: Duration,
) -> SearchHandle {
    tokio::spawn(run_search(request, engine, rng, think_delay))
}
