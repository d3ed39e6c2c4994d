//! Best-effort commentary on the player's moves.
//!
//! A [`CommentaryService`] is an external, synchronous collaborator. It is
//! called on the blocking pool under a timeout, and anything short of a
//! non-blank answer in time becomes [`PLACEHOLDER`]. Game state never waits
//! on it.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use xiangqi_core::Color;
use xiangqi_engine::{is_in_check, Board};

/// Shown whenever commentary is unavailable.
pub const PLACEHOLDER: &str = "The coach is quiet for now.";

/// Errors from a commentary request.
#[derive(Error, Debug)]
pub enum CommentaryError {
    #[error("commentary service failed: {0}")]
    Service(String),

    #[error("commentary timed out after {0:?}")]
    Timeout(Duration),

    #[error("commentary task failed: {0}")]
    Task(String),

    #[error("commentary service returned an empty answer")]
    Empty,
}

/// What the service is asked about: the position after the move, as a
/// board snapshot, and the move's description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentaryRequest {
    pub snapshot: String,
    pub last_move: String,
}

impl CommentaryRequest {
    pub fn new(board: &Board, last_move: impl Into<String>) -> Self {
        CommentaryRequest {
            snapshot: board.to_snapshot(),
            last_move: last_move.into(),
        }
    }
}

/// Produces a short remark about the latest move.
pub trait CommentaryService: Send + Sync + 'static {
    fn comment(&self, request: &CommentaryRequest) -> Result<String, CommentaryError>;
}

/// Asks `service` for commentary, bounded by `limit`.
pub async fn try_fetch_commentary(
    service: Arc<dyn CommentaryService>,
    request: CommentaryRequest,
    limit: Duration,
) -> Result<String, CommentaryError> {
    let task = tokio::task::spawn_blocking(move || service.comment(&request));
    let text = tokio::time::timeout(limit, task)
        .await
        .map_err(|_| CommentaryError::Timeout(limit))?
        .map_err(|e| CommentaryError::Task(e.to_string()))??;

    let text = text.trim();
    if text.is_empty() {
        return Err(CommentaryError::Empty);
    }
    Ok(text.to_string())
}

/// Like [`try_fetch_commentary`], but any failure yields [`PLACEHOLDER`].
pub async fn fetch_commentary(
    service: Arc<dyn CommentaryService>,
    request: CommentaryRequest,
    limit: Duration,
) -> String {
    match try_fetch_commentary(service, request, limit).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "commentary unavailable");
            PLACEHOLDER.to_string()
        }
    }
}

/// Rule-based commentary computed from the snapshot alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCommentary;

impl CommentaryService for LocalCommentary {
    fn comment(&self, request: &CommentaryRequest) -> Result<String, CommentaryError> {
        let board = Board::from_snapshot(&request.snapshot)
            .map_err(|e| CommentaryError::Service(e.to_string()))?;

        let text = if board.general(Color::Black).is_none() {
            format!("{}. The general has fallen!", request.last_move)
        } else if is_in_check(&board, Color::Black) {
            format!("{}. Check! Black must answer the threat.", request.last_move)
        } else if request.last_move.contains(" takes ") {
            format!("{}. Material won; make sure the piece is safe.", request.last_move)
        } else {
            format!("{}. A quiet move.", request.last_move)
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiangqi_core::{Move, Square};

    struct Fixed(&'static str);

    impl CommentaryService for Fixed {
        fn comment(&self, _: &CommentaryRequest) -> Result<String, CommentaryError> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl CommentaryService for Failing {
        fn comment(&self, _: &CommentaryRequest) -> Result<String, CommentaryError> {
            Err(CommentaryError::Service("connection refused".into()))
        }
    }

    struct Slow;

    impl CommentaryService for Slow {
        fn comment(&self, _: &CommentaryRequest) -> Result<String, CommentaryError> {
            std::thread::sleep(Duration::from_millis(200));
            Ok("too late".into())
        }
    }

    struct Panicking;

    impl CommentaryService for Panicking {
        fn comment(&self, _: &CommentaryRequest) -> Result<String, CommentaryError> {
            panic!("service crashed")
        }
    }

    fn request() -> CommentaryRequest {
        CommentaryRequest::new(&Board::initial(), "Red Chariot (0,9)->(0,7)")
    }

    const LIMIT: Duration = Duration::from_millis(500);

    #[tokio::test]
    async fn answer_is_trimmed() {
        let text = fetch_commentary(Arc::new(Fixed("  Solid.\n")), request(), LIMIT).await;
        assert_eq!(text, "Solid.");
    }

    #[tokio::test]
    async fn failures_degrade_to_placeholder() {
        assert_eq!(fetch_commentary(Arc::new(Failing), request(), LIMIT).await, PLACEHOLDER);
        assert_eq!(fetch_commentary(Arc::new(Fixed("   ")), request(), LIMIT).await, PLACEHOLDER);
        assert_eq!(fetch_commentary(Arc::new(Panicking), request(), LIMIT).await, PLACEHOLDER);
    }

    #[tokio::test]
    async fn timeout_degrades_to_placeholder() {
        let limit = Duration::from_millis(20);
        let result = try_fetch_commentary(Arc::new(Slow), request(), limit).await;
        assert!(matches!(result, Err(CommentaryError::Timeout(d)) if d == limit));
        assert_eq!(fetch_commentary(Arc::new(Slow), request(), limit).await, PLACEHOLDER);
    }

    #[test]
    fn local_commentary_kinds() {
        let quiet = LocalCommentary.comment(&request()).unwrap();
        assert!(quiet.ends_with("A quiet move."));

        // Red cannon jumps the black cannon to take the horse.
        let board = Board::initial().apply(Move::new(Square::at(1, 7), Square::at(1, 0)));
        let capture = CommentaryRequest::new(&board, "Red Cannon (1,7)->(1,0) takes Horse");
        assert!(LocalCommentary
            .comment(&capture)
            .unwrap()
            .contains("Material won"));

        // Red chariot on the open central file gives check.
        let board = Board::empty()
            .with(Square::at(4, 0), Board::initial().get(Square::at(4, 0)))
            .with(Square::at(3, 9), Board::initial().get(Square::at(4, 9)))
            .with(Square::at(4, 5), Board::initial().get(Square::at(0, 9)));
        let check = CommentaryRequest::new(&board, "Red Chariot (0,5)->(4,5)");
        assert!(LocalCommentary.comment(&check).unwrap().contains("Check!"));

        let bad = CommentaryRequest {
            snapshot: "garbage".into(),
            last_move: String::new(),
        };
        assert!(matches!(
            LocalCommentary.comment(&bad),
            Err(CommentaryError::Service(_))
        ));
    }
}
