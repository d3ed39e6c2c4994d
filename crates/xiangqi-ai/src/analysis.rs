//! Move quality classification and game analysis.

use crate::search::{SearchConfig, SearchEngine, Searcher};
use serde::{Deserialize, Serialize};
use xiangqi_core::{Color, MoveRecord};
use xiangqi_engine::Board;

/// Classification of a move by the points it gave away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveQuality {
    /// No loss against the best move found.
    Best,
    /// Loss of at most 10 points.
    Good,
    /// Loss of at most 30 points.
    Inaccuracy,
    /// Loss of at most 80 points.
    Mistake,
    /// Loss above 80 points.
    Blunder,
}

impl MoveQuality {
    /// Classifies a move by its loss in evaluation points.
    pub const fn from_loss(loss: i32) -> Self {
        if loss <= 0 {
            MoveQuality::Best
        } else if loss <= 10 {
            MoveQuality::Good
        } else if loss <= 30 {
            MoveQuality::Inaccuracy
        } else if loss <= 80 {
            MoveQuality::Mistake
        } else {
            MoveQuality::Blunder
        }
    }
}

/// Analysis result for a single move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveAnalysis {
    /// Position of the move in the history.
    pub index: usize,
    /// Side that played it.
    pub color: Color,
    /// Recorded description of the move.
    pub description: String,
    /// Score of the best move found, from the mover's perspective.
    pub best_score: i32,
    /// Score of the move played, from the mover's perspective.
    pub played_score: i32,
    /// Points lost against the best move.
    pub loss: i32,
    pub quality: MoveQuality,
}

/// Statistics for one side over an analyzed game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub total_moves: u32,
    pub best_moves: u32,
    pub good_moves: u32,
    pub inaccuracies: u32,
    pub mistakes: u32,
    pub blunders: u32,
    /// Average loss per move.
    pub avg_loss: f64,
}

impl PlayerStats {
    /// Aggregates the analyzed moves of `color`.
    pub fn from_moves(analysis: &[MoveAnalysis], color: Color) -> Self {
        let mut stats = PlayerStats::default();
        let mut total_loss: i64 = 0;
        for m in analysis.iter().filter(|m| m.color == color) {
            stats.total_moves += 1;
            total_loss += i64::from(m.loss);
            match m.quality {
                MoveQuality::Best => stats.best_moves += 1,
                MoveQuality::Good => stats.good_moves += 1,
                MoveQuality::Inaccuracy => stats.inaccuracies += 1,
                MoveQuality::Mistake => stats.mistakes += 1,
                MoveQuality::Blunder => stats.blunders += 1,
            }
        }
        if stats.total_moves > 0 {
            stats.avg_loss = total_loss as f64 / f64::from(stats.total_moves);
        }
        stats
    }
}

/// Scores every move of `history` against the best alternative at `depth`.
///
/// Positions are rebuilt by folding the history from the initial setup. The
/// loss of a move is the gap between the best root score and the played
/// move's score, both seen from the mover's side, and never negative.
pub fn analyze_history(history: &[MoveRecord], depth: u8) -> Vec<MoveAnalysis> {
    let engine = SearchEngine::new(SearchConfig {
        depth: depth.max(1),
        random_factor: 0.0,
    });
    let mut board = Board::initial();
    let mut analysis = Vec::with_capacity(history.len());

    for (index, record) in history.iter().enumerate() {
        let sign = match record.color {
            Color::Black => 1,
            Color::Red => -1,
        };
        let (ranked, _) = engine.rank_moves(&board, record.color);
        let played = board.apply(record.mov());

        let best_score = ranked.first().map_or(0, |m| sign * m.score);
        let played_score = match ranked.iter().find(|m| m.mov == record.mov()) {
            Some(m) => sign * m.score,
            None => {
                sign * Searcher::new().minimax(
                    &played,
                    engine.config().depth - 1,
                    i32::MIN,
                    i32::MAX,
                    record.color == Color::Red,
                )
            }
        };
        let loss = (best_score - played_score).max(0);

        analysis.push(MoveAnalysis {
            index,
            color: record.color,
            description: record.description.clone(),
            best_score,
            played_score,
            loss,
            quality: MoveQuality::from_loss(loss),
        });
        board = played;
    }

    tracing::debug!(moves = analysis.len(), depth, "history analyzed");
    analysis
}

/// Index of the costliest move played by `color`, or `None` if every one of
/// its moves was the best available. Ties resolve to the earliest move.
pub fn critical_index(analysis: &[MoveAnalysis], color: Color) -> Option<usize> {
    analysis
        .iter()
        .filter(|m| m.color == color && m.loss > 0)
        .fold(None::<&MoveAnalysis>, |worst, m| match worst {
            Some(w) if w.loss >= m.loss => Some(w),
            _ => Some(m),
        })
        .map(|m| m.index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiangqi_core::{Move, Square};
    use xiangqi_engine::GameSession;

    fn mv(x1: u8, y1: u8, x2: u8, y2: u8) -> Move {
        Move::new(Square::at(x1, y1), Square::at(x2, y2))
    }

    fn analyzed(index: usize, color: Color, loss: i32) -> MoveAnalysis {
        MoveAnalysis {
            index,
            color,
            description: String::new(),
            best_score: 0,
            played_score: -loss,
            loss,
            quality: MoveQuality::from_loss(loss),
        }
    }

    #[test]
    fn quality_thresholds() {
        assert_eq!(MoveQuality::from_loss(0), MoveQuality::Best);
        assert_eq!(MoveQuality::from_loss(1), MoveQuality::Good);
        assert_eq!(MoveQuality::from_loss(10), MoveQuality::Good);
        assert_eq!(MoveQuality::from_loss(11), MoveQuality::Inaccuracy);
        assert_eq!(MoveQuality::from_loss(30), MoveQuality::Inaccuracy);
        assert_eq!(MoveQuality::from_loss(80), MoveQuality::Mistake);
        assert_eq!(MoveQuality::from_loss(81), MoveQuality::Blunder);
    }

    #[test]
    fn ignoring_a_hanging_cannon_is_a_mistake() {
        let mut game = GameSession::new();
        // Red cannon takes the horse, then black ignores the intruder.
        game.play(mv(1, 7, 1, 0)).unwrap();
        game.play(mv(7, 2, 6, 2)).unwrap();

        let analysis = analyze_history(game.history(), 1);
        assert_eq!(analysis.len(), 2);
        assert_eq!(analysis[0].color, Color::Red);
        assert_eq!(analysis[0].quality, MoveQuality::Best);
        assert_eq!(analysis[0].loss, 0);
        // Black could have taken the cannon with its chariot.
        assert_eq!(analysis[1].color, Color::Black);
        assert!(analysis[1].loss >= 45);
        assert!(analysis[1].quality >= MoveQuality::Mistake);
    }

    #[test]
    fn losses_are_never_negative() {
        let mut game = GameSession::new();
        game.play(mv(7, 7, 4, 7)).unwrap();
        game.play(mv(7, 0, 6, 2)).unwrap();
        game.play(mv(7, 9, 6, 7)).unwrap();
        for m in analyze_history(game.history(), 2) {
            assert!(m.loss >= 0);
            assert!(m.best_score >= m.played_score);
        }
    }

    #[test]
    fn critical_index_picks_worst_move_of_color() {
        let analysis = vec![
            analyzed(0, Color::Red, 5),
            analyzed(1, Color::Black, 200),
            analyzed(2, Color::Red, 60),
            analyzed(3, Color::Black, 0),
            analyzed(4, Color::Red, 60),
        ];
        assert_eq!(critical_index(&analysis, Color::Red), Some(2));
        assert_eq!(critical_index(&analysis, Color::Black), Some(1));
    }

    #[test]
    fn critical_index_none_when_all_best() {
        let analysis = vec![analyzed(0, Color::Red, 0), analyzed(1, Color::Black, 10)];
        assert_eq!(critical_index(&analysis, Color::Red), None);
        assert_eq!(critical_index(&[], Color::Black), None);
    }

    #[test]
    fn player_stats() {
        let analysis = vec![
            analyzed(0, Color::Red, 0),
            analyzed(1, Color::Black, 100),
            analyzed(2, Color::Red, 20),
            analyzed(4, Color::Red, 40),
        ];
        let red = PlayerStats::from_moves(&analysis, Color::Red);
        assert_eq!(red.total_moves, 3);
        assert_eq!(red.best_moves, 1);
        assert_eq!(red.inaccuracies, 1);
        assert_eq!(red.mistakes, 1);
        assert_eq!(red.avg_loss, 20.0);

        let black = PlayerStats::from_moves(&analysis, Color::Black);
        assert_eq!(black.blunders, 1);
        assert_eq!(PlayerStats::from_moves(&[], Color::Red), PlayerStats::default());
    }
}
