//! Minimax search with alpha-beta pruning.
//!
//! Scores are always from black's point of view: black maximizes, red
//! minimizes. Each root move is searched with a fresh full window so every
//! candidate carries an exact score; that keeps the ranking usable for the
//! randomized pick among the best few moves.

use crate::evaluation::evaluate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use xiangqi_core::{Color, Move};
use xiangqi_engine::{generate_moves, Board};

/// Score of a side with no legal moves, seen from the other side.
pub const WIN_SCORE: i32 = 100_000;

/// Number of top-ranked moves eligible for a randomized pick.
const RANDOM_POOL: usize = 5;

/// Search settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Plies searched from the root, counting the root move itself.
    pub depth: u8,
    /// Probability of picking uniformly among the top moves instead of the best.
    pub random_factor: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 3,
            random_factor: 0.0,
        }
    }
}

/// A root move with its search score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredMove {
    pub mov: Move,
    pub score: i32,
}

/// Outcome of a move choice.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The move to play.
    pub chosen: ScoredMove,
    /// Every legal root move, best first for the searching side.
    pub ranked: Vec<ScoredMove>,
    /// Nodes visited below the root.
    pub nodes: u64,
    /// True if the move was drawn from the top candidates rather than taken as best.
    pub randomized: bool,
}

/// Search state.
#[derive(Debug, Default)]
pub struct Searcher {
    nodes: u64,
}

impl Searcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Alpha-beta minimax. `maximizing` means black is to move on `board`.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 {
            return evaluate(board);
        }

        let side = if maximizing { Color::Black } else { Color::Red };
        let moves = generate_moves(board, side);
        if moves.is_empty() {
            return if maximizing { -WIN_SCORE } else { WIN_SCORE };
        }

        if maximizing {
            let mut best = i32::MIN;
            for mov in &moves {
                let score = self.minimax(&board.apply(*mov), depth - 1, alpha, beta, false);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for mov in &moves {
                let score = self.minimax(&board.apply(*mov), depth - 1, alpha, beta, true);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }

    /// Plain minimax over the full tree. Returns the same value as
    /// [`Searcher::minimax`] with an open window; useful for checking pruning.
    pub fn minimax_full_width(&mut self, board: &Board, depth: u8, maximizing: bool) -> i32 {
        self.nodes += 1;

        if depth == 0 {
            return evaluate(board);
        }

        let side = if maximizing { Color::Black } else { Color::Red };
        let moves = generate_moves(board, side);
        if moves.is_empty() {
            return if maximizing { -WIN_SCORE } else { WIN_SCORE };
        }

        let scores = moves
            .iter()
            .map(|mov| self.minimax_full_width(&board.apply(*mov), depth - 1, !maximizing));
        if maximizing {
            scores.max().unwrap_or(-WIN_SCORE)
        } else {
            scores.min().unwrap_or(WIN_SCORE)
        }
    }
}

/// Ranks and chooses moves at a fixed depth.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        SearchEngine { config }
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    /// Scores every legal move of `side`, best first for `side`.
    ///
    /// The sort is stable, so equal scores keep move generation order
    /// (captures of valuable pieces first).
    pub fn rank_moves(&self, board: &Board, side: Color) -> (Vec<ScoredMove>, u64) {
        let depth = self.config.depth.max(1);
        let mut searcher = Searcher::new();
        let child_maximizing = side == Color::Red;

        let mut ranked: Vec<ScoredMove> = generate_moves(board, side)
            .iter()
            .map(|mov| ScoredMove {
                mov: *mov,
                score: searcher.minimax(
                    &board.apply(*mov),
                    depth - 1,
                    i32::MIN,
                    i32::MAX,
                    child_maximizing,
                ),
            })
            .collect();

        match side {
            Color::Black => ranked.sort_by_key(|m| std::cmp::Reverse(m.score)),
            Color::Red => ranked.sort_by_key(|m| m.score),
        }
        (ranked, searcher.nodes())
    }

    /// Picks a move for `side`, or `None` if it has no legal move.
    ///
    /// With probability `random_factor`, and when more than one move exists,
    /// the pick is uniform over the best five (or fewer) moves.
    pub fn choose_move<R: Rng + ?Sized>(
        &self,
        board: &Board,
        side: Color,
        rng: &mut R,
    ) -> Option<SearchResult> {
        let (ranked, nodes) = self.rank_moves(board, side);
        if ranked.is_empty() {
            tracing::debug!(%side, "no legal moves to search");
            return None;
        }

        let p = self.config.random_factor.clamp(0.0, 1.0);
        let randomized = ranked.len() > 1 && p > 0.0 && rng.gen_bool(p);
        let index = if randomized {
            rng.gen_range(0..ranked.len().min(RANDOM_POOL))
        } else {
            0
        };
        let chosen = ranked[index];

        tracing::debug!(
            %side,
            depth = self.config.depth,
            nodes,
            candidates = ranked.len(),
            chosen = %chosen.mov,
            score = chosen.score,
            randomized,
            "search complete"
        );

        Some(SearchResult {
            chosen,
            ranked,
            nodes,
            randomized,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use xiangqi_core::{Piece, PieceKind, Square};

    fn mv(x1: u8, y1: u8, x2: u8, y2: u8) -> Move {
        Move::new(Square::at(x1, y1), Square::at(x2, y2))
    }

    fn place(board: Board, x: u8, y: u8, kind: PieceKind, color: Color) -> Board {
        board.with(Square::at(x, y), Some(Piece::new(kind, color)))
    }

    /// Black to move can take an undefended red chariot with its own chariot.
    fn hanging_chariot() -> Board {
        let board = place(Board::empty(), 3, 9, PieceKind::General, Color::Red);
        let board = place(board, 5, 0, PieceKind::General, Color::Black);
        let board = place(board, 0, 0, PieceKind::Chariot, Color::Black);
        place(board, 0, 6, PieceKind::Chariot, Color::Red)
    }

    #[test]
    fn depth_zero_is_static_evaluation() {
        let board = Board::initial();
        let mut searcher = Searcher::new();
        assert_eq!(searcher.minimax(&board, 0, i32::MIN, i32::MAX, true), 0);
        assert_eq!(searcher.nodes(), 1);
    }

    #[test]
    fn side_without_moves_scores_as_lost() {
        // Black general boxed in by two red chariots.
        let board = place(Board::empty(), 4, 9, PieceKind::General, Color::Red);
        let board = place(board, 3, 0, PieceKind::General, Color::Black);
        let board = place(board, 8, 0, PieceKind::Chariot, Color::Red);
        let board = place(board, 8, 1, PieceKind::Chariot, Color::Red);
        let mut searcher = Searcher::new();
        assert_eq!(searcher.minimax(&board, 2, i32::MIN, i32::MAX, true), -WIN_SCORE);
    }

    #[test]
    fn takes_hanging_chariot() {
        let engine = SearchEngine::new(SearchConfig {
            depth: 2,
            random_factor: 0.0,
        });
        let mut rng = StdRng::seed_from_u64(1);
        let result = engine
            .choose_move(&hanging_chariot(), Color::Black, &mut rng)
            .unwrap();
        assert_eq!(result.chosen.mov, mv(0, 0, 0, 6));
        assert!(!result.randomized);
        assert!(result.nodes > 0);
    }

    #[test]
    fn ranking_is_sorted_for_each_side() {
        let engine = SearchEngine::new(SearchConfig {
            depth: 1,
            random_factor: 0.0,
        });
        let board = Board::initial();

        let (black, _) = engine.rank_moves(&board, Color::Black);
        assert_eq!(black.len(), 44);
        assert!(black.windows(2).all(|w| w[0].score >= w[1].score));

        let (red, _) = engine.rank_moves(&board, Color::Red);
        assert_eq!(red.len(), 44);
        assert!(red.windows(2).all(|w| w[0].score <= w[1].score));
        // Either cannon taking a horse wins material for red.
        assert_eq!(red[0].score, -40);
    }

    #[test]
    fn zero_random_factor_is_deterministic() {
        let engine = SearchEngine::new(SearchConfig {
            depth: 2,
            random_factor: 0.0,
        });
        let board = Board::initial();
        let first = engine
            .choose_move(&board, Color::Black, &mut StdRng::seed_from_u64(1))
            .unwrap();
        let second = engine
            .choose_move(&board, Color::Black, &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(first.chosen, second.chosen);
        assert_eq!(first.chosen, first.ranked[0]);
    }

    #[test]
    fn full_random_factor_stays_in_top_five() {
        let engine = SearchEngine::new(SearchConfig {
            depth: 1,
            random_factor: 1.0,
        });
        let board = Board::initial();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let result = engine.choose_move(&board, Color::Black, &mut rng).unwrap();
            assert!(result.randomized);
            assert!(result.ranked[..5].contains(&result.chosen));
        }
    }

    #[test]
    fn single_move_is_never_randomized() {
        // Black general in check on (3,0): (4,0) stays on the chariot's row
        // and faces the red general, leaving (3,1) as the only escape.
        let board = place(Board::empty(), 4, 9, PieceKind::General, Color::Red);
        let board = place(board, 3, 0, PieceKind::General, Color::Black);
        let board = place(board, 8, 0, PieceKind::Chariot, Color::Red);
        let engine = SearchEngine::new(SearchConfig {
            depth: 1,
            random_factor: 1.0,
        });
        let result = engine
            .choose_move(&board, Color::Black, &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(result.ranked.len(), 1);
        assert_eq!(result.chosen.mov, mv(3, 0, 3, 1));
        assert!(!result.randomized);
    }

    #[test]
    fn no_moves_returns_none() {
        let board = place(Board::empty(), 4, 9, PieceKind::General, Color::Red);
        let board = place(board, 3, 0, PieceKind::General, Color::Black);
        let board = place(board, 8, 0, PieceKind::Chariot, Color::Red);
        let board = place(board, 8, 1, PieceKind::Chariot, Color::Red);
        let engine = SearchEngine::default();
        assert!(engine
            .choose_move(&board, Color::Black, &mut StdRng::seed_from_u64(0))
            .is_none());
    }

    #[test]
    fn pruning_matches_full_width() {
        let board = hanging_chariot();
        let mut pruned = Searcher::new();
        let mut full = Searcher::new();
        assert_eq!(
            pruned.minimax(&board, 3, i32::MIN, i32::MAX, true),
            full.minimax_full_width(&board, 3, true)
        );
        assert!(pruned.nodes() <= full.nodes());
    }
}
