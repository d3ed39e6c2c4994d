//! Property tests over random playouts from the initial position.

use proptest::prelude::*;
use xiangqi_core::{Color, Move, MoveRecord};
use xiangqi_engine::{
    generate_moves, is_in_check, is_legal, reconstruct, Board, GameSession,
};

/// Plays up to `choices.len()` moves, picking each by index modulo the legal count.
fn playout(choices: &[usize]) -> GameSession {
    let mut game = GameSession::new();
    for choice in choices {
        if game.is_over() {
            break;
        }
        let moves = game.legal_moves();
        let mov = moves[choice % moves.len()];
        game.play(mov).expect("generated moves are legal");
    }
    game
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn at_most_one_general_per_color(choices in prop::collection::vec(any::<usize>(), 0..40)) {
        let game = playout(&choices);
        for color in Color::ALL {
            let count = game.board().general_count(color);
            prop_assert!(count <= 1);
            if count == 0 {
                prop_assert!(game.is_over());
            }
        }
    }

    #[test]
    fn legal_moves_never_leave_own_general_in_check(
        choices in prop::collection::vec(any::<usize>(), 0..30)
    ) {
        let game = playout(&choices);
        let board = *game.board();
        let side = game.turn();
        for mov in generate_moves(&board, side).iter() {
            prop_assert!(is_legal(&board, mov.from, mov.to, side));
            prop_assert!(!is_in_check(&board.apply(*mov), side));
        }
    }

    #[test]
    fn reconstruct_is_deterministic(
        choices in prop::collection::vec(any::<usize>(), 1..30),
        pick in any::<usize>(),
    ) {
        let game = playout(&choices);
        let history: Vec<MoveRecord> = game.history().to_vec();
        prop_assume!(!history.is_empty());
        let index = pick % history.len();
        let first = reconstruct(&history, index).unwrap();
        let second = reconstruct(&history, index).unwrap();
        prop_assert_eq!(&first, &second);
        if index + 1 == history.len() {
            prop_assert_eq!(&first.after, game.board());
        }
    }

    #[test]
    fn apply_never_mutates_source(choices in prop::collection::vec(any::<usize>(), 0..20)) {
        let game = playout(&choices);
        let board: Board = *game.board();
        let snapshot = board.to_snapshot();
        for mov in game.legal_moves().iter().take(5) {
            let _ = board.apply(Move::new(mov.from, mov.to));
        }
        prop_assert_eq!(board.to_snapshot(), snapshot);
    }
}
