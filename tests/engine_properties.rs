//! Behavioural properties of the board engine, exercised through the public API.

use matchtui::board::{Board, Cell, Position, find_matches};
use matchtui::engine::{Engine, EngineConfig, SwapRule};
use matchtui::error::{EngineError, MoveRejection};
use matchtui::tokens::TokenScript;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn p(row: usize, col: usize) -> Position {
    Position::new(row, col)
}

fn scripted(rows: &[&[u8]], palette_size: u8, refill: &[u8]) -> Engine<TokenScript> {
    let board = Board::from_rows(rows).expect("rectangular board");
    let config = EngineConfig {
        palette_size,
        ..EngineConfig::default()
    };
    Engine::with_board(config, board, TokenScript::new(refill.to_vec())).expect("valid board")
}

#[test]
fn test_stable_after_init_and_every_swap() {
    let mut engine = Engine::new(EngineConfig::default(), StdRng::seed_from_u64(17)).unwrap();
    let mut picker = StdRng::seed_from_u64(99);
    assert!(engine.board().is_stable());

    for _ in 0..300 {
        let from = p(picker.random_range(0..12), picker.random_range(0..8));
        let to = match picker.random_range(0..5) {
            0 => p(from.row + 1, from.col),
            1 => p(from.row, from.col + 1),
            2 => p(from.row.saturating_sub(1), from.col),
            3 => p(from.row, from.col.saturating_sub(1)),
            _ => p(picker.random_range(0..14), picker.random_range(0..10)),
        };
        let score_before = engine.score();
        match engine.request_swap(from, to) {
            Ok(result) => {
                assert!(result.accepted);
                assert_eq!(result.state.score, score_before + result.score_delta);
            }
            Err(err) => assert!(!err.is_fatal(), "unexpected {err}"),
        }
        assert!(engine.board().is_stable());
        assert!(find_matches(engine.board()).is_empty());
        assert!(engine.score() >= score_before);
    }
}

#[test]
fn test_non_adjacent_swap_rejected_without_change() {
    let mut engine = Engine::new(EngineConfig::default(), StdRng::seed_from_u64(4)).unwrap();
    let before = engine.board().clone();
    let score = engine.score();

    let err = engine.request_swap(p(0, 0), p(2, 2)).unwrap_err();

    assert_eq!(
        err,
        EngineError::InvalidMove {
            from: p(0, 0),
            to: p(2, 2),
            reason: MoveRejection::NotAdjacent,
        }
    );
    assert_eq!(engine.board(), &before);
    assert_eq!(engine.score(), score);
    assert_eq!(engine.moves(), 0);
}

#[test]
fn test_single_run_scores_thirty() {
    // Swapping (0,2) and (0,3) completes 0-0-0 on the top row.
    let mut engine = scripted(
        &[&[0, 0, 1, 0], &[1, 2, 3, 2], &[2, 3, 1, 3]],
        4,
        &[3, 1, 2],
    );
    assert!(engine.board().is_stable());

    let result = engine.request_swap(p(0, 2), p(0, 3)).unwrap();

    assert!(result.accepted);
    assert_eq!(result.score_delta, 30);
    assert_eq!(result.resolution.passes, 1);
    assert_eq!(result.resolution.cleared, 3);
    assert_eq!(
        engine.board(),
        &Board::from_rows(&[[3, 1, 2, 1], [1, 2, 3, 2], [2, 3, 1, 3]]).unwrap()
    );
}

#[test]
fn test_resolve_scores_existing_run() {
    let mut engine = scripted(
        &[&[0, 0, 0, 1], &[1, 2, 3, 2], &[2, 3, 1, 3]],
        4,
        &[3, 1, 2],
    );

    let resolution = engine.resolve().unwrap();

    assert_eq!(resolution.points, 30);
    assert_eq!(engine.score(), 30);
    assert!(engine.board().is_stable());
}

#[test]
fn test_cascade_in_same_column() {
    // Column 0 is 1,1,0,0,2. Swapping (4,0) with (4,1) brings a third 0 in;
    // the two 1s fall and the scripted refill lands a third 1 on top of them.
    let mut engine = scripted(
        &[&[1, 2, 3], &[1, 3, 2], &[0, 2, 3], &[0, 3, 2], &[2, 0, 3]],
        4,
        &[2, 3, 1, 1, 0, 1],
    );
    assert!(engine.board().is_stable());

    let result = engine.request_swap(p(4, 0), p(4, 1)).unwrap();

    assert_eq!(result.resolution.passes, 2);
    assert_eq!(result.resolution.cleared, 6);
    assert_eq!(result.score_delta, 60);
    assert_eq!(engine.score(), 60);
    assert!(engine.board().is_stable());
    assert_eq!(
        engine.board(),
        &Board::from_rows(&[[1, 2, 3], [0, 3, 2], [1, 2, 3], [2, 3, 2], [3, 2, 3]]).unwrap()
    );
}

#[test]
fn test_gravity_keeps_survivor_order() {
    let mut board = Board::empty(5, 1);
    board.set(p(0, 0), Cell::Token(0));
    board.set(p(2, 0), Cell::Token(1));
    board.set(p(4, 0), Cell::Token(2));
    let mut rng = StdRng::seed_from_u64(8);

    board.fill_empty(6, &mut rng);

    assert!(board.is_full());
    assert_eq!(board.token(p(2, 0)), Some(0));
    assert_eq!(board.token(p(3, 0)), Some(1));
    assert_eq!(board.token(p(4, 0)), Some(2));
    assert!(board.token(p(0, 0)).is_some_and(|t| t < 6));
    assert!(board.token(p(1, 0)).is_some_and(|t| t < 6));
}

#[test]
fn test_seeded_games_are_reproducible() {
    let swaps = [
        (p(0, 0), p(0, 1)),
        (p(5, 3), p(6, 3)),
        (p(11, 7), p(10, 7)),
        (p(3, 3), p(9, 9)),
        (p(7, 2), p(7, 1)),
        (p(2, 5), p(3, 5)),
    ];
    let play = || {
        let mut engine = Engine::new(EngineConfig::default(), StdRng::seed_from_u64(2024)).unwrap();
        let mut trace = vec![engine.state()];
        for (from, to) in swaps {
            let _ = engine.request_swap(from, to);
            trace.push(engine.state());
        }
        trace
    };

    assert_eq!(play(), play());
}

#[test]
fn test_unmatched_swap_sticks() {
    let mut engine = scripted(&[&[0, 1, 2], &[1, 2, 0], &[0, 1, 2]], 3, &[0]);

    let result = engine.request_swap(p(0, 0), p(0, 1)).unwrap();

    assert!(result.accepted);
    assert_eq!(result.score_delta, 0);
    assert_eq!(result.resolution.passes, 0);
    assert_eq!(engine.board().token(p(0, 0)), Some(1));
    assert_eq!(engine.board().token(p(0, 1)), Some(0));
    assert_eq!(engine.moves(), 1);
}

#[test]
fn test_unmatched_swap_reverted_when_configured() {
    let board = Board::from_rows(&[[0, 1, 2], [1, 2, 0], [0, 1, 2]]).unwrap();
    let config = EngineConfig {
        palette_size: 3,
        swap_rule: SwapRule::RevertUnmatched,
        ..EngineConfig::default()
    };
    let mut engine = Engine::with_board(config, board.clone(), TokenScript::new(vec![0])).unwrap();

    let result = engine.request_swap(p(0, 0), p(0, 1)).unwrap();

    assert!(!result.accepted);
    assert_eq!(result.score_delta, 0);
    assert_eq!(engine.board(), &board);
    assert_eq!(engine.moves(), 0);
}

#[test]
fn test_matching_swap_kept_under_revert_rule() {
    let board = Board::from_rows(&[[0, 0, 1, 0], [1, 2, 3, 2], [2, 3, 1, 3]]).unwrap();
    let config = EngineConfig {
        palette_size: 4,
        swap_rule: SwapRule::RevertUnmatched,
        ..EngineConfig::default()
    };
    let mut engine = Engine::with_board(config, board, TokenScript::new(vec![3, 1, 2])).unwrap();

    let result = engine.request_swap(p(0, 2), p(0, 3)).unwrap();

    assert!(result.accepted);
    assert_eq!(result.score_delta, 30);
}

#[test]
fn test_single_colour_palette_refused() {
    let config = EngineConfig {
        palette_size: 1,
        ..EngineConfig::default()
    };
    let err = Engine::new(config, StdRng::seed_from_u64(0)).unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)));
}
