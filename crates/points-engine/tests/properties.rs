//! Invariants checked over random games.

use chess_core::{Color, Piece};
use chess_rules::Position;
use points_engine::{
    piece_value, EngineConfig, Evaluator, Game, SearchEngine, TurnAction,
};
use proptest::prelude::*;
use std::time::Duration;

fn material(position: &Position, color: Color) -> u32 {
    Piece::ALL
        .iter()
        .map(|&p| position.pieces_of(p, color).count() * piece_value(p))
        .sum()
}

/// Plays random turns: each choice picks a legal move, or skips when it
/// lands past the end of the move list.
fn random_game(max_moves: u32, choices: &[usize]) -> Result<Vec<Game>, TestCaseError> {
    let config = EngineConfig {
        max_moves,
        ..EngineConfig::default()
    };
    let mut game = Game::new(&config);
    let mut trail = vec![game.clone()];
    for &choice in choices {
        if game.is_over() {
            break;
        }
        let moves = game.legal_moves();
        let pick = choice % (moves.len() + 1);
        let played = match moves.as_slice().get(pick) {
            Some(&m) => game.make_move(m).is_ok(),
            None => game.skip_turn().is_ok(),
        };
        if !played {
            // Skipping in check is refused; play the first move instead.
            match moves.first() {
                Some(m) => {
                    prop_assert!(game.make_move(m).is_ok(), "fallback {} rejected", m);
                }
                None => break,
            }
        }
        trail.push(game.clone());
    }
    Ok(trail)
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 48, .. ProptestConfig::default() })]

    #[test]
    fn points_match_material_taken(max_moves in 1u32..8, choices in prop::collection::vec(any::<usize>(), 0..20)) {
        for pair in random_game(max_moves, &choices)?.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            let mover = before.side_to_move();
            let opponent = mover.opposite();
            let gained = after.state().points_captured(mover) - before.state().points_captured(mover);
            let lost = material(before.position(), opponent) - material(after.position(), opponent);
            prop_assert_eq!(gained, lost);
            prop_assert_eq!(
                after.state().points_captured(opponent),
                before.state().points_captured(opponent)
            );
        }
    }

    #[test]
    fn counters_are_monotone_and_bounded(max_moves in 1u32..8, choices in prop::collection::vec(any::<usize>(), 0..20)) {
        for pair in random_game(max_moves, &choices)?.windows(2) {
            for side in Color::ALL {
                let (a, b) = (pair[0].state().moves_played(side), pair[1].state().moves_played(side));
                prop_assert!(a <= b);
                prop_assert!(b <= max_moves + 1);
            }
            prop_assert!(!pair[0].is_over() || pair[1].is_over());
        }
    }

    #[test]
    fn extra_move_follows_a_final_capture_and_is_spent_next(max_moves in 1u32..5, choices in prop::collection::vec(any::<usize>(), 0..14)) {
        let trail = random_game(max_moves, &choices)?;
        for pair in trail.windows(2) {
            let (before, after) = (&pair[0], &pair[1]);
            if after.state().extra_move_granted() && !before.state().extra_move_granted() {
                let mover = before.side_to_move();
                prop_assert!(after.last_move_was_capture());
                prop_assert_eq!(before.state().moves_played(mover), max_moves - 1);
                let Some(turn) = after.history().last() else {
                    return Err(TestCaseError::fail("extra move without a turn"));
                };
                let TurnAction::Move(m) = turn.action else {
                    return Err(TestCaseError::fail("skip cannot earn an extra move"));
                };
                prop_assert!(chess_rules::is_square_attacked(after.position(), m.to(), mover.opposite()));
                prop_assert_eq!(after.side_to_move(), mover);
            }
            if before.state().extra_move_granted() && after.history().len() > before.history().len() {
                prop_assert!(!after.state().extra_move_granted());
            }
        }
    }

    #[test]
    fn evaluation_is_pure(max_moves in 1u32..8, choices in prop::collection::vec(any::<usize>(), 0..16)) {
        for game in random_game(max_moves, &choices)? {
            let copy = game.clone();
            prop_assert_eq!(Evaluator.evaluate(&game), Evaluator.evaluate(&copy));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 12, .. ProptestConfig::default() })]

    #[test]
    fn suggested_move_is_legal(choices in prop::collection::vec(any::<usize>(), 0..10)) {
        let trail = random_game(6, &choices)?;
        let Some(game) = trail.last() else {
            return Ok(());
        };
        let config = EngineConfig { max_depth: 3, ..EngineConfig::default() };
        let mut engine = SearchEngine::new(&config);
        match engine.find_best_move(game, Duration::from_millis(30)) {
            Some(result) => prop_assert!(game.legal_moves().contains(result.best_move)),
            None => prop_assert!(game.legal_moves().is_empty()),
        }
    }
}
