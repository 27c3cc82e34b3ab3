//! End-to-end game and search scenarios.

use chess_core::{Color, Move};
use points_engine::{EngineConfig, Game, SearchEngine, SearchState, Winner};
use std::time::{Duration, Instant};

fn play(game: &mut Game, moves: &[&str]) {
    for m in moves {
        game.make_move_uci(m)
            .unwrap_or_else(|e| panic!("{m} rejected: {e}"));
    }
}

#[test]
fn rook_takes_the_free_pawn() {
    let config = EngineConfig {
        max_depth: 2,
        ..EngineConfig::default()
    };
    let game = Game::from_fen("4k3/p7/8/8/8/8/8/R3K3 w - - 0 1", &config).unwrap();
    let mut engine = SearchEngine::new(&config);
    let result = engine
        .find_best_move(&game, Duration::from_secs(30))
        .unwrap();
    assert_eq!(result.best_move, Move::from_uci("a1a7").unwrap());
    assert_eq!(result.depth, 2);
    assert!(result.score.is_some_and(|s| s > 0));
}

#[test]
fn quiet_game_is_a_draw() {
    let mut game = Game::new(&EngineConfig::default());
    for _ in 0..3 {
        play(&mut game, &["g1f3", "g8f6", "f3g1", "f6g8"]);
    }
    assert!(game.is_over());
    assert_eq!(game.winner(), Some(Winner::Draw));
    assert_eq!(game.state().points_captured(Color::White), 0);
    assert_eq!(game.state().points_captured(Color::Black), 0);
    assert_eq!(game.state().moves_played(Color::White), 6);
    assert_eq!(game.state().moves_played(Color::Black), 6);
    assert!(game.legal_moves().is_empty());
}

#[test]
fn defended_capture_on_the_sixth_move_earns_an_extra_move() {
    let mut game = Game::from_fen(
        "4k3/8/8/3p3R/8/2n5/8/4K3 w - - 0 1",
        &EngineConfig::default(),
    )
    .unwrap();
    play(
        &mut game,
        &[
            "e1f1", "e8f8", "f1e1", "f8e8", "e1f1", "e8f8", "f1e1", "f8e8", "e1f1", "e8f8",
        ],
    );
    assert_eq!(game.state().moves_played(Color::White), 5);

    play(&mut game, &["h5d5"]);
    assert!(game.state().extra_move_granted());
    assert_eq!(game.side_to_move(), Color::White);
    assert_eq!(game.state().points_captured(Color::White), 1);
    assert!(!game.is_over());

    play(&mut game, &["f1g1"]);
    assert!(!game.state().extra_move_granted());
    assert_eq!(game.side_to_move(), Color::Black);
    assert!(!game.is_over());

    play(&mut game, &["f8g8"]);
    assert!(game.is_over());
    assert_eq!(game.winner(), Some(Winner::White));
    assert_eq!(game.state().moves_played(Color::White), 7);
}

#[test]
fn checkmate_ends_the_game_before_the_budget() {
    let mut game = Game::new(&EngineConfig::default());
    play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
    assert!(game.is_over());
    assert_eq!(game.winner(), Some(Winner::Black));
    assert_eq!(game.state().moves_played(Color::Black), 2);
    assert_eq!(game.moves_remaining(Color::White), 4);
}

#[test]
fn search_respects_the_time_limit() {
    let config = EngineConfig::default();
    let game = Game::from_fen(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        &config,
    )
    .unwrap();
    let mut engine = SearchEngine::new(&config);
    let limit = Duration::from_millis(200);
    let started = Instant::now();
    let result = engine.find_best_move(&game, limit).unwrap();
    assert!(started.elapsed() < limit * 5);
    assert!(game.legal_moves().contains(result.best_move));
    assert!(matches!(
        result.state,
        SearchState::TimedOut | SearchState::Exhausted
    ));
}

#[test]
fn engine_plays_a_whole_game() {
    let config = EngineConfig {
        max_depth: 2,
        ..EngineConfig::default()
    };
    let mut game = Game::new(&config);
    let mut engine = SearchEngine::new(&config);
    let mut plies = 0;
    while !game.is_over() {
        match engine.find_best_move(&game, Duration::from_millis(100)) {
            Some(result) => {
                game.make_move(result.best_move).unwrap();
            }
            None => {
                game.skip_turn().unwrap();
            }
        }
        plies += 1;
        assert!(plies <= 14);
    }
    assert!(game.winner().is_some());
}
