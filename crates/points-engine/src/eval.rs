//! Static evaluation.
//!
//! Scores are integers in tenths of a point, from White's point of view.

use crate::game::Game;
use crate::variant::{captured_piece, piece_value, Winner};
use chess_core::Color;
use chess_rules::{RuleSet, StandardChess};

/// A score in tenths of a point.
pub type Score = i32;

/// Tenths per point.
pub const SCALE: Score = 10;

/// Score of a won game.
pub const MATE: Score = 10_000 * SCALE;

/// Penalty for being in check, in tenths.
const CHECK_PENALTY: Score = 5 * SCALE;

/// Moves left at or below which captured points weigh half again as much.
const SCARCITY_THRESHOLD: u32 = 2;

/// Scores positions for the search.
///
/// Pure: the result depends only on the board and the variant counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    pub fn evaluate(&self, game: &Game) -> Score {
        if let Some(winner) = game.winner() {
            return match winner {
                Winner::White => MATE,
                Winner::Black => -MATE,
                Winner::Draw => 0,
            };
        }

        let state = game.state();
        let position = game.position();
        let to_move = position.side_to_move;

        let mut score = SCALE
            * (state.points_captured(Color::White) as Score
                - state.points_captured(Color::Black) as Score);

        if StandardChess.is_check(position) {
            score -= to_move.sign() * CHECK_PENALTY;
        }

        if Color::ALL
            .into_iter()
            .any(|side| state.moves_remaining(side) <= SCARCITY_THRESHOLD)
        {
            score = score * 3 / 2;
        }

        // A tenth of the victim's value for every capture on offer.
        let on_offer: Score = StandardChess
            .legal_moves(position)
            .iter()
            .filter_map(|&m| captured_piece(position, m))
            .map(|piece| piece_value(piece) as Score)
            .sum();
        score + to_move.sign() * on_offer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn game(fen: &str, max_moves: u32) -> Game {
        let config = EngineConfig {
            max_moves,
            ..EngineConfig::default()
        };
        Game::from_fen(fen, &config).unwrap()
    }

    #[test]
    fn quiet_start_is_level() {
        let g = Game::new(&EngineConfig::default());
        assert_eq!(Evaluator.evaluate(&g), 0);
    }

    #[test]
    fn available_captures_count_for_the_mover() {
        // The pawn can take the queen: +0.9 for White.
        let g = game("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", 6);
        assert_eq!(Evaluator.evaluate(&g), 9);

        // The queen can take the pawn: -0.1.
        let g = game("4k3/8/8/3q4/4P3/8/8/4K3 b - - 0 1", 6);
        assert_eq!(Evaluator.evaluate(&g), -1);
    }

    #[test]
    fn check_penalises_the_side_in_check() {
        let g = game("4k3/8/8/8/8/8/8/r3K3 w - - 0 1", 6);
        // -5 for the check; White has no capture.
        assert_eq!(Evaluator.evaluate(&g), -50);
        let g = game("R3k3/8/8/8/8/8/8/4K3 b - - 0 1", 6);
        assert_eq!(Evaluator.evaluate(&g), 50);
    }

    #[test]
    fn scarcity_multiplies_points_and_check() {
        let mut g = game("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", 3);
        g.make_move_uci("e4d5").unwrap();
        // Black to move with 3 left, White with 2: 1.5 * 9 points.
        assert_eq!(g.moves_remaining(Color::White), 2);
        assert_eq!(Evaluator.evaluate(&g), 135);
    }

    #[test]
    fn finished_games_score_as_mate_or_zero() {
        let mut g = Game::new(&EngineConfig::default());
        for m in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            g.make_move_uci(m).unwrap();
        }
        assert_eq!(g.winner(), Some(Winner::Black));
        assert_eq!(Evaluator.evaluate(&g), -MATE);

        let mut g = game("4k3/8/8/8/8/8/8/4K3 w - - 0 1", 1);
        g.skip_turn().unwrap();
        g.skip_turn().unwrap();
        assert_eq!(Evaluator.evaluate(&g), 0);
    }

    #[test]
    fn evaluation_is_repeatable() {
        let g = game("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1", 6);
        let first = Evaluator.evaluate(&g);
        assert_eq!(Evaluator.evaluate(&g.clone()), first);
        assert_eq!(Evaluator.evaluate(&g), first);
    }
}
