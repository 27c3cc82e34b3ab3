//! Time-bounded iterative-deepening negamax.
//!
//! Each iteration searches the whole tree to a fixed depth with alpha-beta
//! pruning. The deadline is checked before every iteration and at every node;
//! an iteration that runs out of time is thrown away and the result of the
//! last completed one is kept.

use crate::config::EngineConfig;
use crate::eval::{Evaluator, Score, MATE};
use crate::game::Game;
use crate::ordering::MoveOrderer;
use crate::tt::{Bound, TranspositionTable};
use chess_core::Move;
use std::time::{Duration, Instant};

const INFINITY: Score = MATE * 10;

/// The deadline passed while a node was being searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TimedOut;

type NodeResult = Result<Score, TimedOut>;

/// Where the search driver is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    /// Iteration at this depth in progress.
    Deepening(u32),
    /// The deadline stopped the search.
    TimedOut,
    /// Deeper iterations cannot change the result: the game tree ends within
    /// the searched depth or the depth cap was reached.
    Exhausted,
}

/// Outcome of [`SearchEngine::find_best_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    /// Deepest completed iteration; 0 when only the ordering fallback is known.
    pub depth: u32,
    /// Score of `best_move` from White's side, in tenths. `None` for the
    /// fallback.
    pub score: Option<Score>,
    pub nodes: u64,
    pub elapsed: Duration,
    /// How the search ended.
    pub state: SearchState,
}

/// Single-threaded search driver. The transposition table is reset for every
/// search.
#[derive(Debug)]
pub struct SearchEngine {
    max_depth: u32,
    time_fraction: f64,
    default_time_limit: Duration,
    evaluator: Evaluator,
    orderer: MoveOrderer,
    tt: TranspositionTable,
    nodes: u64,
    deadline: Instant,
    state: SearchState,
}

impl SearchEngine {
    pub fn new(config: &EngineConfig) -> Self {
        SearchEngine {
            max_depth: config.max_depth.max(1),
            time_fraction: config.time_fraction,
            default_time_limit: config.time_limit(),
            evaluator: Evaluator,
            orderer: MoveOrderer,
            tt: TranspositionTable::new(config.tt_capacity),
            nodes: 0,
            deadline: Instant::now(),
            state: SearchState::Idle,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Searches with the configured time limit.
    pub fn suggest(&mut self, game: &Game) -> Option<SearchResult> {
        self.find_best_move(game, self.default_time_limit)
    }

    /// Picks a move for the side to move within roughly `time_limit`.
    ///
    /// Returns `None` when there is no legal move (game over or stalemate).
    /// Otherwise the move is always legal: at worst it is the move ranked
    /// first by the move orderer.
    pub fn find_best_move(&mut self, game: &Game, time_limit: Duration) -> Option<SearchResult> {
        let start = Instant::now();
        self.deadline = start + time_limit.mul_f64(self.time_fraction);
        self.nodes = 0;
        self.tt.clear();

        let moves = game.legal_moves();
        let root_moves = self.orderer.order(game.position(), moves.as_slice());
        let fallback = *root_moves.first()?;

        let mut result = SearchResult {
            best_move: fallback,
            depth: 0,
            score: None,
            nodes: 0,
            elapsed: Duration::ZERO,
            state: SearchState::Idle,
        };
        let horizon = game.plies_remaining_upper_bound();
        let mut work = game.clone();
        self.state = SearchState::Exhausted;

        for depth in 1..=self.max_depth {
            if Instant::now() >= self.deadline {
                self.state = SearchState::TimedOut;
                break;
            }
            self.state = SearchState::Deepening(depth);

            match self.search_root(&mut work, depth, &root_moves) {
                Ok((best_move, score)) => {
                    result.best_move = best_move;
                    result.depth = depth;
                    result.score = Some(score);
                    tracing::debug!(
                        depth,
                        score,
                        best = %best_move,
                        nodes = self.nodes,
                        "iteration complete"
                    );
                }
                Err(TimedOut) => {
                    tracing::trace!(depth, nodes = self.nodes, "iteration timed out");
                    self.state = SearchState::TimedOut;
                    break;
                }
            }

            if depth >= horizon || depth == self.max_depth {
                self.state = SearchState::Exhausted;
                break;
            }
        }

        result.nodes = self.nodes;
        result.elapsed = start.elapsed();
        result.state = self.state;
        tracing::info!(
            best = %result.best_move,
            depth = result.depth,
            score = ?result.score,
            nodes = result.nodes,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "search finished"
        );
        Some(result)
    }

    /// Searches every root move to `depth` and returns the best one with its
    /// score from White's side.
    fn search_root(
        &mut self,
        game: &mut Game,
        depth: u32,
        root_moves: &[Move],
    ) -> Result<(Move, Score), TimedOut> {
        let side = game.side_to_move();
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best: Option<(Move, Score)> = None;

        for &m in root_moves {
            let score = self.child_score(game, m, depth - 1, alpha, beta)?;
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((m, score));
            }
            alpha = alpha.max(score);
        }

        best.map(|(m, score)| (m, side.sign() * score)).ok_or(TimedOut)
    }

    /// Plays `m`, searches the child, and returns its score from the point of
    /// view of the side that played `m`.
    fn child_score(
        &mut self,
        game: &mut Game,
        m: Move,
        depth: u32,
        alpha: Score,
        beta: Score,
    ) -> NodeResult {
        let side = game.side_to_move();
        let undo = game.play(m);
        // An extra move leaves the same side on move, so the frame only flips
        // when the turn actually passes.
        let result = if game.side_to_move() == side {
            self.negamax(game, depth, alpha, beta)
        } else {
            self.negamax(game, depth, -beta, -alpha).map(|s| -s)
        };
        game.unmake(undo);
        result
    }

    /// Score of `game` from the side to move's point of view.
    fn negamax(&mut self, game: &mut Game, depth: u32, mut alpha: Score, beta: Score) -> NodeResult {
        self.nodes += 1;
        if Instant::now() >= self.deadline {
            return Err(TimedOut);
        }

        let key = game.signature();
        if let Some(score) = self.tt.probe(key, depth, alpha, beta) {
            return Ok(score);
        }

        let moves = game.legal_moves();
        if depth == 0 || moves.is_empty() {
            let score = game.side_to_move().sign() * self.evaluator.evaluate(game);
            self.tt.store(key, depth, score, Bound::Exact);
            return Ok(score);
        }

        let alpha_orig = alpha;
        let mut best = -INFINITY;
        for m in self.orderer.order(game.position(), moves.as_slice()) {
            let score = self.child_score(game, m, depth - 1, alpha, beta)?;
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        let bound = if best <= alpha_orig {
            Bound::Upper
        } else if best >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.tt.store(key, depth, best, bound);
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max_moves: u32, max_depth: u32) -> EngineConfig {
        EngineConfig {
            max_moves,
            max_depth,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn no_moves_no_result() {
        let cfg = config(6, 3);
        let game = Game::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1", &cfg).unwrap();
        let mut engine = SearchEngine::new(&cfg);
        assert!(engine.find_best_move(&game, Duration::from_millis(200)).is_none());
    }

    #[test]
    fn zero_time_returns_the_ordering_fallback() {
        let cfg = config(6, 5);
        let game = Game::from_fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", &cfg).unwrap();
        let mut engine = SearchEngine::new(&cfg);
        let result = engine.find_best_move(&game, Duration::ZERO).unwrap();
        assert_eq!(result.best_move, Move::from_uci("e4d5").unwrap());
        assert_eq!(result.depth, 0);
        assert_eq!(result.score, None);
        assert_eq!(result.state, SearchState::TimedOut);
    }

    #[test]
    fn finds_mate_in_one() {
        let cfg = config(6, 2);
        let mut game = Game::new(&cfg);
        for m in ["f2f3", "e7e5", "g2g4"] {
            game.make_move_uci(m).unwrap();
        }
        let mut engine = SearchEngine::new(&cfg);
        let result = engine.find_best_move(&game, Duration::from_secs(10)).unwrap();
        assert_eq!(result.best_move, Move::from_uci("d8h4").unwrap());
        assert_eq!(result.score, Some(-MATE));
        assert_eq!(result.depth, 2);
    }

    #[test]
    fn stops_when_the_game_tree_ends() {
        let cfg = config(1, 10);
        let game = Game::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", &cfg).unwrap();
        let mut engine = SearchEngine::new(&cfg);
        let result = engine.find_best_move(&game, Duration::from_secs(10)).unwrap();
        assert_eq!(result.state, SearchState::Exhausted);
        assert!(result.depth <= game.plies_remaining_upper_bound());
        assert!(game.legal_moves().contains(result.best_move));
    }

    #[test]
    fn timeout_keeps_the_last_completed_iteration() {
        let cfg = config(40, 30);
        let game = Game::new(&cfg);
        let mut engine = SearchEngine::new(&cfg);
        let result = engine.find_best_move(&game, Duration::from_millis(200)).unwrap();
        assert_eq!(result.state, SearchState::TimedOut);
        assert!(result.depth >= 1);
        assert!(result.depth < 30);

        let capped = config(40, result.depth);
        let mut engine = SearchEngine::new(&capped);
        let reference = engine.find_best_move(&game, Duration::from_secs(60)).unwrap();
        assert_eq!(reference.state, SearchState::Exhausted);
        assert_eq!(reference.depth, result.depth);
        assert_eq!(reference.best_move, result.best_move);
        assert_eq!(reference.score, result.score);
    }

    #[test]
    fn search_leaves_the_game_untouched() {
        let cfg = config(6, 3);
        let game = Game::new(&cfg);
        let before = (game.signature(), *game.state());
        let mut engine = SearchEngine::new(&cfg);
        engine.find_best_move(&game, Duration::from_millis(300)).unwrap();
        assert_eq!((game.signature(), *game.state()), before);
    }
}
