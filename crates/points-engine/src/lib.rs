//! Decision engine for Points Chess.
//!
//! Points Chess is played on a normal board, but each side only gets a fixed
//! budget of moves (six by default). Captures score the victim's value (pawn
//! 1, knight and bishop 3, rook 5, queen 9) and the side with more points wins
//! once both budgets are spent. Checkmate still ends the game at once. A
//! capture of a defended piece on a side's final scheduled move earns that
//! side one extra move.
//!
//! - [`Game`] - board plus [`VariantState`], with validated moves, skips and
//!   search-time make/unmake
//! - [`Setup`] - free-form board editing before a game starts
//! - [`Evaluator`], [`MoveOrderer`], [`TranspositionTable`] - search parts
//! - [`SearchEngine`] - time-bounded iterative deepening
//!
//! # Example
//!
//! ```
//! use points_engine::{EngineConfig, Game, SearchEngine};
//! use std::time::Duration;
//!
//! let config = EngineConfig { max_depth: 2, ..EngineConfig::default() };
//! let mut game = Game::new(&config);
//! game.make_move_uci("e2e4").unwrap();
//!
//! let mut engine = SearchEngine::new(&config);
//! let result = engine.find_best_move(&game, Duration::from_millis(200)).unwrap();
//! assert!(game.legal_moves().contains(result.best_move));
//! ```

pub mod config;
pub mod eval;
pub mod game;
pub mod ordering;
pub mod search;
pub mod setup;
pub mod tt;
pub mod variant;

pub use config::{ConfigError, EngineConfig};
pub use eval::{Evaluator, Score, MATE, SCALE};
pub use game::{Game, GameError, Turn, TurnAction, Undo};
pub use ordering::MoveOrderer;
pub use search::{SearchEngine, SearchResult, SearchState};
pub use setup::Setup;
pub use tt::{Bound, TranspositionTable, TtEntry};
pub use variant::{captured_piece, piece_value, VariantState, Winner};
