//! Standard chess rules on a bitboard position.
//!
//! This crate is the rules collaborator of the points-chess engine. It knows
//! nothing about scoring; it answers "what is legal here", "is this square
//! attacked", and "what does the board look like after this move".
//!
//! - [`Bitboard`] - 64-bit square sets
//! - [`Position`] - a `Copy` board snapshot with FEN import/export
//! - [`RuleSet`] - the interface the engine is written against, implemented
//!   by [`StandardChess`]
//!
//! Positions are applied copy-make: [`make_move`] returns a new value and the
//! caller keeps the old one to undo.
//!
//! # Example
//!
//! ```
//! use chess_rules::{Position, RuleSet, StandardChess};
//!
//! let position = StandardChess.initial_position();
//! let moves = StandardChess.legal_moves(&position);
//! assert_eq!(moves.len(), 20);
//! ```

mod bitboard;
pub mod movegen;
mod position;
pub mod rules;
mod zobrist;

pub use bitboard::Bitboard;
pub use movegen::{
    bishop_attacks, generate_moves, is_king_attacked, is_square_attacked, king_attacks,
    knight_attacks, make_move, make_null_move, pawn_attacks, queen_attacks, rook_attacks,
    MoveList,
};
pub use position::{CastlingRights, Position, PositionError};
pub use rules::{RuleSet, StandardChess};
