//! Core value types shared by the rules engine and the points-chess engine.
//!
//! - [`Color`] and [`Piece`] identify what stands on a square
//! - [`Square`], [`File`], and [`Rank`] address the board
//! - [`Move`] is an origin/destination pair with an optional promotion
//! - [`FenFields`] splits a FEN record into validated fields

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenFields};
pub use mov::{Move, MoveParseError};
pub use piece::Piece;
pub use square::{File, Rank, Square};
