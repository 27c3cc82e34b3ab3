//! The rules interface the engine is written against.
//!
//! Search code calls through [`RuleSet`] rather than the free functions in
//! [`movegen`](crate::movegen) so the board collaborator stays swappable.

use crate::movegen::{self, MoveList};
use crate::Position;
use chess_core::{Color, Move, Piece, Square};

/// Queries and transitions of a chess rule set.
///
/// # Example
///
/// ```
/// use chess_rules::{RuleSet, StandardChess};
///
/// let start = StandardChess.initial_position();
/// let first = StandardChess.legal_moves(&start).first().unwrap();
/// let next = StandardChess.try_make_move(&start, first).unwrap();
/// assert_ne!(next.side_to_move, start.side_to_move);
/// ```
pub trait RuleSet {
    fn initial_position(&self) -> Position;

    /// Every legal move for the side to move, in a deterministic order.
    fn legal_moves(&self, position: &Position) -> MoveList;

    fn is_legal(&self, position: &Position, m: Move) -> bool {
        self.legal_moves(position).contains(m)
    }

    /// Applies a move without checking legality.
    fn make_move(&self, position: &Position, m: Move) -> Position;

    /// Applies a move if it is legal.
    fn try_make_move(&self, position: &Position, m: Move) -> Option<Position> {
        self.is_legal(position, m)
            .then(|| self.make_move(position, m))
    }

    /// Hands the move to the other side without moving a piece.
    fn make_null_move(&self, position: &Position) -> Position;

    /// True when the side to move is in check.
    fn is_check(&self, position: &Position) -> bool;

    fn is_checkmate(&self, position: &Position) -> bool {
        self.is_check(position) && self.legal_moves(position).is_empty()
    }

    fn is_stalemate(&self, position: &Position) -> bool {
        !self.is_check(position) && self.legal_moves(position).is_empty()
    }

    /// True when some piece of `by` attacks `square`.
    fn is_attacked_by(&self, position: &Position, by: Color, square: Square) -> bool;

    fn piece_at(&self, position: &Position, square: Square) -> Option<(Piece, Color)> {
        position.piece_at(square)
    }
}

/// Orthodox chess rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardChess;

impl RuleSet for StandardChess {
    fn initial_position(&self) -> Position {
        Position::startpos()
    }

    fn legal_moves(&self, position: &Position) -> MoveList {
        movegen::generate_moves(position)
    }

    fn make_move(&self, position: &Position, m: Move) -> Position {
        movegen::make_move(position, m)
    }

    fn make_null_move(&self, position: &Position) -> Position {
        movegen::make_null_move(position)
    }

    fn is_check(&self, position: &Position) -> bool {
        movegen::is_king_attacked(position, position.side_to_move)
    }

    fn is_attacked_by(&self, position: &Position, by: Color, square: Square) -> bool {
        movegen::is_square_attacked(position, square, by)
    }
}
