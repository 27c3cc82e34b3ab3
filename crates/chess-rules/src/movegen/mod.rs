//! Legal move generation and move application.
//!
//! Moves come out in a fixed order: pawns, knights, bishops, rooks, queens,
//! the king, then castling. Within a piece kind they are sorted by origin and
//! then destination square, and promotions expand in queen, rook, bishop,
//! knight order. Search relies on this order being deterministic.

mod attacks;
pub mod perft;

use crate::{Bitboard, Position};
use chess_core::{Color, Move, Piece, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};

/// A fixed-capacity list of moves.
///
/// No legal chess position has more than 218 moves.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub const MAX_MOVES: usize = 256;

    const EMPTY_SLOT: Move = Move::new(Square::A1, Square::A1);

    pub const fn new() -> Self {
        MoveList {
            moves: [Self::EMPTY_SLOT; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, m: Move) -> bool {
        self.as_slice().contains(&m)
    }

    pub fn first(&self) -> Option<Move> {
        self.as_slice().first().copied()
    }

    /// Keeps only the moves for which `keep` returns true, preserving order.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if keep(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }

    fn push_with_promotions(&mut self, from: Square, to: Square, promotes: bool) {
        if promotes {
            for piece in Piece::PROMOTIONS {
                self.push(Move::with_promotion(from, to, piece));
            }
        } else {
            self.push(Move::new(from, to));
        }
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Move {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<&MoveList> for Vec<Move> {
    fn from(list: &MoveList) -> Self {
        list.as_slice().to_vec()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates every legal move for the side to move.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    let us = position.side_to_move;

    generate_pawn_moves(position, &mut moves);
    for piece in [
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ] {
        generate_piece_moves(position, piece, &mut moves);
    }
    generate_castling_moves(position, &mut moves);

    moves.retain(|m| !is_king_attacked(&make_move(position, *m), us));
    moves
}

/// Squares a piece of `us` may land on: empty or holding an enemy other than
/// the king.
fn landing_squares(position: &Position, us: Color) -> Bitboard {
    let them = us.opposite();
    !(position.colors[us.index()] | position.pieces_of(Piece::King, them))
}

fn generate_pawn_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let them = us.opposite();
    let occupied = position.occupied();
    let enemies = position.colors[them.index()] & !position.pieces_of(Piece::King, them);
    let forward: i8 = match us {
        Color::White => 1,
        Color::Black => -1,
    };

    for from in position.pieces_of(Piece::Pawn, us) {
        let mut targets = pawn_attacks(from, us) & enemies;
        if let Some(ep) = position.en_passant {
            if pawn_attacks(from, us).contains(ep) {
                targets.set(ep);
            }
        }
        if let Some(one) = from.offset(0, forward).filter(|sq| !occupied.contains(*sq)) {
            targets.set(one);
            if from.rank_index() == us.pawn_rank() {
                if let Some(two) = one.offset(0, forward).filter(|sq| !occupied.contains(*sq)) {
                    targets.set(two);
                }
            }
        }
        for to in targets {
            moves.push_with_promotions(from, to, to.rank_index() == us.promotion_rank());
        }
    }
}

fn generate_piece_moves(position: &Position, piece: Piece, moves: &mut MoveList) {
    let us = position.side_to_move;
    let occupied = position.occupied();
    let landing = landing_squares(position, us);

    for from in position.pieces_of(piece, us) {
        let reach = match piece {
            Piece::Knight => knight_attacks(from),
            Piece::Bishop => bishop_attacks(from, occupied),
            Piece::Rook => rook_attacks(from, occupied),
            Piece::Queen => queen_attacks(from, occupied),
            Piece::King => king_attacks(from),
            Piece::Pawn => Bitboard::EMPTY,
        };
        for to in reach & landing {
            moves.push(Move::new(from, to));
        }
    }
}

fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let them = us.opposite();
    let occupied = position.occupied();
    if is_king_attacked(position, us) {
        return;
    }

    let back = match us {
        Color::White => 0,
        Color::Black => 7,
    };
    let on_back = |file: i8| Square::from_coords(file, back);
    let king_from = on_back(4);

    // (right held, squares that must be empty, square the king crosses, king target)
    let wings = [
        (position.castling.kingside(us), &[5, 6][..], 5, 6),
        (position.castling.queenside(us), &[1, 2, 3][..], 3, 2),
    ];
    for (allowed, between, crossed, target) in wings {
        if !allowed {
            continue;
        }
        let blocked = between
            .iter()
            .filter_map(|&file| on_back(file))
            .any(|sq| occupied.contains(sq));
        let crossed_attacked = on_back(crossed).is_some_and(|sq| is_square_attacked(position, sq, them));
        if blocked || crossed_attacked {
            continue;
        }
        if let (Some(from), Some(to)) = (king_from, on_back(target)) {
            moves.push(Move::new(from, to));
        }
    }
}

/// True when any piece of `by` attacks `sq`.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    let occupied = position.occupied();
    let theirs = |piece: Piece| position.pieces_of(piece, by);
    let diagonal = theirs(Piece::Bishop) | theirs(Piece::Queen);
    let straight = theirs(Piece::Rook) | theirs(Piece::Queen);

    (pawn_attacks(sq, by.opposite()) & theirs(Piece::Pawn)).is_not_empty()
        || (knight_attacks(sq) & theirs(Piece::Knight)).is_not_empty()
        || (king_attacks(sq) & theirs(Piece::King)).is_not_empty()
        || (bishop_attacks(sq, occupied) & diagonal).is_not_empty()
        || (rook_attacks(sq, occupied) & straight).is_not_empty()
}

/// True when the king of `color` is attacked. A side without a king is never
/// in check.
pub fn is_king_attacked(position: &Position, color: Color) -> bool {
    position
        .king_square(color)
        .is_some_and(|king| is_square_attacked(position, king, color.opposite()))
}

/// Applies a move and returns the resulting position.
///
/// Castling, en passant and double pushes are recognised from the board. The
/// move must be pseudo-legal; a move from an empty square leaves the position
/// unchanged.
pub fn make_move(position: &Position, m: Move) -> Position {
    let mut next = *position;
    let us = position.side_to_move;
    let them = us.opposite();
    let (from, to) = (m.from(), m.to());

    let Some((piece, _)) = position.piece_at(from) else {
        return next;
    };
    let mut captured = position.piece_at(to).is_some();

    next.remove(from);
    if piece == Piece::Pawn && Some(to) == position.en_passant {
        // The captured pawn sits beside the mover, behind the target square.
        if let Some(victim) = Square::from_coords(to.file_index() as i8, from.rank_index() as i8) {
            next.remove(victim);
            captured = true;
        }
    }
    next.put(to, m.promotion().unwrap_or(piece), us);

    let file_shift = to.file_index() as i8 - from.file_index() as i8;
    if piece == Piece::King && file_shift.abs() == 2 {
        let rank = from.rank_index() as i8;
        let (rook_from, rook_to) = if file_shift > 0 { (7, 5) } else { (0, 3) };
        if let (Some(rook_from), Some(rook_to)) = (
            Square::from_coords(rook_from, rank),
            Square::from_coords(rook_to, rank),
        ) {
            next.remove(rook_from);
            next.put(rook_to, Piece::Rook, us);
        }
    }

    if piece == Piece::King {
        next.castling.remove_color(us);
    }
    next.castling.touch(from);
    next.castling.touch(to);

    next.side_to_move = them;
    next.en_passant = None;
    let rank_shift = to.rank_index() as i8 - from.rank_index() as i8;
    if piece == Piece::Pawn && rank_shift.abs() == 2 {
        if let Some(skipped) = from.offset(0, rank_shift / 2) {
            if next.en_passant_is_capturable(skipped) {
                next.en_passant = Some(skipped);
            }
        }
    }

    if piece == Piece::Pawn || captured {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock += 1;
    }
    if us == Color::Black {
        next.fullmove_number += 1;
    }
    next
}

/// Passes the turn without moving a piece.
pub fn make_null_move(position: &Position) -> Position {
    let mut next = *position;
    next.side_to_move = position.side_to_move.opposite();
    next.en_passant = None;
    next.halfmove_clock += 1;
    if position.side_to_move == Color::Black {
        next.fullmove_number += 1;
    }
    next
}
