//! Board snapshot.

use chess_core::{Color, FenError, FenFields, Piece, Square};
use thiserror::Error;

use crate::movegen::{is_king_attacked, pawn_attacks};
use crate::Bitboard;

/// Reasons a FEN record does not describe a playable position.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    Fen(#[from] FenError),

    #[error("{color} must have exactly one king, found {count}")]
    KingCount { color: Color, count: u32 },

    #[error("pawns cannot stand on the first or last rank")]
    PawnOnBackRank,

    #[error("{0} is in check but it is not their turn")]
    OpponentInCheck(Color),
}

/// Castling availability, one bit per side and wing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const fn kingside_bit(color: Color) -> u8 {
        match color {
            Color::White => 0b0001,
            Color::Black => 0b0100,
        }
    }

    const fn queenside_bit(color: Color) -> u8 {
        match color {
            Color::White => 0b0010,
            Color::Black => 0b1000,
        }
    }

    #[inline]
    pub const fn kingside(self, color: Color) -> bool {
        self.0 & Self::kingside_bit(color) != 0
    }

    #[inline]
    pub const fn queenside(self, color: Color) -> bool {
        self.0 & Self::queenside_bit(color) != 0
    }

    pub fn remove_kingside(&mut self, color: Color) {
        self.0 &= !Self::kingside_bit(color);
    }

    pub fn remove_queenside(&mut self, color: Color) {
        self.0 &= !Self::queenside_bit(color);
    }

    pub fn remove_color(&mut self, color: Color) {
        self.remove_kingside(color);
        self.remove_queenside(color);
    }

    /// Drops any right whose rook leaves or is captured on `sq`.
    pub fn touch(&mut self, sq: Square) {
        match sq {
            Square::H1 => self.remove_kingside(Color::White),
            Square::A1 => self.remove_queenside(Color::White),
            Square::H8 => self.remove_kingside(Color::Black),
            Square::A8 => self.remove_queenside(Color::Black),
            _ => {}
        }
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    fn from_fen_letters(letters: &str) -> Self {
        let mut rights = CastlingRights::NONE;
        for c in letters.chars() {
            rights.0 |= match c {
                'K' => Self::kingside_bit(Color::White),
                'Q' => Self::queenside_bit(Color::White),
                'k' => Self::kingside_bit(Color::Black),
                'q' => Self::queenside_bit(Color::Black),
                _ => 0,
            };
        }
        rights
    }

    /// Letters in `KQkq` order, empty when no right remains.
    fn to_fen_letters(self) -> String {
        [
            (self.kingside(Color::White), 'K'),
            (self.queenside(Color::White), 'Q'),
            (self.kingside(Color::Black), 'k'),
            (self.queenside(Color::Black), 'q'),
        ]
        .into_iter()
        .filter_map(|(present, c)| present.then_some(c))
        .collect()
    }
}

/// Piece placement plus the state needed to generate legal moves.
///
/// Small enough to copy; applying a move produces a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Occupancy per piece kind, indexed by [`Piece::index`].
    pub pieces: [Bitboard; 6],
    /// Occupancy per color, indexed by [`Color::index`].
    pub colors: [Bitboard; 2],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Position {
    /// An empty board with White to move. Not playable until kings are added.
    pub fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn startpos() -> Self {
        // The constant is known to be valid; decoding cannot fail.
        match Self::from_fen(FenFields::STARTPOS) {
            Ok(position) => position,
            Err(e) => unreachable!("start position rejected: {e}"),
        }
    }

    /// Decodes a FEN record and checks that it is playable.
    ///
    /// Castling rights without the king and rook on their home squares, and an
    /// en passant square no pawn can capture on, are dropped rather than
    /// rejected.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Self::from_fields(&FenFields::parse(fen)?)
    }

    /// Builds a position from already tokenized FEN fields, with the same
    /// checks as [`Position::from_fen`].
    pub fn from_fields(fields: &FenFields) -> Result<Self, PositionError> {
        let mut position = Position::empty();
        for sq in Square::all() {
            if let Some((piece, color)) = fields.board[sq.index() as usize] {
                position.put(sq, piece, color);
            }
        }
        position.side_to_move = fields.active_color;
        position.castling = CastlingRights::from_fen_letters(&fields.castling);
        position.en_passant = fields.en_passant;
        position.halfmove_clock = fields.halfmove_clock;
        position.fullmove_number = fields.fullmove_number;

        position.validate()?;
        position.sanitize();
        Ok(position)
    }

    pub fn to_fields(&self) -> FenFields {
        let mut board = [None; 64];
        for sq in Square::all() {
            board[sq.index() as usize] = self.piece_at(sq);
        }
        FenFields {
            board,
            active_color: self.side_to_move,
            castling: self.castling.to_fen_letters(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Encodes the position as a six-field FEN record.
    pub fn to_fen(&self) -> String {
        self.to_fields().to_string()
    }

    /// Checks the rules every playable position obeys: one king per side, no
    /// pawns on the back ranks, and the side that just moved not in check.
    pub fn validate(&self) -> Result<(), PositionError> {
        for color in Color::ALL {
            let count = self.pieces_of(Piece::King, color).count();
            if count != 1 {
                return Err(PositionError::KingCount { color, count });
            }
        }
        let pawns = self.pieces[Piece::Pawn.index()];
        if (pawns & (Bitboard::RANK_1 | Bitboard::RANK_8)).is_not_empty() {
            return Err(PositionError::PawnOnBackRank);
        }
        let waiting = self.side_to_move.opposite();
        if is_king_attacked(self, waiting) {
            return Err(PositionError::OpponentInCheck(waiting));
        }
        Ok(())
    }

    fn sanitize(&mut self) {
        for color in Color::ALL {
            let (king_home, kingside_rook, queenside_rook) = match color {
                Color::White => (Square::E1, Square::H1, Square::A1),
                Color::Black => (Square::E8, Square::H8, Square::A8),
            };
            let rooks = self.pieces_of(Piece::Rook, color);
            if !self.pieces_of(Piece::King, color).contains(king_home) {
                self.castling.remove_color(color);
            }
            if !rooks.contains(kingside_rook) {
                self.castling.remove_kingside(color);
            }
            if !rooks.contains(queenside_rook) {
                self.castling.remove_queenside(color);
            }
        }

        if let Some(ep) = self.en_passant {
            if !self.en_passant_is_capturable(ep) {
                self.en_passant = None;
            }
        }
    }

    /// True when `ep` sits behind a pawn that just double-pushed and a pawn
    /// of the side to move can capture onto it.
    pub(crate) fn en_passant_is_capturable(&self, ep: Square) -> bool {
        let us = self.side_to_move;
        let them = us.opposite();
        let (expected_rank, pushed_rank_delta) = match us {
            Color::White => (5, -1),
            Color::Black => (2, 1),
        };
        if ep.rank_index() != expected_rank || self.occupied().contains(ep) {
            return false;
        }
        let pushed_pawn = ep.offset(0, pushed_rank_delta);
        let pushed_ok =
            pushed_pawn.is_some_and(|sq| self.pieces_of(Piece::Pawn, them).contains(sq));
        pushed_ok && (pawn_attacks(ep, them) & self.pieces_of(Piece::Pawn, us)).is_not_empty()
    }

    /// Places a piece, replacing whatever stood on the square.
    pub fn put(&mut self, sq: Square, piece: Piece, color: Color) {
        self.remove(sq);
        self.pieces[piece.index()].set(sq);
        self.colors[color.index()].set(sq);
    }

    /// Empties a square.
    pub fn remove(&mut self, sq: Square) {
        for bb in self.pieces.iter_mut().chain(self.colors.iter_mut()) {
            bb.clear(sq);
        }
    }

    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let color = Color::ALL
            .into_iter()
            .find(|c| self.colors[c.index()].contains(sq))?;
        Piece::ALL
            .into_iter()
            .find(|p| self.pieces[p.index()].contains(sq))
            .map(|piece| (piece, color))
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).lsb()
    }

    /// Zobrist hash of placement, side to move, castling and en passant.
    pub fn zobrist_hash(&self) -> u64 {
        crate::zobrist::hash(self)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}
