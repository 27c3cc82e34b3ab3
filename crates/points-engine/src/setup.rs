//! Editable board for arranging a custom starting position.

use crate::game::GameError;
use chess_core::{Color, FenFields, Piece, Square};
use chess_rules::{Position, PositionError};

/// A board under construction. Anything may be placed; the rules are only
/// checked by [`Setup::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setup {
    fields: FenFields,
}

impl Default for Setup {
    fn default() -> Self {
        Self::empty()
    }
}

impl Setup {
    /// An empty board with White to move.
    pub fn empty() -> Self {
        Setup {
            fields: FenFields {
                board: [None; 64],
                active_color: Color::White,
                castling: String::new(),
                en_passant: None,
                halfmove_clock: 0,
                fullmove_number: 1,
            },
        }
    }

    /// Loads a FEN record for further editing. Only the syntax is checked.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let fields = FenFields::parse(fen).map_err(PositionError::from)?;
        Ok(Setup { fields })
    }

    /// Places a piece, replacing any occupant.
    pub fn put(&mut self, square: Square, piece: Piece, color: Color) {
        self.fields.board[square.index() as usize] = Some((piece, color));
        self.fields.en_passant = None;
    }

    /// Empties a square; returns what stood there.
    pub fn remove(&mut self, square: Square) -> Option<(Piece, Color)> {
        self.fields.en_passant = None;
        self.fields.board[square.index() as usize].take()
    }

    /// Removes every piece and castling right.
    pub fn clear(&mut self) {
        self.fields.board = [None; 64];
        self.fields.castling.clear();
        self.fields.en_passant = None;
    }

    /// Chooses which side makes the first move.
    pub fn side_to_move(&mut self, color: Color) {
        if self.fields.active_color != color {
            self.fields.en_passant = None;
        }
        self.fields.active_color = color;
    }

    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        self.fields.board[square.index() as usize]
    }

    pub fn to_fen(&self) -> String {
        self.fields.to_string()
    }

    /// Checks that the arrangement can start a game: one king per side, no
    /// pawn on the first or last rank, and the side not to move not in check.
    pub fn validate(&self) -> Result<Position, GameError> {
        Ok(Position::from_fields(&self.fields)?)
    }
}
