//! Move representation and coordinate notation.

use crate::{Piece, Square};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing coordinate notation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move '{0}' must be 4 or 5 characters, like e2e4 or e7e8q")]
    Length(String),

    #[error("move '{0}' has an invalid square")]
    Square(String),

    #[error("move '{0}' has an invalid promotion piece")]
    Promotion(String),
}

/// A move: origin, destination, and the promotion kind for pawn promotions.
///
/// Castling is written as the king's two-square move and en passant as the
/// pawn's diagonal step; the position decides which special rule applies.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Piece>,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    #[inline]
    pub const fn with_promotion(from: Square, to: Square, promotion: Piece) -> Self {
        Move {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    #[inline]
    pub const fn from(self) -> Square {
        self.from
    }

    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    #[inline]
    pub const fn promotion(self) -> Option<Piece> {
        self.promotion
    }

    /// Coordinate notation, e.g. `e2e4` or `e7e8q`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }

    /// Parses coordinate notation. The promotion letter may be either case.
    pub fn from_uci(s: &str) -> Result<Self, MoveParseError> {
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(MoveParseError::Length(s.to_string()));
        }
        let from =
            Square::from_algebraic(&s[0..2]).ok_or_else(|| MoveParseError::Square(s.to_string()))?;
        let to =
            Square::from_algebraic(&s[2..4]).ok_or_else(|| MoveParseError::Square(s.to_string()))?;
        match s[4..].chars().next() {
            None => Ok(Move::new(from, to)),
            Some(c) => match Piece::from_letter(c) {
                Some(piece) if Piece::PROMOTIONS.contains(&piece) => {
                    Ok(Move::with_promotion(from, to, piece))
                }
                _ => Err(MoveParseError::Promotion(s.to_string())),
            },
        }
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_uci(s)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece.letter())?;
        }
        Ok(())
    }
}
