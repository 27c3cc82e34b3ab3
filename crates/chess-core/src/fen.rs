//! FEN (Forsyth-Edwards Notation) tokenizing.
//!
//! [`FenFields`] checks the syntax of each field and decodes the piece
//! placement into a square-indexed array. Semantic checks that need move
//! generation (king safety, king counts) belong to the rules engine.

use crate::{Color, Piece, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when tokenizing a FEN record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 to 6 fields, got {0}")]
    FieldCount(usize),

    #[error("invalid piece placement: {0}")]
    Placement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    ActiveColor(String),

    #[error("invalid castling rights: {0}")]
    Castling(String),

    #[error("invalid en passant square: {0}")]
    EnPassant(String),

    #[error("invalid halfmove clock: {0}")]
    HalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    FullmoveNumber(String),
}

/// The decoded fields of a FEN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenFields {
    /// Occupant of each square, indexed `a1 = 0` ... `h8 = 63`.
    pub board: [Option<(Piece, Color)>; 64],
    pub active_color: Color,
    /// Castling letters in `KQkq` order; empty when none.
    pub castling: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenFields {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// An empty board, White to move.
    pub const EMPTY: &'static str = "8/8/8/8/8/8/8/8 w - - 0 1";

    /// Tokenizes a FEN record. The two clock fields may be omitted.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&parts.len()) {
            return Err(FenError::FieldCount(parts.len()));
        }

        let board = Self::parse_placement(parts[0])?;

        let active_color = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::ActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;

        let en_passant = match parts[3] {
            "-" => None,
            s => match Square::from_algebraic(s) {
                Some(sq) if sq.rank_index() == 2 || sq.rank_index() == 5 => Some(sq),
                _ => return Err(FenError::EnPassant(s.to_string())),
            },
        };

        let halfmove_clock = match parts.get(4) {
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| FenError::HalfmoveClock(s.to_string()))?,
            None => 0,
        };

        let fullmove_number = match parts.get(5) {
            Some(s) => match s.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(FenError::FullmoveNumber(s.to_string())),
            },
            None => 1,
        };

        Ok(FenFields {
            board,
            active_color,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<[Option<(Piece, Color)>; 64], FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::Placement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = [None; 64];
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip as u8;
                } else if let Some(occupant) = Piece::from_fen_char(c) {
                    if file < 8 {
                        board[(rank * 8 + file) as usize] = Some(occupant);
                    }
                    file += 1;
                } else {
                    return Err(FenError::Placement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        rank + 1
                    )));
                }
                if file > 8 {
                    break;
                }
            }
            if file != 8 {
                return Err(FenError::Placement(format!(
                    "rank {} covers {} squares, expected 8",
                    rank + 1,
                    file
                )));
            }
        }
        Ok(board)
    }

    fn parse_castling(castling: &str) -> Result<String, FenError> {
        if castling == "-" {
            return Ok(String::new());
        }
        let mut ordered = String::new();
        for flag in ['K', 'Q', 'k', 'q'] {
            if castling.contains(flag) {
                ordered.push(flag);
            }
        }
        if ordered.len() != castling.len() {
            return Err(FenError::Castling(castling.to_string()));
        }
        Ok(ordered)
    }
}

impl fmt::Display for FenFields {
    /// Writes all six fields.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            let mut gap = 0;
            for file in 0..8 {
                match self.board[rank * 8 + file] {
                    Some((piece, color)) => {
                        if gap > 0 {
                            write!(f, "{gap}")?;
                            gap = 0;
                        }
                        write!(f, "{}", piece.to_fen_char(color))?;
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                write!(f, "{gap}")?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }

        let castling = if self.castling.is_empty() {
            "-"
        } else {
            self.castling.as_str()
        };
        let en_passant = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_algebraic());
        write!(
            f,
            " {} {} {} {} {}",
            self.active_color.fen_char(),
            castling,
            en_passant,
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_startpos() {
        let fen = FenFields::parse(FenFields::STARTPOS).unwrap();
        assert_eq!(fen.active_color, Color::White);
        assert_eq!(fen.castling, "KQkq");
        assert_eq!(fen.en_passant, None);
        assert_eq!(fen.board[Square::E1.index() as usize], Some((Piece::King, Color::White)));
        assert_eq!(fen.board[Square::D8.index() as usize], Some((Piece::Queen, Color::Black)));
        assert_eq!(fen.board.iter().filter(|o| o.is_some()).count(), 32);
    }

    #[test]
    fn display_roundtrips() {
        for fen in [
            FenFields::STARTPOS,
            FenFields::EMPTY,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        ] {
            assert_eq!(FenFields::parse(fen).unwrap().to_string(), fen);
        }
        let short = FenFields::parse("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(short.to_string(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn clocks_are_optional() {
        let fen = FenFields::parse("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(fen.active_color, Color::Black);
        assert_eq!(fen.halfmove_clock, 0);
        assert_eq!(fen.fullmove_number, 1);
    }

    #[test]
    fn en_passant_square() {
        let fen =
            FenFields::parse("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        assert_eq!(fen.en_passant, Square::from_algebraic("e3"));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w - e4 0 1"),
            Err(FenError::EnPassant(_))
        ));
    }

    #[test]
    fn castling_is_normalized() {
        let fen = FenFields::parse("r3k2r/8/8/8/8/8/8/R3K2R w qK - 0 1").unwrap();
        assert_eq!(fen.castling, "Kq");
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w XYZ - 0 1"),
            Err(FenError::Castling(_))
        ));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w KK - 0 1"),
            Err(FenError::Castling(_))
        ));
    }

    #[test]
    fn reject_bad_placement() {
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            FenFields::parse("rnbqkbnrr/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            FenFields::parse("7/8/8/8/8/8/8/8 w - - 0 1"),
            Err(FenError::Placement(_))
        ));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/7X w - - 0 1"),
            Err(FenError::Placement(_))
        ));
    }

    #[test]
    fn reject_bad_fields() {
        assert!(matches!(FenFields::parse("invalid"), Err(FenError::FieldCount(1))));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 x - - 0 1"),
            Err(FenError::ActiveColor(_))
        ));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w - - abc 1"),
            Err(FenError::HalfmoveClock(_))
        ));
        assert!(matches!(
            FenFields::parse("8/8/8/8/8/8/8/8 w - - 0 0"),
            Err(FenError::FullmoveNumber(_))
        ));
    }

    #[test]
    fn error_messages_name_the_field() {
        assert!(FenError::ActiveColor("x".into()).to_string().contains("'x'"));
        assert!(FenError::FieldCount(3).to_string().contains('3'));
    }
}
