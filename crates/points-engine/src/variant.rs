//! The Points Chess rule layer: move budgets, captured points, and the extra
//! move for a supported capture on a side's final scheduled move.

use chess_core::{Color, Move, Piece};
use chess_rules::Position;
use std::fmt;

/// Points awarded for capturing a piece.
pub const fn piece_value(piece: Piece) -> u32 {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight | Piece::Bishop => 3,
        Piece::Rook => 5,
        Piece::Queen => 9,
        Piece::King => 0,
    }
}

/// The piece a move removes from the board, if any. An en passant capture
/// takes the pawn beside the destination square.
pub fn captured_piece(position: &Position, m: Move) -> Option<Piece> {
    let mover = position.side_to_move;
    match position.piece_at(m.to()) {
        Some((piece, color)) if color != mover => Some(piece),
        Some(_) => None,
        None => {
            let is_pawn = matches!(position.piece_at(m.from()), Some((Piece::Pawn, _)));
            (is_pawn && position.en_passant == Some(m.to())).then_some(Piece::Pawn)
        }
    }
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl Winner {
    pub const fn side(color: Color) -> Self {
        match color {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Winner::White => "White",
            Winner::Black => "Black",
            Winner::Draw => "Draw",
        })
    }
}

/// Per-game counters layered on top of the board.
///
/// The game is over exactly when a winner is recorded; once set it never
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VariantState {
    max_moves: u32,
    moves_played: [u32; 2],
    points_captured: [u32; 2],
    extra_move_granted: bool,
    current_side: Color,
    winner: Option<Winner>,
    last_move_was_capture: bool,
}

impl VariantState {
    pub fn new(max_moves: u32, first_to_move: Color) -> Self {
        VariantState {
            max_moves,
            moves_played: [0; 2],
            points_captured: [0; 2],
            extra_move_granted: false,
            current_side: first_to_move,
            winner: None,
            last_move_was_capture: false,
        }
    }

    pub fn max_moves(&self) -> u32 {
        self.max_moves
    }

    pub fn moves_played(&self, color: Color) -> u32 {
        self.moves_played[color.index()]
    }

    /// Scheduled moves left; zero once the budget is used, even when an extra
    /// move is pending.
    pub fn moves_remaining(&self, color: Color) -> u32 {
        self.max_moves.saturating_sub(self.moves_played(color))
    }

    pub fn points_captured(&self, color: Color) -> u32 {
        self.points_captured[color.index()]
    }

    pub fn extra_move_granted(&self) -> bool {
        self.extra_move_granted
    }

    pub fn current_side(&self) -> Color {
        self.current_side
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn last_move_was_capture(&self) -> bool {
        self.last_move_was_capture
    }

    /// True when a capture by `side` right now would be its final scheduled
    /// move and could earn an extra move.
    pub fn on_final_move(&self, side: Color) -> bool {
        !self.extra_move_granted && self.moves_played(side) + 1 == self.max_moves
    }

    /// Upper bound on the plies left before the budget ends the game: each
    /// side's remaining scheduled moves, a pending extra move, and one more
    /// possible extra move per side that has not made its final move yet.
    pub fn plies_remaining_upper_bound(&self) -> u32 {
        if self.is_over() {
            return 0;
        }
        Color::ALL
            .into_iter()
            .map(|side| {
                let left = self.moves_remaining(side);
                left + u32::from(left > 0)
            })
            .sum::<u32>()
            + u32::from(self.extra_move_granted)
    }

    /// Folds the counters into one word for position signatures.
    pub(crate) fn fingerprint(&self) -> u64 {
        [
            u64::from(self.moves_played[0]),
            u64::from(self.moves_played[1]),
            u64::from(self.points_captured[0]),
            u64::from(self.points_captured[1]),
            u64::from(self.extra_move_granted),
            u64::from(self.max_moves),
        ]
        .into_iter()
        .fold(0x243F_6A88_85A3_08D3, |acc, field| splitmix64(acc ^ field))
    }

    /// Books a move or pass by `side` and decides whose turn is next.
    ///
    /// Returns true when the move earned an extra move.
    pub(crate) fn record_turn(&mut self, side: Color, points: u32, supported_final_capture: bool) -> bool {
        let idx = side.index();
        self.moves_played[idx] += 1;
        self.points_captured[idx] += points;

        if self.extra_move_granted {
            self.extra_move_granted = false;
            self.current_side = side.opposite();
            false
        } else if supported_final_capture {
            self.extra_move_granted = true;
            true
        } else {
            self.current_side = side.opposite();
            false
        }
    }

    pub(crate) fn set_last_move_was_capture(&mut self, capture: bool) {
        self.last_move_was_capture = capture;
    }

    pub(crate) fn declare_winner(&mut self, winner: Winner) {
        if self.winner.is_none() {
            self.winner = Some(winner);
        }
    }

    /// Ends the game on points once both budgets are spent and no extra move
    /// is pending.
    pub(crate) fn settle_budget(&mut self) {
        let spent = Color::ALL
            .into_iter()
            .all(|side| self.moves_played(side) >= self.max_moves);
        if !spent || self.extra_move_granted {
            return;
        }
        let white = self.points_captured(Color::White);
        let black = self.points_captured(Color::Black);
        self.declare_winner(match white.cmp(&black) {
            std::cmp::Ordering::Greater => Winner::White,
            std::cmp::Ordering::Less => Winner::Black,
            std::cmp::Ordering::Equal => Winner::Draw,
        });
    }
}

/// SplitMix64 finalizer.
pub(crate) const fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
