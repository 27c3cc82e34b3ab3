//! ASCII board diagrams.

use chess_core::{Color, File, Piece, Rank, Square};
use std::fmt::Write;

/// Draws the board with rank 8 at the top. Empty squares are `.`.
pub fn render(piece_at: impl Fn(Square) -> Option<(Piece, Color)>) -> String {
    let mut out = String::new();
    out.push_str("  +-----------------+\n");
    for rank in Rank::ALL.iter().rev() {
        let _ = write!(out, "{} |", rank.to_char());
        for file in File::ALL {
            let c = piece_at(Square::new(file, *rank))
                .map(|(piece, color)| piece.to_fen_char(color))
                .unwrap_or('.');
            let _ = write!(out, " {c}");
        }
        out.push_str(" |\n");
    }
    out.push_str("  +-----------------+\n");
    out.push_str("    a b c d e f g h");
    out
}
