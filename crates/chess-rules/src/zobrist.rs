//! Zobrist keys for position hashing.
//!
//! Keys are produced at compile time by an xorshift generator with a fixed
//! seed, so hashes are stable across runs and builds.

use crate::Position;
use chess_core::{Color, Piece};

struct ZobristKeys {
    /// Indexed `[piece][color][square]`.
    pieces: [[[u64; 64]; 2]; 6],
    black_to_move: u64,
    /// Indexed by the castling-rights bit.
    castling: [u64; 4],
    /// Indexed by the file of the en passant square.
    en_passant: [u64; 8],
}

const fn xorshift(mut x: u64) -> u64 {
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

const fn generate_keys() -> ZobristKeys {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    let mut pieces = [[[0u64; 64]; 2]; 6];
    let mut castling = [0u64; 4];
    let mut en_passant = [0u64; 8];

    let mut i = 0;
    while i < 6 * 2 * 64 {
        state = xorshift(state);
        pieces[i / 128][(i / 64) % 2][i % 64] = state;
        i += 1;
    }
    state = xorshift(state);
    let black_to_move = state;
    let mut i = 0;
    while i < 4 {
        state = xorshift(state);
        castling[i] = state;
        i += 1;
    }
    let mut i = 0;
    while i < 8 {
        state = xorshift(state);
        en_passant[i] = state;
        i += 1;
    }

    ZobristKeys {
        pieces,
        black_to_move,
        castling,
        en_passant,
    }
}

static KEYS: ZobristKeys = generate_keys();

/// Hashes placement, side to move, castling rights and en passant file.
pub(crate) fn hash(position: &Position) -> u64 {
    let mut h = 0u64;
    for piece in Piece::ALL {
        for color in Color::ALL {
            for sq in position.pieces_of(piece, color) {
                h ^= KEYS.pieces[piece.index()][color.index()][sq.index() as usize];
            }
        }
    }
    if position.side_to_move == Color::Black {
        h ^= KEYS.black_to_move;
    }
    let rights = position.castling.raw();
    for (bit, key) in KEYS.castling.iter().enumerate() {
        if rights & (1 << bit) != 0 {
            h ^= key;
        }
    }
    if let Some(ep) = position.en_passant {
        h ^= KEYS.en_passant[ep.file_index() as usize];
    }
    h
}
