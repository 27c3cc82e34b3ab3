//! Attack sets for every piece kind.
//!
//! Leaper tables and slider rays are built at compile time. Sliding attacks
//! walk each ray up to the first blocker, found with a bit scan in the ray's
//! direction.

use crate::Bitboard;
use chess_core::{Color, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Ray directions as (file, rank) steps. The first four run toward higher
/// square indices, the last four toward lower ones.
const RAY_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 0),
    (1, 1),
    (-1, 1),
    (0, -1),
    (-1, 0),
    (-1, -1),
    (1, -1),
];

const ROOK_RAYS: [usize; 4] = [0, 1, 4, 5];
const BISHOP_RAYS: [usize; 4] = [2, 3, 6, 7];

const KNIGHT_ATTACKS: [Bitboard; 64] = leaper_table(&KNIGHT_DELTAS);
const KING_ATTACKS: [Bitboard; 64] = leaper_table(&KING_DELTAS);
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    leaper_table(&[(-1, 1), (1, 1)]),
    leaper_table(&[(-1, -1), (1, -1)]),
];
const RAYS: [[Bitboard; 64]; 8] = ray_tables();

const fn on_board(file: i8, rank: i8) -> bool {
    file >= 0 && file < 8 && rank >= 0 && rank < 8
}

const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < deltas.len() {
            let (df, dr) = deltas[i];
            if on_board(file + df, rank + dr) {
                bits |= 1u64 << (((rank + dr) * 8 + file + df) as u32);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

const fn ray_tables() -> [[Bitboard; 64]; 8] {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = RAY_DIRECTIONS[dir];
        let mut sq = 0;
        while sq < 64 {
            let mut file = (sq % 8) as i8 + df;
            let mut rank = (sq / 8) as i8 + dr;
            let mut bits = 0u64;
            while on_board(file, rank) {
                bits |= 1u64 << ((rank * 8 + file) as u32);
                file += df;
                rank += dr;
            }
            rays[dir][sq] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    rays
}

#[inline]
fn ray_attacks(dir: usize, sq: Square, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[dir][sq.index() as usize];
    let blockers = ray & occupied;
    let first = if dir < 4 { blockers.lsb() } else { blockers.msb() };
    match first {
        Some(blocker) => ray & !RAYS[dir][blocker.index() as usize],
        None => ray,
    }
}

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ROOK_RAYS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(dir, sq, occupied))
}

pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    BISHOP_RAYS
        .iter()
        .fold(Bitboard::EMPTY, |acc, &dir| acc | ray_attacks(dir, sq, occupied))
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn bb(squares: &[&str]) -> Bitboard {
        squares
            .iter()
            .fold(Bitboard::EMPTY, |acc, s| acc | Bitboard::from_square(sq(s)))
    }

    #[test]
    fn knight_counts() {
        assert_eq!(knight_attacks(sq("d4")).count(), 8);
        assert_eq!(knight_attacks(sq("a1")).count(), 2);
        assert_eq!(knight_attacks(sq("a4")).count(), 4);
        assert!(knight_attacks(sq("e4")).contains(sq("f6")));
        assert!(knight_attacks(sq("e4")).contains(sq("c3")));
    }

    #[test]
    fn king_counts() {
        assert_eq!(king_attacks(sq("d4")).count(), 8);
        assert_eq!(king_attacks(sq("a1")).count(), 3);
        assert_eq!(king_attacks(sq("a4")).count(), 5);
    }

    #[test]
    fn pawn_attack_direction() {
        assert_eq!(pawn_attacks(sq("d4"), Color::White), bb(&["c5", "e5"]));
        assert_eq!(pawn_attacks(sq("d4"), Color::Black), bb(&["c3", "e3"]));
        assert_eq!(pawn_attacks(sq("a4"), Color::White), bb(&["b5"]));
        assert!(pawn_attacks(sq("d8"), Color::White).is_empty());
    }

    #[test]
    fn rook_on_empty_board() {
        assert_eq!(rook_attacks(sq("d4"), Bitboard::EMPTY).count(), 14);
        assert_eq!(rook_attacks(sq("a1"), Bitboard::EMPTY).count(), 14);
    }

    #[test]
    fn rook_stops_at_blockers() {
        let occupied = bb(&["d6", "b4", "d1"]);
        let attacks = rook_attacks(sq("d4"), occupied);
        assert!(attacks.contains(sq("d5")));
        assert!(attacks.contains(sq("d6")));
        assert!(!attacks.contains(sq("d7")));
        assert!(attacks.contains(sq("b4")));
        assert!(!attacks.contains(sq("a4")));
        assert!(attacks.contains(sq("d1")));
        assert!(attacks.contains(sq("h4")));
    }

    #[test]
    fn bishop_stops_at_blockers() {
        let occupied = bb(&["f6", "b2"]);
        let attacks = bishop_attacks(sq("d4"), occupied);
        assert!(attacks.contains(sq("e5")));
        assert!(attacks.contains(sq("f6")));
        assert!(!attacks.contains(sq("g7")));
        assert!(attacks.contains(sq("b2")));
        assert!(!attacks.contains(sq("a1")));
        assert!(attacks.contains(sq("a7")));
        assert!(attacks.contains(sq("g1")));
        assert_eq!(bishop_attacks(sq("d4"), Bitboard::EMPTY).count(), 13);
    }

    #[test]
    fn queen_is_rook_plus_bishop() {
        assert_eq!(queen_attacks(sq("d4"), Bitboard::EMPTY).count(), 27);
    }
}
