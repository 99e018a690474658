//! Stable position key used by the move library. Piece placement plus side
//! to move; repetition count is deliberately excluded (library entries are
//! path-independent, the legality filter handles accidental collisions).

use cozy_chess::{Board, Color, Piece};
use std::sync::OnceLock;

use crate::board::square_index;

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

static KEYS: OnceLock<[u64; 12 * 64]> = OnceLock::new();
static SIDE: OnceLock<u64> = OnceLock::new();

fn keys() -> &'static [u64; 12 * 64] {
    KEYS.get_or_init(|| {
        let mut t = [0u64; 12 * 64];
        let mut seed = 0x00C0_FFEE_C0DE_BA5E;
        for v in &mut t {
            seed = splitmix64(seed);
            *v = seed;
        }
        t
    })
}

fn side_key() -> u64 {
    *SIDE.get_or_init(|| splitmix64(0x5EED_0F_5EED_CAFE))
}

fn piece_slot(color: Color, piece: Piece) -> usize {
    let p = match piece {
        Piece::Pawn => 0,
        Piece::Knight => 1,
        Piece::Bishop => 2,
        Piece::Rook => 3,
        Piece::Queen => 4,
        Piece::King => 5,
    };
    if color == Color::White { p } else { 6 + p }
}

pub fn compute(board: &Board) -> u64 {
    let table = keys();
    let mut key = 0u64;
    for &color in &[Color::White, Color::Black] {
        for &piece in &[
            Piece::Pawn,
            Piece::Knight,
            Piece::Bishop,
            Piece::Rook,
            Piece::Queen,
            Piece::King,
        ] {
            for sq in board.colors(color) & board.pieces(piece) {
                key ^= table[piece_slot(color, piece) * 64 + square_index(sq)];
            }
        }
    }
    if board.side_to_move() == Color::Black {
        key ^= side_key();
    }
    key
}
