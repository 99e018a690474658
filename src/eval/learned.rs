//! Scorer backed by a trained weight artifact. The model is treated as an
//! opaque blob: a linear layer over a 768-feature piece-square encoding,
//! oriented to the side to move.

use anyhow::{bail, Context, Result};
use cozy_chess::{Board, Color, Piece};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::{EvalResult, Scorer};
use crate::board::square_index;

const MAGIC: &[u8; 8] = b"COPYWT01";
const INPUT_DIM: usize = 12 * 64;

pub struct LearnedScorer {
    weights: Vec<f32>,
    bias: f32,
}

impl LearnedScorer {
    /// Artifact layout, all little-endian:
    ///   magic: 8 bytes b"COPYWT01"
    ///   u32 version
    ///   u32 input_dim (must be 768)
    ///   f32 weights[input_dim]
    ///   f32 bias
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(&path)
            .with_context(|| format!("open model file: {}", path.as_ref().display()))?;
        let mut r = BufReader::new(f);
        let mut magic = [0u8; 8];
        r.read_exact(&mut magic).context("read magic")?;
        if &magic != MAGIC {
            bail!("bad model magic");
        }
        let mut b4 = [0u8; 4];
        r.read_exact(&mut b4).context("read version")?;
        let _version = u32::from_le_bytes(b4);
        r.read_exact(&mut b4).context("read input_dim")?;
        let input_dim = u32::from_le_bytes(b4) as usize;
        if input_dim != INPUT_DIM {
            bail!("model input_dim {} does not match expected {}", input_dim, INPUT_DIM);
        }
        let mut weights = Vec::with_capacity(input_dim);
        for _ in 0..input_dim {
            r.read_exact(&mut b4).context("read weights")?;
            weights.push(f32::from_le_bytes(b4));
        }
        r.read_exact(&mut b4).context("read bias")?;
        let bias = f32::from_le_bytes(b4);
        Ok(Self { weights, bias })
    }

    pub fn from_weights(weights: Vec<f32>, bias: f32) -> Self {
        Self { weights, bias }
    }
}

// Feature slot for a piece relative to the side to move: own pieces 0..5,
// opponent pieces 6..11; squares mirrored for black so the encoding is
// orientation-free.
fn feature_index(stm: Color, owner: Color, piece: Piece, sq_idx: usize) -> usize {
    let p = match piece {
        Piece::Pawn => 0,
        Piece::Knight => 1,
        Piece::Bishop => 2,
        Piece::Rook => 3,
        Piece::Queen => 4,
        Piece::King => 5,
    };
    let slot = if owner == stm { p } else { 6 + p };
    let oriented = if stm == Color::White { sq_idx } else { sq_idx ^ 56 };
    slot * 64 + oriented
}

impl Scorer for LearnedScorer {
    fn score(&self, board: &Board) -> EvalResult {
        if self.weights.len() != INPUT_DIM {
            return EvalResult::unavailable();
        }
        let stm = board.side_to_move();
        let mut acc = self.bias;
        for &owner in &[Color::White, Color::Black] {
            for &piece in &[
                Piece::Pawn,
                Piece::Knight,
                Piece::Bishop,
                Piece::Rook,
                Piece::Queen,
                Piece::King,
            ] {
                for sq in board.colors(owner) & board.pieces(piece) {
                    acc += self.weights[feature_index(stm, owner, piece, square_index(sq))];
                }
            }
        }
        let cp = acc * 100.0;
        if !cp.is_finite() {
            return EvalResult::unavailable();
        }
        EvalResult::score(cp.clamp(-3_000.0, 3_000.0) as i32)
    }

    fn name(&self) -> &'static str {
        "learned"
    }
}
