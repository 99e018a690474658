//! Deterministic heuristic scorer: named terms summed with configurable
//! weights. Always available; used when no model artifact is configured.

use anyhow::{Context, Result};
use cozy_chess::{get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks,
    get_rook_moves, Board, Color, Piece, Square};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::{EvalResult, Scorer};
use crate::board::{legal_moves, square_index};

const PAWN: i32 = 100;
const KNIGHT: i32 = 320;
const BISHOP: i32 = 330;
const ROOK: i32 = 500;
const QUEEN: i32 = 900;

const CENTER: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];

/// Per-term multipliers, loaded from a JSON config file or defaulted.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub material: f64,
    pub mobility: f64,
    pub king_safety: f64,
    pub center_control: f64,
    pub development: f64,
    pub hanging_penalty: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            material: 1.0,
            mobility: 1.0,
            king_safety: 1.0,
            center_control: 1.0,
            development: 1.0,
            hanging_penalty: 1.0,
        }
    }
}

pub fn load_weights<P: AsRef<Path>>(path: P) -> Result<Weights> {
    let f = File::open(&path)
        .with_context(|| format!("open eval config: {}", path.as_ref().display()))?;
    let w: Weights = serde_json::from_reader(BufReader::new(f)).context("parse eval config")?;
    Ok(w)
}

pub struct ClassicalScorer {
    weights: Weights,
}

impl ClassicalScorer {
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }
}

impl Default for ClassicalScorer {
    fn default() -> Self {
        Self::new(Weights::default())
    }
}

impl Scorer for ClassicalScorer {
    fn score(&self, board: &Board) -> EvalResult {
        let w = &self.weights;
        // White-minus-black terms, flipped to the side to move at the end.
        let static_cp = w.material * material(board) as f64
            + w.king_safety * king_safety(board) as f64
            + w.center_control * center_control(board) as f64
            + w.development * development(board) as f64
            + w.hanging_penalty * hanging(board) as f64;
        let stm_static = if board.side_to_move() == Color::White { static_cp } else { -static_cp };
        let total = stm_static + w.mobility * mobility(board) as f64;
        if !total.is_finite() {
            return EvalResult::unavailable();
        }
        EvalResult::score(total.clamp(-20_000.0, 20_000.0) as i32)
    }

    fn name(&self) -> &'static str {
        "classical"
    }
}

fn piece_value(p: Piece) -> i32 {
    match p {
        Piece::Pawn => PAWN,
        Piece::Knight => KNIGHT,
        Piece::Bishop => BISHOP,
        Piece::Rook => ROOK,
        Piece::Queen => QUEEN,
        Piece::King => 0,
    }
}

fn count(board: &Board, color: Color, piece: Piece) -> i32 {
    (board.colors(color) & board.pieces(piece)).into_iter().count() as i32
}

fn material(board: &Board) -> i32 {
    let (w, b) = (Color::White, Color::Black);
    (count(board, w, Piece::Pawn) - count(board, b, Piece::Pawn)) * PAWN
        + (count(board, w, Piece::Knight) - count(board, b, Piece::Knight)) * KNIGHT
        + (count(board, w, Piece::Bishop) - count(board, b, Piece::Bishop)) * BISHOP
        + (count(board, w, Piece::Rook) - count(board, b, Piece::Rook)) * ROOK
        + (count(board, w, Piece::Queen) - count(board, b, Piece::Queen)) * QUEEN
}

// Legal-move count for the side to move minus the opponent's (via null
// move); zero when in check, where the null move is illegal.
fn mobility(board: &Board) -> i32 {
    let mine = legal_moves(board).len() as i32;
    let theirs = board
        .null_move()
        .map(|nb| legal_moves(&nb).len() as i32)
        .unwrap_or(mine);
    4 * (mine - theirs)
}

fn attackers(board: &Board, sq: Square, by: Color) -> i32 {
    let occ = board.occupied();
    let them = board.colors(by);
    let mut n = 0i32;
    n += (get_pawn_attacks(sq, !by) & them & board.pieces(Piece::Pawn)).into_iter().count() as i32;
    n += (get_knight_moves(sq) & them & board.pieces(Piece::Knight)).into_iter().count() as i32;
    n += (get_king_moves(sq) & them & board.pieces(Piece::King)).into_iter().count() as i32;
    let diag = board.pieces(Piece::Bishop) | board.pieces(Piece::Queen);
    n += (get_bishop_moves(sq, occ) & them & diag).into_iter().count() as i32;
    let line = board.pieces(Piece::Rook) | board.pieces(Piece::Queen);
    n += (get_rook_moves(sq, occ) & them & line).into_iter().count() as i32;
    n
}

fn king_square(board: &Board, color: Color) -> Square {
    (board.colors(color) & board.pieces(Piece::King))
        .into_iter()
        .next()
        .unwrap_or(Square::E1)
}

fn king_safety_for(board: &Board, color: Color) -> i32 {
    let king = king_square(board, color);
    let file = square_index(king) % 8;
    // Off the center files counts as sheltered (castled or tucked away).
    let castled = file <= 1 || file >= 6;
    let zone = get_king_moves(king);
    let shield = (zone & board.colors(color) & board.pieces(Piece::Pawn))
        .into_iter()
        .count() as i32;
    let mut pressure = 0i32;
    for sq in zone {
        pressure += attackers(board, sq, !color);
    }
    (if castled { 25 } else { 0 }) + 8 * shield - 10 * pressure
}

fn king_safety(board: &Board) -> i32 {
    king_safety_for(board, Color::White) - king_safety_for(board, Color::Black)
}

fn center_for(board: &Board, color: Color) -> i32 {
    let mut score = 0i32;
    for sq in CENTER {
        if let (Some(p), Some(c)) = (board.piece_on(sq), board.color_on(sq)) {
            if c == color {
                score += if p == Piece::Pawn || p == Piece::Knight { 10 } else { 4 };
            }
        }
        score += 3 * attackers(board, sq, color);
    }
    score
}

fn center_control(board: &Board) -> i32 {
    center_for(board, Color::White) - center_for(board, Color::Black)
}

fn development_for(board: &Board, color: Color) -> i32 {
    let minors = board.colors(color) & (board.pieces(Piece::Knight) | board.pieces(Piece::Bishop));
    let home_rank = if color == Color::White { 0 } else { 7 };
    let mut developed = 0i32;
    for sq in minors {
        if square_index(sq) / 8 != home_rank {
            developed += 1;
        }
    }
    12 * developed
}

fn development(board: &Board) -> i32 {
    development_for(board, Color::White) - development_for(board, Color::Black)
}

fn hanging_for(board: &Board, color: Color) -> i32 {
    let mut pen = 0i32;
    for sq in board.colors(color) {
        let Some(p) = board.piece_on(sq) else { continue };
        if p == Piece::King {
            continue;
        }
        if attackers(board, sq, !color) > 0 && attackers(board, sq, color) == 0 {
            pen += piece_value(p) / 8;
        }
    }
    pen
}

fn hanging(board: &Board) -> i32 {
    hanging_for(board, Color::Black) - hanging_for(board, Color::White)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;

    #[test]
    fn startpos_is_balanced() {
        let s = ClassicalScorer::default();
        let r = s.score(&Board::default());
        assert!(r.valid);
        assert_eq!(r.cp, 0, "symmetric position should score zero");
    }

    #[test]
    fn material_up_scores_positive_for_owner() {
        // White is a queen up; white to move sees a big plus.
        let pos = Position::from_fen("k7/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        let s = ClassicalScorer::default();
        let up = s.score(pos.board());
        assert!(up.valid && up.cp > 500, "cp = {}", up.cp);

        // Same position, black to move: score flips sign.
        let pos = Position::from_fen("k7/8/8/8/8/8/8/3QK3 b - - 0 1").unwrap();
        let down = s.score(pos.board());
        assert!(down.cp < -500, "cp = {}", down.cp);
    }

    #[test]
    fn hanging_queen_is_penalized() {
        // Qd4 is en prise to the e5 pawn and undefended; Qd3 is not.
        let loose = Position::from_fen("k7/8/5p2/4p3/3Q4/8/8/K7 w - - 0 1").unwrap();
        let safe = Position::from_fen("k7/8/5p2/4p3/8/3Q4/8/K7 w - - 0 1").unwrap();
        let s = ClassicalScorer::default();
        let loose_cp = s.score(loose.board()).cp;
        let safe_cp = s.score(safe.board()).cp;
        assert!(safe_cp > loose_cp, "safe {} vs loose {}", safe_cp, loose_cp);
    }
}
