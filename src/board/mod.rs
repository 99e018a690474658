use cozy_chess::{Board, Color, Move, Piece};

use crate::error::EngineError;
use crate::fingerprint;

/// Full game state for one session: the live board plus the replay that
/// produced it. Consumers never mutate a `Board` in place; applying a move
/// clones and plays, so scratch positions are cheap and isolated.
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
}

impl Position {
    pub fn startpos() -> Self {
        Self { board: Board::default() }
    }

    pub fn from_fen(fen: &str) -> Result<Self, EngineError> {
        Board::from_fen(fen, false)
            .map(|b| Self { board: b })
            .map_err(|e| EngineError::BadFen(format!("{fen}: {e:?}")))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    pub fn fingerprint(&self) -> u64 {
        fingerprint::compute(&self.board)
    }

    /// Applies a move given in UCI coordinates. Standard castling notation
    /// (`e1g1`) is accepted and mapped to the king-takes-rook encoding the
    /// move generator uses.
    pub fn play_uci(&mut self, uci: &str) -> Result<(), EngineError> {
        if let Some(m) = find_move(&self.board, uci) {
            self.board.play(m);
            Ok(())
        } else {
            Err(EngineError::IllegalMove(uci.to_string()))
        }
    }

    pub fn from_fen_and_moves(fen: Option<&str>, moves: &[String]) -> Result<Self, EngineError> {
        let mut pos = match fen {
            Some(f) => Self::from_fen(f)?,
            None => Self::startpos(),
        };
        for m in moves {
            pos.play_uci(m)?;
        }
        Ok(pos)
    }
}

/// All legal moves of the position. The decision engine treats this as the
/// ground truth every stage must stay inside.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    board.generate_moves(|ml| {
        for m in ml {
            out.push(m);
        }
        false
    });
    out
}

pub fn in_check(board: &Board) -> bool {
    !board.checkers().is_empty()
}

pub fn piece_count(board: &Board) -> usize {
    board.occupied().into_iter().count()
}

/// Locates the legal move matching `uci`, accepting the standard castling
/// aliases for the generator's king-takes-rook form.
pub fn find_move(board: &Board, uci: &str) -> Option<Move> {
    let target = castle_alias(board, uci).unwrap_or_else(|| uci.to_string());
    let mut found = None;
    board.generate_moves(|ml| {
        for m in ml {
            if format!("{m}") == target {
                found = Some(m);
                break;
            }
        }
        found.is_some()
    });
    found
}

/// UCI text for a move, folding king-takes-rook castling back into the
/// standard `e1g1` form GUIs expect.
pub fn uci_string(board: &Board, m: Move) -> String {
    let raw = format!("{m}");
    let side = board.side_to_move();
    let is_king = board.pieces(Piece::King).has(m.from);
    let own_rook = (board.colors(side) & board.pieces(Piece::Rook)).has(m.to);
    if is_king && own_rook {
        let std_form = match raw.as_str() {
            "e1h1" => "e1g1",
            "e1a1" => "e1c1",
            "e8h8" => "e8g8",
            "e8a8" => "e8c8",
            _ => return raw,
        };
        return std_form.to_string();
    }
    raw
}

// Standard castling UCI -> generator encoding, only when the side's king is
// still on its home square.
fn castle_alias(board: &Board, uci: &str) -> Option<String> {
    let side = board.side_to_move();
    let aliased = match (uci, side) {
        ("e1g1", Color::White) => "e1h1",
        ("e1c1", Color::White) => "e1a1",
        ("e8g8", Color::Black) => "e8h8",
        ("e8c8", Color::Black) => "e8a8",
        _ => return None,
    };
    let king_home = &uci[0..2];
    let mut on_home = false;
    for sq in board.colors(side) & board.pieces(Piece::King) {
        on_home = format!("{sq}") == king_home;
    }
    if on_home {
        Some(aliased.to_string())
    } else {
        None
    }
}

/// 0..63 index with a1 = 0, h8 = 63.
pub fn square_index(sq: cozy_chess::Square) -> usize {
    let s = format!("{sq}");
    let b = s.as_bytes();
    let file = (b[0] - b'a') as usize;
    let rank = (b[1] - b'1') as usize;
    rank * 8 + file
}
