use cozy_chess::Board;

pub mod classical;
pub mod learned;

pub use classical::{ClassicalScorer, Weights};
pub use learned::LearnedScorer;

/// Score in centipawns from the side to move's perspective, plus a validity
/// flag so callers can tell "scorer unavailable" apart from "low score".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalResult {
    pub cp: i32,
    pub valid: bool,
}

impl EvalResult {
    pub fn score(cp: i32) -> Self {
        Self { cp, valid: true }
    }

    pub fn unavailable() -> Self {
        Self { cp: 0, valid: false }
    }
}

/// The evaluation oracle. Implementations must never panic; internal
/// failures surface as `EvalResult::unavailable()`.
pub trait Scorer: Send + Sync {
    fn score(&self, board: &Board) -> EvalResult;
    fn name(&self) -> &'static str;
}
