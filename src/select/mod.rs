//! The staged decision engine: book lookup, oracle scoring, then a uniform
//! fallback. Each stage proposes a move or declares itself unavailable; the
//! first proposal wins. The returned move is always legal in the input
//! position, whatever state the book or oracle artifacts are in.

use cozy_chess::{Board, Move};
use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rayon::prelude::*;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::legal_moves;
use crate::eval::Scorer;
use crate::fingerprint;
use crate::library::MoveLibrary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Move(Move),
    /// No legal moves: checkmate or stalemate, reported as game over.
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Book,
    Oracle,
    Fallback,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Book => write!(f, "book"),
            Stage::Oracle => write!(f, "oracle"),
            Stage::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecisionInfo {
    pub decision: Decision,
    pub stage: Option<Stage>,
    pub elapsed: Duration,
}

pub struct Controller {
    library: Arc<MoveLibrary>,
    oracle: Arc<dyn Scorer>,
}

impl Controller {
    pub fn new(library: Arc<MoveLibrary>, oracle: Arc<dyn Scorer>) -> Self {
        Self { library, oracle }
    }

    pub fn library(&self) -> &MoveLibrary {
        &self.library
    }

    pub fn oracle(&self) -> &dyn Scorer {
        self.oracle.as_ref()
    }

    /// One move decision under a wall-clock budget. `stop` is the shared
    /// cancellation flag, checked between candidate evaluations.
    pub fn decide(&self, board: &Board, budget: Duration, stop: &AtomicBool) -> DecisionInfo {
        let start = Instant::now();
        let legal = legal_moves(board);
        if legal.is_empty() {
            return DecisionInfo { decision: Decision::Terminal, stage: None, elapsed: start.elapsed() };
        }
        let deadline = start + budget;

        if let Some(m) = self.propose_book(board, &legal) {
            return DecisionInfo {
                decision: Decision::Move(m),
                stage: Some(Stage::Book),
                elapsed: start.elapsed(),
            };
        }

        if Instant::now() < deadline && !stop.load(Ordering::Relaxed) {
            let proposed = catch_unwind(AssertUnwindSafe(|| {
                self.propose_oracle(board, &legal, deadline, stop)
            }))
            .unwrap_or_else(|_| {
                debug!("oracle stage panicked; treating as unavailable");
                None
            });
            if let Some(m) = proposed {
                return DecisionInfo {
                    decision: Decision::Move(m),
                    stage: Some(Stage::Oracle),
                    elapsed: start.elapsed(),
                };
            }
        }

        let m = propose_fallback(&legal);
        DecisionInfo {
            decision: Decision::Move(m),
            stage: Some(Stage::Fallback),
            elapsed: start.elapsed(),
        }
    }

    // Highest-weight legal book candidate. Entries are pre-sorted by weight,
    // success, then UCI text; recorded moves that are illegal here (chance
    // fingerprint collision from another game path) are skipped outright.
    fn propose_book(&self, board: &Board, legal: &[Move]) -> Option<Move> {
        let entries = self.library.lookup(fingerprint::compute(board));
        if entries.is_empty() {
            return None;
        }
        let by_uci: Vec<(String, Move)> = legal.iter().map(|&m| (format!("{m}"), m)).collect();
        for e in entries {
            if let Some((_, m)) = by_uci.iter().find(|(u, _)| *u == e.uci) {
                return Some(*m);
            }
        }
        None
    }

    // Scores every candidate's child position in parallel and merges
    // deterministically: best value, ties to the lexicographically smallest
    // UCI text, regardless of completion order. Candidates reached after the
    // deadline or a stop request stay unscored.
    fn propose_oracle(
        &self,
        board: &Board,
        legal: &[Move],
        deadline: Instant,
        stop: &AtomicBool,
    ) -> Option<Move> {
        let scored: Vec<(String, Move, Option<i32>)> = legal
            .par_iter()
            .map(|&m| {
                let uci = format!("{m}");
                if stop.load(Ordering::Relaxed) || Instant::now() >= deadline {
                    return (uci, m, None);
                }
                let mut child = board.clone();
                child.play(m);
                let r = self.oracle.score(&child);
                // Negamax: the child is scored for the opponent.
                if r.valid { (uci, m, Some(-r.cp)) } else { (uci, m, None) }
            })
            .collect();

        let mut best: Option<(&str, Move, i32)> = None;
        for (uci, m, value) in &scored {
            let Some(v) = value else { continue };
            let better = match &best {
                None => true,
                Some((bu, _, bv)) => *v > *bv || (*v == *bv && uci.as_str() < *bu),
            };
            if better {
                best = Some((uci.as_str(), *m, *v));
            }
        }
        best.map(|(_, m, _)| m)
    }
}

// Uniform choice among legal moves; the last line of defense is never
// allowed to fail for a non-empty move list.
fn propose_fallback(legal: &[Move]) -> Move {
    let mut rng = rand::rngs::SmallRng::from_entropy();
    *legal.choose(&mut rng).expect("fallback requires a non-empty move list")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::EvalResult;
    use std::collections::HashMap;

    struct Constant(i32);

    impl Scorer for Constant {
        fn score(&self, _board: &Board) -> EvalResult {
            EvalResult::score(self.0)
        }
        fn name(&self) -> &'static str {
            "constant"
        }
    }

    #[test]
    fn oracle_ties_break_to_smallest_uci() {
        let ctrl = Controller::new(
            Arc::new(MoveLibrary::empty()),
            Arc::new(Constant(0)),
        );
        let board = Board::default();
        let stop = AtomicBool::new(false);
        let info = ctrl.decide(&board, Duration::from_millis(500), &stop);
        assert_eq!(info.stage, Some(Stage::Oracle));
        match info.decision {
            Decision::Move(m) => assert_eq!(format!("{m}"), "a2a3"),
            Decision::Terminal => panic!("startpos is not terminal"),
        }
    }

    #[test]
    fn book_outranks_oracle() {
        let fp = fingerprint::compute(&Board::default());
        let mut positions = HashMap::new();
        positions.insert(
            fp,
            vec![crate::library::BookMove { uci: "d2d4".into(), weight: 5.0, success: 0.6 }],
        );
        let lib = MoveLibrary::from_positions("t", positions).unwrap();
        let ctrl = Controller::new(Arc::new(lib), Arc::new(Constant(0)));
        let stop = AtomicBool::new(false);
        let info = ctrl.decide(&Board::default(), Duration::from_millis(500), &stop);
        assert_eq!(info.stage, Some(Stage::Book));
        match info.decision {
            Decision::Move(m) => assert_eq!(format!("{m}"), "d2d4"),
            Decision::Terminal => panic!("startpos is not terminal"),
        }
    }
}
