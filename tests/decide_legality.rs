use copycat::board::legal_moves;
use copycat::eval::ClassicalScorer;
use copycat::library::MoveLibrary;
use copycat::select::{Controller, Decision};
use cozy_chess::Board;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

// Plays out games from the start position and checks that every decision is
// a member of the legal move list, whichever stage produced it.
#[test]
fn playout_moves_are_always_legal() {
    let ctrl = Controller::new(
        Arc::new(MoveLibrary::embedded()),
        Arc::new(ClassicalScorer::default()),
    );
    let stop = AtomicBool::new(false);
    for _ in 0..3 {
        let mut board = Board::default();
        for _ply in 0..40 {
            let legal = legal_moves(&board);
            let info = ctrl.decide(&board, Duration::from_millis(50), &stop);
            match info.decision {
                Decision::Terminal => {
                    assert!(legal.is_empty(), "terminal reported with legal moves available");
                    break;
                }
                Decision::Move(m) => {
                    assert!(legal.contains(&m), "illegal decision {m} in {board}");
                    board.play(m);
                }
            }
        }
    }
}
