use copycat::eval::{EvalResult, Scorer};
use copycat::library::MoveLibrary;
use copycat::select::{Controller, Decision};
use cozy_chess::Board;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

struct Slow(Duration);

impl Scorer for Slow {
    fn score(&self, _board: &Board) -> EvalResult {
        thread::sleep(self.0);
        EvalResult::score(0)
    }
    fn name(&self) -> &'static str {
        "slow"
    }
}

// A scorer that would take seconds per position must not drag a decision
// far past its budget; candidates past the deadline stay unscored.
#[test]
fn slow_oracle_respects_budget() {
    let ctrl = Controller::new(
        Arc::new(MoveLibrary::empty()),
        Arc::new(Slow(Duration::from_millis(50))),
    );
    let stop = AtomicBool::new(false);
    let t0 = Instant::now();
    let info = ctrl.decide(&Board::default(), Duration::from_millis(150), &stop);
    let elapsed = t0.elapsed();
    assert!(matches!(info.decision, Decision::Move(_)));
    assert!(elapsed < Duration::from_secs(2), "decision took {:?}", elapsed);
}

#[test]
fn stop_flag_cuts_a_long_decision_short() {
    let ctrl = Controller::new(
        Arc::new(MoveLibrary::empty()),
        Arc::new(Slow(Duration::from_millis(30))),
    );
    let stop = Arc::new(AtomicBool::new(false));
    let stopper = {
        let stop = stop.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            stop.store(true, Ordering::Relaxed);
        })
    };
    let t0 = Instant::now();
    let info = ctrl.decide(&Board::default(), Duration::from_secs(30), &stop);
    let elapsed = t0.elapsed();
    stopper.join().unwrap();
    assert!(matches!(info.decision, Decision::Move(_)), "stop must still yield a move");
    assert!(elapsed < Duration::from_secs(5), "stop ignored, ran {:?}", elapsed);
}
