use copycat::board::Position;
use copycat::eval::ClassicalScorer;
use copycat::library::MoveLibrary;
use copycat::select::Controller;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

fn bench_decide(c: &mut Criterion) {
    let ctrl = Controller::new(
        Arc::new(MoveLibrary::embedded()),
        Arc::new(ClassicalScorer::default()),
    );
    let stop = AtomicBool::new(false);

    let startpos = Position::startpos();
    c.bench_function("decide_book_hit", |ben| {
        ben.iter(|| {
            let info = ctrl.decide(black_box(startpos.board()), Duration::from_secs(1), &stop);
            black_box(info)
        })
    });

    // A position no book covers, forcing the full oracle scoring pass.
    let mid = Position::from_fen("r1bq1rk1/pp2ppbp/2np1np1/8/2PNP3/2N1B3/PP2BPPP/R2Q1RK1 w - - 0 9")
        .expect("valid middlegame fen");
    let bookless = Controller::new(
        Arc::new(MoveLibrary::empty()),
        Arc::new(ClassicalScorer::default()),
    );
    c.bench_function("decide_oracle_middlegame", |ben| {
        ben.iter(|| {
            let info = bookless.decide(black_box(mid.board()), Duration::from_secs(1), &stop);
            black_box(info)
        })
    });
}

criterion_group!(benches, bench_decide);
criterion_main!(benches);
