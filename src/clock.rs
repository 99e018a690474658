use cozy_chess::{Board, Color};
use std::time::Duration;

use crate::board::{in_check, piece_count};

/// Clock fields reported by the `go` command, all in milliseconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClockState {
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u32>,
    pub movetime: Option<u64>,
}

pub const MIN_BUDGET: Duration = Duration::from_millis(100);
pub const MAX_BUDGET: Duration = Duration::from_secs(30);
const DEFAULT_BUDGET: Duration = Duration::from_secs(1);
const DEFAULT_MOVES_TO_GO: u32 = 30;

/// Converts remaining clock and increment into a per-move budget. The
/// budget grows in contested middlegames, shrinks in openings and
/// simplified endgames, and is clamped so a single move can never lose on
/// time by itself.
#[derive(Debug, Default)]
pub struct TimeManager;

impl TimeManager {
    pub fn allocate(&self, clock: &ClockState, board: &Board) -> Duration {
        if let Some(mt) = clock.movetime {
            return Duration::from_millis(mt.max(1));
        }

        let (time_left, inc) = match board.side_to_move() {
            Color::White => (clock.wtime, clock.winc),
            Color::Black => (clock.btime, clock.binc),
        };
        let Some(time_left) = time_left else {
            return DEFAULT_BUDGET;
        };

        let time_left_s = time_left as f64 / 1000.0;
        let inc_s = inc.unwrap_or(0) as f64 / 1000.0;
        let moves_left = clock.movestogo.unwrap_or(DEFAULT_MOVES_TO_GO).max(1) as f64;

        let base = time_left_s / moves_left + inc_s * 0.8;

        let pieces = piece_count(board);
        let mut factor = if pieces >= 28 {
            0.8
        } else if pieces <= 10 {
            0.9
        } else {
            1.2
        };
        if in_check(board) {
            factor *= 1.3;
        }

        let ceiling = (time_left_s / 10.0).min(MAX_BUDGET.as_secs_f64());
        let think = (base * factor).min(ceiling).max(MIN_BUDGET.as_secs_f64());
        Duration::from_secs_f64(think)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock(wtime: u64) -> ClockState {
        ClockState { wtime: Some(wtime), ..ClockState::default() }
    }

    #[test]
    fn movetime_overrides_clock() {
        let tm = TimeManager;
        let c = ClockState { movetime: Some(250), wtime: Some(600_000), ..ClockState::default() };
        assert_eq!(tm.allocate(&c, &Board::default()), Duration::from_millis(250));
    }

    #[test]
    fn no_clock_uses_default_second() {
        let tm = TimeManager;
        assert_eq!(tm.allocate(&ClockState::default(), &Board::default()), Duration::from_secs(1));
    }

    #[test]
    fn floor_holds_under_time_pressure() {
        let tm = TimeManager;
        let b = tm.allocate(&clock(300), &Board::default());
        assert_eq!(b, MIN_BUDGET);
    }

    #[test]
    fn ceiling_caps_long_clocks() {
        let tm = TimeManager;
        // Hours on the clock still never allocates more than the cap.
        let b = tm.allocate(&clock(100_000_000), &Board::default());
        assert!(b <= MAX_BUDGET, "allocated {:?}", b);
    }

    #[test]
    fn middlegame_gets_more_than_opening() {
        use crate::board::Position;
        let tm = TimeManager;
        let c = clock(120_000);
        let opening = tm.allocate(&c, &Board::default());
        // Sparse middlegame-ish position, well under 28 pieces.
        let mid = Position::from_fen("r3k2r/pp3ppp/2n5/8/8/2N2Q2/PP3PPP/R3K2R w KQkq - 0 15")
            .unwrap();
        let middlegame = tm.allocate(&c, mid.board());
        assert!(middlegame > opening, "{:?} !> {:?}", middlegame, opening);
    }
}
