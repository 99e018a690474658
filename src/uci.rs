use anyhow::Result;
use log::debug;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use crate::board::{uci_string, Position};
use crate::clock::{ClockState, TimeManager};
use crate::select::{Controller, Decision};

pub const ENGINE_NAME: &str = "Copycat 0.1";
pub const ENGINE_AUTHOR: &str = "Copycat Team";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    Idle,
    Ready,
    Searching,
    Terminated,
}

/// Protocol-visible state for one game: the live position, the replay that
/// built it, the last reported clocks, and the debug toggle. Reset by
/// `ucinewgame`; debug survives, it is a session setting rather than a game
/// setting.
struct SessionState {
    position: Position,
    moves: Vec<String>,
    clock: ClockState,
    debug: bool,
}

impl SessionState {
    fn new(debug: bool) -> Self {
        Self {
            position: Position::startpos(),
            moves: Vec::new(),
            clock: ClockState::default(),
            debug,
        }
    }
}

/// Synchronous command loop around the decision engine. One command is
/// processed at a time; the stop flag is raised from the stdin pump thread
/// so an in-flight decision returns its best candidate so far.
pub struct UciSession {
    state: ProtocolState,
    session: SessionState,
    controller: Controller,
    timer: TimeManager,
    stop: Arc<AtomicBool>,
}

impl UciSession {
    pub fn new(controller: Controller) -> Self {
        Self {
            state: ProtocolState::Idle,
            session: SessionState::new(false),
            controller,
            timer: TimeManager,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.session.debug = debug;
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Handles one command line, writing any protocol output to `out`.
    /// Malformed input is answered with an `info string` diagnostic; the
    /// session keeps going.
    pub fn dispatch(&mut self, line: &str, out: &mut dyn Write) -> io::Result<()> {
        let line = line.trim();
        if line.is_empty() || self.state == ProtocolState::Terminated {
            return Ok(());
        }
        let (cmd, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };
        match cmd {
            "uci" => self.cmd_uci(out),
            "isready" => writeln!(out, "readyok"),
            "ucinewgame" => {
                self.session = SessionState::new(self.session.debug);
                Ok(())
            }
            "position" => self.cmd_position(rest, out),
            "go" => self.cmd_go(rest, out),
            "stop" => {
                // The pump thread raised the flag while the search was
                // running; by the time this line is dispatched the search is
                // done and the flag has been consumed.
                debug!("stop received outside of a search");
                Ok(())
            }
            "debug" => {
                self.session.debug = rest.eq_ignore_ascii_case("on");
                Ok(())
            }
            "setoption" => self.cmd_setoption(rest, out),
            "quit" => {
                self.state = ProtocolState::Terminated;
                Ok(())
            }
            other => writeln!(out, "info string unknown command: {other}"),
        }
    }

    fn cmd_uci(&mut self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "id name {ENGINE_NAME}")?;
        writeln!(out, "id author {ENGINE_AUTHOR}")?;
        writeln!(out, "option name Debug type check default false")?;
        writeln!(out, "uciok")?;
        if self.state == ProtocolState::Idle {
            self.state = ProtocolState::Ready;
        }
        Ok(())
    }

    fn cmd_setoption(&mut self, rest: &str, out: &mut dyn Write) -> io::Result<()> {
        let mut tokens = rest.split_whitespace();
        let name = match (tokens.next(), tokens.next()) {
            (Some("name"), Some(n)) => n,
            _ => return writeln!(out, "info string malformed setoption"),
        };
        let value = match (tokens.next(), tokens.next()) {
            (Some("value"), Some(v)) => v,
            _ => return writeln!(out, "info string malformed setoption"),
        };
        if name.eq_ignore_ascii_case("debug") {
            self.session.debug = value.eq_ignore_ascii_case("true");
            Ok(())
        } else {
            writeln!(out, "info string unknown option: {name}")
        }
    }

    // Supports 'position startpos [moves ...]' and
    // 'position fen <6 fields> [moves ...]'. On any error the previous
    // position stays in place.
    fn cmd_position(&mut self, rest: &str, out: &mut dyn Write) -> io::Result<()> {
        let mut tokens = rest.split_whitespace();
        let fen_owned;
        let fen: Option<&str> = match tokens.next() {
            Some("startpos") => None,
            Some("fen") => {
                let fields: Vec<&str> = tokens.by_ref().take(6).collect();
                if fields.len() != 6 {
                    return writeln!(out, "info string malformed position: incomplete FEN");
                }
                fen_owned = fields.join(" ");
                Some(fen_owned.as_str())
            }
            _ => return writeln!(out, "info string malformed position command"),
        };
        let moves: Vec<String> = match tokens.next() {
            Some("moves") => tokens.map(str::to_string).collect(),
            Some(other) => {
                return writeln!(out, "info string malformed position: unexpected '{other}'")
            }
            None => Vec::new(),
        };
        match Position::from_fen_and_moves(fen, &moves) {
            Ok(pos) => {
                self.session.position = pos;
                self.session.moves = moves;
                Ok(())
            }
            Err(e) => writeln!(out, "info string {e}"),
        }
    }

    fn cmd_go(&mut self, rest: &str, out: &mut dyn Write) -> io::Result<()> {
        if self.state == ProtocolState::Idle {
            debug!("go before uci handshake; answering anyway");
        }
        let mut clock = ClockState::default();
        let mut tokens = rest.split_whitespace();
        while let Some(tok) = tokens.next() {
            let num =
                |t: &mut std::str::SplitWhitespace<'_>| t.next().and_then(|s| s.parse::<u64>().ok());
            match tok {
                "wtime" => clock.wtime = num(&mut tokens),
                "btime" => clock.btime = num(&mut tokens),
                "winc" => clock.winc = num(&mut tokens),
                "binc" => clock.binc = num(&mut tokens),
                "movestogo" => clock.movestogo = num(&mut tokens).map(|v| v as u32),
                "movetime" => clock.movetime = num(&mut tokens),
                "depth" | "nodes" => {
                    // Pattern selection has no search depth; accepted for GUI
                    // compatibility and otherwise ignored.
                    let _ = num(&mut tokens);
                }
                _ => {}
            }
        }
        self.session.clock = clock;

        let board = self.session.position.board().clone();
        let budget = self.timer.allocate(&clock, &board);
        self.stop.store(false, Ordering::Relaxed);
        self.state = ProtocolState::Searching;
        let info = self.controller.decide(&board, budget, &self.stop);
        self.state = ProtocolState::Ready;

        if self.session.debug {
            if let Some(stage) = info.stage {
                writeln!(
                    out,
                    "info string stage {} elapsed {}ms budget {}ms",
                    stage,
                    info.elapsed.as_millis(),
                    budget.as_millis()
                )?;
            }
        }
        match info.decision {
            Decision::Move(m) => writeln!(out, "bestmove {}", uci_string(&board, m)),
            Decision::Terminal => {
                writeln!(out, "info string no legal moves: game over")?;
                writeln!(out, "bestmove 0000")
            }
        }
    }

    /// Blocking protocol loop over stdin/stdout. A pump thread forwards
    /// lines over a channel and raises the stop flag the moment `stop` or
    /// `quit` is seen, so cancellation reaches a running search without
    /// preempting the command loop.
    pub fn run(&mut self) -> Result<()> {
        let (tx, rx) = mpsc::channel::<String>();
        let stop = self.stop.clone();
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let line = line.trim().to_string();
                if line == "stop" || line == "quit" {
                    stop.store(true, Ordering::Relaxed);
                }
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        let stdout = io::stdout();
        for line in rx {
            let mut out = stdout.lock();
            self.dispatch(&line, &mut out)?;
            out.flush()?;
            if self.state == ProtocolState::Terminated {
                break;
            }
        }
        Ok(())
    }
}
