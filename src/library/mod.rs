use anyhow::{bail, Context, Result};
use cozy_chess::Board;
use log::warn;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::board;
use crate::fingerprint;

mod book_data;

/// One historically observed move for a position: UCI text, frequency
/// weight, and the outcome statistic used as the tie-break.
#[derive(Debug, Clone, Deserialize)]
pub struct BookMove {
    pub uci: String,
    pub weight: f64,
    pub success: f64,
}

#[derive(Debug, Deserialize)]
struct BookFile {
    #[serde(default)]
    name: String,
    positions: HashMap<String, Vec<BookMove>>,
}

/// Frozen move-pattern index: fingerprint -> candidates ordered by weight,
/// then success, then UCI text. Read-only after construction.
#[derive(Debug)]
pub struct MoveLibrary {
    name: String,
    positions: HashMap<u64, Vec<BookMove>>,
}

impl MoveLibrary {
    pub fn empty() -> Self {
        Self { name: "empty".to_string(), positions: HashMap::new() }
    }

    /// The built-in book: the imitated player's most frequent opening lines,
    /// replayed from the starting position at startup.
    pub fn embedded() -> Self {
        let mut positions: HashMap<u64, Vec<BookMove>> = HashMap::new();
        for line in book_data::LINES {
            let mut b = Board::default();
            for lm in *line {
                let Some(m) = board::find_move(&b, lm.uci) else {
                    warn!("embedded book: skipping illegal continuation {}", lm.uci);
                    break;
                };
                let entry = positions.entry(fingerprint::compute(&b)).or_default();
                if !entry.iter().any(|e| e.uci == lm.uci) {
                    entry.push(BookMove {
                        uci: lm.uci.to_string(),
                        weight: lm.weight,
                        success: lm.success,
                    });
                }
                b.play(m);
            }
        }
        let mut lib = Self { name: "embedded".to_string(), positions };
        lib.sort_entries();
        lib
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(&path)
            .with_context(|| format!("open book file: {}", path.as_ref().display()))?;
        let parsed: BookFile =
            serde_json::from_reader(BufReader::new(f)).context("parse book file")?;
        let mut positions = HashMap::with_capacity(parsed.positions.len());
        for (key, moves) in parsed.positions {
            let fp = u64::from_str_radix(&key, 16)
                .with_context(|| format!("bad fingerprint key: {key}"))?;
            positions.insert(fp, moves);
        }
        let name = if parsed.name.is_empty() { "book".to_string() } else { parsed.name };
        Self::from_positions(&name, positions)
    }

    /// Validates and freezes a set of entries: weights must be finite and
    /// non-negative, duplicates by move are dropped (first record wins).
    pub fn from_positions(name: &str, positions: HashMap<u64, Vec<BookMove>>) -> Result<Self> {
        let mut clean = HashMap::with_capacity(positions.len());
        for (fp, moves) in positions {
            let mut entry: Vec<BookMove> = Vec::with_capacity(moves.len());
            for m in moves {
                if !m.weight.is_finite() || m.weight < 0.0 || !m.success.is_finite() {
                    bail!("book entry {:016x}/{} has invalid weight {} / success {}", fp, m.uci, m.weight, m.success);
                }
                if entry.iter().any(|e| e.uci == m.uci) {
                    warn!("book entry {fp:016x}: duplicate move {} dropped", m.uci);
                    continue;
                }
                entry.push(m);
            }
            if !entry.is_empty() {
                clean.insert(fp, entry);
            }
        }
        let mut lib = Self { name: name.to_string(), positions: clean };
        lib.sort_entries();
        Ok(lib)
    }

    pub fn lookup(&self, fp: u64) -> &[BookMove] {
        self.positions.get(&fp).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn sort_entries(&mut self) {
        for entry in self.positions.values_mut() {
            entry.sort_by(|a, b| {
                b.weight
                    .total_cmp(&a.weight)
                    .then(b.success.total_cmp(&a.success))
                    .then(a.uci.cmp(&b.uci))
            });
        }
    }
}
