//! The imitated player's main opening lines with frequency weights and
//! success rates, distilled from their game history. Castling is written in
//! the generator's king-takes-rook form.

pub(crate) struct LineMove {
    pub uci: &'static str,
    pub weight: f64,
    pub success: f64,
}

const fn lm(uci: &'static str, weight: f64, success: f64) -> LineMove {
    LineMove { uci, weight, success }
}

// Alekhine's Defense, modern line.
const ALEKHINE_MAIN: &[LineMove] = &[
    lm("e2e4", 155.8, 0.541),
    lm("g8f6", 131.835, 0.459),
    lm("e4e5", 132.675, 0.558),
    lm("f6d5", 26.66, 0.542),
    lm("d2d4", 118.725, 0.564),
    lm("d7d6", 13.075, 0.495),
    lm("g1f3", 82.255, 0.575),
    lm("c8g4", 2.785, 0.502),
    lm("f1e2", 36.095, 0.584),
    lm("e7e6", 4.37, 0.519),
    lm("e1h1", 24.72, 0.572),
    lm("f8e7", 23.9, 0.456),
    lm("c2c4", 37.245, 0.54),
    lm("d5b6", 38.295, 0.467),
];

// Alekhine's Defense, exchange variation.
const ALEKHINE_EXCHANGE: &[LineMove] = &[
    lm("e2e4", 155.8, 0.541),
    lm("g8f6", 131.835, 0.459),
    lm("e4e5", 132.675, 0.558),
    lm("f6d5", 26.66, 0.542),
    lm("d2d4", 118.725, 0.564),
    lm("d7d6", 13.075, 0.495),
    lm("c2c4", 12.645, 0.503),
    lm("d5b6", 13.07, 0.496),
    lm("e5d6", 51.195, 0.528),
    lm("c7d6", 24.68, 0.47),
    lm("b1c3", 39.385, 0.548),
    lm("g7g6", 24.555, 0.473),
    lm("c1e3", 21.385, 0.537),
    lm("f8g7", 27.38, 0.467),
];

// Vienna move order as the sideline with white.
const VIENNA_SIDELINE: &[LineMove] = &[
    lm("b1c3", 0.765, 0.497),
    lm("g8f6", 0.5, 0.46),
    lm("e2e4", 0.765, 0.497),
    lm("e7e5", 0.3, 0.5),
];

const QUEENS_PAWN: &[LineMove] = &[
    lm("d2d4", 0.26, 0.65),
    lm("g8f6", 0.4, 0.46),
];

const ENGLISH: &[LineMove] = &[
    lm("c2c4", 0.06, 0.6),
    lm("e7e5", 0.24, 0.667),
];

pub(crate) const LINES: &[&[LineMove]] = &[
    ALEKHINE_MAIN,
    ALEKHINE_EXCHANGE,
    VIENNA_SIDELINE,
    QUEENS_PAWN,
    ENGLISH,
];
