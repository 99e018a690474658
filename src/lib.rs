// Style-imitation engine: book lookup, then oracle scoring, then random fallback
pub mod board;
pub mod clock;
pub mod error;
pub mod eval;
pub mod fingerprint;
pub mod library;
pub mod select;
pub mod uci;
