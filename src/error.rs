use thiserror::Error;

/// Session-visible failures. Startup (artifact) failures go through `anyhow`
/// in the loaders and are fatal; these are not.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("bad FEN: {0}")]
    BadFen(String),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("malformed command: {0}")]
    Protocol(String),
}
