//! Error type shared by the rules engine, the move codec and the game record.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// The token does not follow the `<file><rank><file><rank>[promo]` grammar.
    #[error("malformed move token: {0:?}")]
    MalformedToken(String),

    /// The token parsed but is not a legal move in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// A stored move no longer replays. Only tampering or a bug gets here.
    #[error("corrupt history: stored move {token:?} at ply {ply} is illegal")]
    CorruptHistory { ply: usize, token: String },
}

pub type ChessResult<T> = Result<T, ChessError>;
