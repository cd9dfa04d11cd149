use chess_core::ChessError;
use thiserror::Error;
use tracing::error;

use crate::kv::StorageError;
use crate::oracle::OracleError;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("game is already over")]
    GameAlreadyOver,
    #[error("unknown bot: {0}")]
    UnknownBot(String),
    #[error("it is not your turn")]
    NotYourTurn,
    #[error(transparent)]
    Chess(#[from] ChessError),
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
    #[error("session document could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("opponent could not move: {0}")]
    Oracle(#[from] OracleError),
}

pub type SessionResult<T> = Result<T, SessionError>;

impl SessionError {
    /// Whether the request itself was at fault. Caller errors leave the
    /// session untouched; everything else is a server-side failure.
    pub fn is_caller_error(&self) -> bool {
        match self {
            SessionError::SessionNotFound(_)
            | SessionError::GameAlreadyOver
            | SessionError::UnknownBot(_)
            | SessionError::NotYourTurn => true,
            SessionError::Chess(e) => !matches!(e, ChessError::CorruptHistory { .. }),
            SessionError::Storage(_) | SessionError::Serialization(_) | SessionError::Oracle(_) => {
                false
            }
        }
    }
}

/// Log stored history that no longer replays. Returns the error unchanged.
pub(crate) fn trace_corruption(session_id: &str, err: SessionError) -> SessionError {
    if let SessionError::Chess(ChessError::CorruptHistory { ply, token }) = &err {
        error!(session = session_id, ply, token = %token, "stored history does not replay");
    }
    err
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
