//! Chess game sessions.
//!
//! A [`Session`] is the persisted aggregate of one game: who the opponent
//! is, the [`GameRecord`](chess_core::GameRecord) of moves played so far, and
//! optionally a clock and an externally decided outcome. The
//! [`SessionStore`] loads and saves sessions through a [`KeyValueStore`],
//! and the [`GameService`] drives whole turns: the human move, then the
//! opponent's reply chosen by an [`Oracle`].

mod clock;
mod config;
mod error;
mod kv;
mod oracle;
mod profiles;
mod service;
mod session;
mod store;

pub use clock::ClockState;
pub use config::{ConfigError, EngineConfig, PlayConfig};
pub use error::{SessionError, SessionResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use oracle::{Oracle, OracleError, UciOracle, parse_bestmove, select_with_retry};
pub use profiles::{BotProfile, ProfileTable, SearchLimits};
pub use service::{ColorChoice, GameReport, GameService, MoveReport, NewGame};
pub use session::{Session, SessionDocument};
pub use store::SessionStore;
