//! Chess rules engine for the game session service.
//!
//! Everything here is a pure function of its inputs: positions are values,
//! a [`GameRecord`] is replayed from its starting descriptor whenever a
//! position or a [`Status`] is needed, and nothing is cached between calls.

pub mod board;
pub mod codec;
pub mod error;
pub mod fen;
pub mod movegen;
pub mod perft;
pub mod record;
pub mod status;
pub mod types;
pub mod zobrist;

pub use board::*;
pub use codec::{decode, encode, encode_algebraic, parse_token};
pub use error::{ChessError, ChessResult};
pub use fen::{STARTPOS, STARTPOS_FEN};
pub use movegen::*;
pub use perft::perft;
pub use record::*;
pub use status::*;
pub use types::*;
pub use zobrist::ZOBRIST;
