//! Game record: a starting descriptor plus the ordered coordinate tokens
//! played from it. The record is the single source of truth for a game;
//! positions and statuses are recomputed from it on demand.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::board::Position;
use crate::codec::{decode, encode, encode_algebraic};
use crate::error::{ChessError, ChessResult};
use crate::fen::STARTPOS;
use crate::status::{Outcome, Status, evaluate};
use crate::types::Color;

const PGN_LINE_WIDTH: usize = 80;

/// Where a game starts. Serialized as `"startpos"` or the FEN text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StartingPosition {
    #[default]
    Standard,
    Fen(String),
}

impl StartingPosition {
    /// Validate a caller-supplied descriptor. `None`, empty and `startpos`
    /// all mean the standard array; anything else must be a valid FEN.
    pub fn parse(descriptor: Option<&str>) -> ChessResult<Self> {
        match descriptor.map(str::trim) {
            None | Some("") | Some(STARTPOS) => Ok(Self::Standard),
            Some(fen) => {
                let pos = Position::from_fen(fen)?;
                Ok(Self::Fen(pos.to_fen()))
            }
        }
    }

    pub fn position(&self) -> ChessResult<Position> {
        match self {
            Self::Standard => Ok(Position::startpos()),
            Self::Fen(fen) => Position::from_fen(fen),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Standard => STARTPOS,
            Self::Fen(fen) => fen,
        }
    }
}

impl fmt::Display for StartingPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StartingPosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Stored descriptors are not re-validated here: a bad FEN surfaces as
// corrupt history on replay.
impl<'de> Deserialize<'de> for StartingPosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(if s.is_empty() || s == STARTPOS {
            Self::Standard
        } else {
            Self::Fen(s)
        })
    }
}

/// A move accepted by [`GameRecord::push`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayedMove {
    pub token: String,
    pub san: String,
    pub position: Position,
}

/// Every position of a replayed game, start first.
#[derive(Clone, Debug)]
pub struct Replay {
    pub positions: Vec<Position>,
}

impl Replay {
    pub fn last(&self) -> &Position {
        // A replay always holds at least the starting position.
        &self.positions[self.positions.len() - 1]
    }

    pub fn keys(&self) -> Vec<u64> {
        self.positions.iter().map(Position::position_hash).collect()
    }

    pub fn status(&self) -> Status {
        evaluate(self.last(), &self.keys())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GameRecord {
    start: StartingPosition,
    moves: Vec<String>,
}

impl GameRecord {
    pub fn new(start: StartingPosition) -> Self {
        Self {
            start,
            moves: Vec::new(),
        }
    }

    /// Rebuild a record from persisted parts. Nothing is validated until
    /// the record is replayed.
    pub fn from_parts(start: StartingPosition, moves: Vec<String>) -> Self {
        Self { start, moves }
    }

    pub fn start(&self) -> &StartingPosition {
        &self.start
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Replay every stored move, keeping each intermediate position.
    pub fn replay_all(&self) -> ChessResult<Replay> {
        let start = self.start.position().map_err(|_| ChessError::CorruptHistory {
            ply: 0,
            token: self.start.to_string(),
        })?;
        let mut positions = Vec::with_capacity(self.moves.len() + 1);
        positions.push(start);
        for (ply, token) in self.moves.iter().enumerate() {
            let corrupt = || ChessError::CorruptHistory {
                ply: ply + 1,
                token: token.clone(),
            };
            let current = &positions[positions.len() - 1];
            let mv = decode(token, current).map_err(|_| corrupt())?;
            let next = current.apply_move(mv).map_err(|_| corrupt())?;
            positions.push(next);
        }
        Ok(Replay { positions })
    }

    /// The position after the last stored move.
    pub fn replay(&self) -> ChessResult<Position> {
        let mut pos = self.start.position().map_err(|_| ChessError::CorruptHistory {
            ply: 0,
            token: self.start.to_string(),
        })?;
        for (ply, token) in self.moves.iter().enumerate() {
            pos = decode(token, &pos)
                .and_then(|mv| pos.apply_move(mv))
                .map_err(|_| ChessError::CorruptHistory {
                    ply: ply + 1,
                    token: token.clone(),
                })?;
        }
        Ok(pos)
    }

    pub fn status(&self) -> ChessResult<Status> {
        Ok(self.replay_all()?.status())
    }

    /// Validate `token` against the current position and append it.
    ///
    /// Caller errors (`MalformedToken`, `IllegalMove`) leave the record
    /// unchanged.
    pub fn push(&mut self, token: &str) -> ChessResult<PlayedMove> {
        let pos = self.replay()?;
        let mv = decode(token, &pos)?;
        let san = encode_algebraic(mv, &pos)?;
        let position = pos.apply_move(mv)?;
        let token = encode(mv);
        self.moves.push(token.clone());
        Ok(PlayedMove {
            token,
            san,
            position,
        })
    }

    /// Drop the last `n` moves; asking for more than exist empties the record.
    pub fn truncate(&mut self, n: usize) {
        let keep = self.moves.len().saturating_sub(n);
        self.moves.truncate(keep);
    }

    /// SAN for every stored move, in order.
    pub fn san_moves(&self) -> ChessResult<Vec<String>> {
        self.sans_from(&self.replay_all()?)
    }

    fn sans_from(&self, replay: &Replay) -> ChessResult<Vec<String>> {
        self.moves
            .iter()
            .zip(replay.positions.iter())
            .enumerate()
            .map(|(ply, (token, pos))| {
                decode(token, pos)
                    .and_then(|mv| encode_algebraic(mv, pos))
                    .map_err(|_| ChessError::CorruptHistory {
                        ply: ply + 1,
                        token: token.clone(),
                    })
            })
            .collect()
    }

    /// Render the game as PGN.
    ///
    /// The result marker follows `outcome` when given (resignation,
    /// timeout), otherwise the status of the final position.
    pub fn to_pgn(&self, outcome: Option<Outcome>) -> ChessResult<String> {
        let replay = self.replay_all()?;
        let sans = self.sans_from(&replay)?;
        let status = replay.status().with_override(outcome);
        let result = status.result_marker();

        let mut out = String::new();
        for (tag, value) in [
            ("Event", "?"),
            ("Site", "?"),
            ("Date", "????.??.??"),
            ("Round", "?"),
            ("White", "?"),
            ("Black", "?"),
            ("Result", result),
        ] {
            out.push_str(&format!("[{tag} \"{value}\"]\n"));
        }
        if let StartingPosition::Fen(fen) = &self.start {
            out.push_str("[SetUp \"1\"]\n");
            out.push_str(&format!("[FEN \"{fen}\"]\n"));
        }
        out.push('\n');

        let first = &replay.positions[0];
        let mut tokens = Vec::with_capacity(sans.len() * 3 / 2 + 1);
        let mut number = first.fullmove_number;
        let mut side = first.side_to_move;
        for (i, san) in sans.into_iter().enumerate() {
            match side {
                Color::White => tokens.push(format!("{number}.")),
                Color::Black if i == 0 => tokens.push(format!("{number}...")),
                Color::Black => {}
            }
            tokens.push(san);
            if side == Color::Black {
                number += 1;
            }
            side = side.other();
        }
        tokens.push(result.to_string());

        out.push_str(&wrap(&tokens, PGN_LINE_WIDTH));
        Ok(out)
    }
}

fn wrap(tokens: &[String], width: usize) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for token in tokens {
        if line_len > 0 && line_len + 1 + token.len() > width {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(token);
        line_len += token.len();
    }
    out
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod record_tests;
