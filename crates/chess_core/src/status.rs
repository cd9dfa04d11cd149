//! Terminal-state evaluation.
//!
//! A [`Status`] is always derived: from the final position of a game plus
//! the repetition keys of every position along the way, optionally
//! overridden by an externally recorded result (resignation, flag fall).

use serde::{Deserialize, Serialize};

use crate::board::Position;
use crate::movegen::has_legal_move;
use crate::types::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl From<Color> for Winner {
    fn from(c: Color) -> Self {
        match c {
            Color::White => Winner::White,
            Color::Black => Winner::Black,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    Checkmate,
    Stalemate,
    Resign,
    Timeout,
    Threefold,
    #[serde(rename = "50move")]
    FiftyMove,
}

/// Result recorded from outside the board: resignation or timeout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Winner,
    pub reason: Reason,
}

impl Outcome {
    pub fn resignation(winner: Color) -> Self {
        Self {
            winner: winner.into(),
            reason: Reason::Resign,
        }
    }

    pub fn timeout(loser: Color) -> Self {
        Self {
            winner: loser.other().into(),
            reason: Reason::Timeout,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub in_check: bool,
    pub game_over: bool,
    pub winner: Option<Winner>,
    pub reason: Option<Reason>,
}

impl Status {
    pub fn ongoing(in_check: bool) -> Self {
        Self {
            in_check,
            game_over: false,
            winner: None,
            reason: None,
        }
    }

    fn terminal(in_check: bool, winner: Winner, reason: Reason) -> Self {
        Self {
            in_check,
            game_over: true,
            winner: Some(winner),
            reason: Some(reason),
        }
    }

    /// An override replaces the board verdict but keeps the check flag.
    pub fn with_override(self, outcome: Option<Outcome>) -> Self {
        match outcome {
            Some(o) => Self::terminal(self.in_check, o.winner, o.reason),
            None => self,
        }
    }

    /// PGN result marker.
    pub fn result_marker(&self) -> &'static str {
        match self.winner {
            Some(Winner::White) => "1-0",
            Some(Winner::Black) => "0-1",
            Some(Winner::Draw) => "1/2-1/2",
            None => "*",
        }
    }
}

/// Evaluate `pos`, the last position of a game whose repetition keys (start
/// position included, `pos` last) are `history`.
pub fn evaluate(pos: &Position, history: &[u64]) -> Status {
    let in_check = pos.is_check();

    if !has_legal_move(pos) {
        return if in_check {
            Status::terminal(in_check, pos.side_to_move.other().into(), Reason::Checkmate)
        } else {
            Status::terminal(in_check, Winner::Draw, Reason::Stalemate)
        };
    }
    if pos.is_fifty_move_draw() {
        return Status::terminal(in_check, Winner::Draw, Reason::FiftyMove);
    }
    if is_threefold(history) {
        return Status::terminal(in_check, Winner::Draw, Reason::Threefold);
    }
    Status::ongoing(in_check)
}

/// Evaluate a position in isolation (no repetition history).
pub fn evaluate_position(pos: &Position) -> Status {
    evaluate(pos, &[pos.position_hash()])
}

fn is_threefold(history: &[u64]) -> bool {
    match history.last() {
        Some(current) => history.iter().filter(|&&h| h == *current).count() >= 3,
        None => false,
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
