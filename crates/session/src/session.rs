//! The persisted game aggregate.

use chess_core::{
    ChessResult, Color, GameRecord, Outcome, PlayedMove, Position, StartingPosition, Status,
};
use serde::{Deserialize, Serialize};

use crate::clock::ClockState;
use crate::error::{SessionError, SessionResult};

/// Wire form of a [`Session`], exactly as written to the key-value store.
///
/// Positions and statuses are never stored; they are recomputed from
/// `startingDescriptor` and `moves` on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    pub id: String,
    pub opponent_profile_ref: String,
    #[serde(default)]
    pub starting_descriptor: StartingPosition,
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock_state: Option<ClockState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_color: Option<Color>,
}

/// One game: opponent, move record, and the optional clock, externally
/// decided outcome and human colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    opponent: String,
    record: GameRecord,
    clock: Option<ClockState>,
    outcome: Option<Outcome>,
    human_color: Option<Color>,
}

impl Session {
    pub(crate) fn new(
        id: String,
        opponent: String,
        start: StartingPosition,
        clock: Option<ClockState>,
        human_color: Option<Color>,
    ) -> Self {
        Self {
            id,
            opponent,
            record: GameRecord::new(start),
            clock,
            outcome: None,
            human_color,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the opponent's strength profile.
    pub fn opponent(&self) -> &str {
        &self.opponent
    }

    pub fn record(&self) -> &GameRecord {
        &self.record
    }

    pub fn clock(&self) -> Option<&ClockState> {
        self.clock.as_ref()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn human_color(&self) -> Option<Color> {
        self.human_color
    }

    pub fn position(&self) -> ChessResult<Position> {
        self.record.replay()
    }

    pub fn fen(&self) -> ChessResult<String> {
        Ok(self.position()?.to_fen())
    }

    /// Board verdict, replaced by the recorded outcome when there is one.
    pub fn status(&self) -> ChessResult<Status> {
        Ok(self.record.status()?.with_override(self.outcome))
    }

    pub fn pgn(&self) -> ChessResult<String> {
        self.record.to_pgn(self.outcome)
    }

    /// Validate and append a move. Nothing changes on error.
    pub fn push_move(&mut self, token: &str) -> SessionResult<PlayedMove> {
        if self.status()?.game_over {
            return Err(SessionError::GameAlreadyOver);
        }
        Ok(self.record.push(token)?)
    }

    /// Take back the last move of each side.
    pub fn undo_full_move(&mut self) {
        self.record.truncate(2);
    }

    /// Record an outcome decided off the board.
    ///
    /// Returns `false`, leaving the session as it was, when the game is
    /// already over, by an earlier outcome or on the board.
    pub fn conclude(&mut self, outcome: Outcome) -> ChessResult<bool> {
        if self.outcome.is_some() || self.record.status()?.game_over {
            return Ok(false);
        }
        self.outcome = Some(outcome);
        Ok(true)
    }

    /// Charge the mover's clock. Returns `false` when their flag falls;
    /// sessions without a clock never flag.
    pub fn charge_clock(&mut self, mover: Color, elapsed_ms: u64) -> bool {
        match &mut self.clock {
            Some(clock) => clock.charge(mover, elapsed_ms),
            None => true,
        }
    }
}

impl From<SessionDocument> for Session {
    fn from(doc: SessionDocument) -> Self {
        Self {
            id: doc.id,
            opponent: doc.opponent_profile_ref,
            record: GameRecord::from_parts(doc.starting_descriptor, doc.moves),
            clock: doc.clock_state,
            outcome: doc.outcome,
            human_color: doc.human_color,
        }
    }
}

impl From<&Session> for SessionDocument {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id.clone(),
            opponent_profile_ref: session.opponent.clone(),
            starting_descriptor: session.record.start().clone(),
            moves: session.record.moves().to_vec(),
            clock_state: session.clock,
            outcome: session.outcome,
            human_color: session.human_color,
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
