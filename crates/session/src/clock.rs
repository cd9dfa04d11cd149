//! Per-side remaining time with a Fischer increment.

use chess_core::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockState {
    pub white_ms: u64,
    pub black_ms: u64,
    pub inc_ms: u64,
}

impl ClockState {
    /// Both sides start with `initial_ms`.
    pub fn new(initial_ms: u64, inc_ms: u64) -> Self {
        Self {
            white_ms: initial_ms,
            black_ms: initial_ms,
            inc_ms,
        }
    }

    pub fn remaining(&self, color: Color) -> u64 {
        match color {
            Color::White => self.white_ms,
            Color::Black => self.black_ms,
        }
    }

    fn remaining_mut(&mut self, color: Color) -> &mut u64 {
        match color {
            Color::White => &mut self.white_ms,
            Color::Black => &mut self.black_ms,
        }
    }

    /// Deduct `elapsed_ms` from `mover`.
    ///
    /// Returns `false` when the mover's flag falls: their time is left at
    /// zero and no increment is added. Otherwise the increment is credited.
    pub fn charge(&mut self, mover: Color, elapsed_ms: u64) -> bool {
        let inc = self.inc_ms;
        let left = self.remaining_mut(mover);
        *left = left.saturating_sub(elapsed_ms);
        if *left == 0 {
            return false;
        }
        *left += inc;
        true
    }

    pub fn is_flagged(&self, color: Color) -> bool {
        self.remaining(color) == 0
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod clock_tests;
