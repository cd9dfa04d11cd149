//! Load, mutate and persist sessions.
//!
//! Every mutation is a load-modify-write cycle against the key-value
//! substrate. Cycles for the same session id run one at a time; cycles for
//! different ids do not block each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chess_core::{Color, Outcome, PlayedMove, StartingPosition};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::clock::ClockState;
use crate::error::{SessionError, SessionResult, trace_corruption};
use crate::kv::{KeyValueStore, MemoryStore, StorageError};
use crate::session::{Session, SessionDocument};

const KEY_PREFIX: &str = "sess:";

pub struct SessionStore {
    kv: Box<dyn KeyValueStore>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SessionStore {
    pub fn new(kv: impl KeyValueStore + 'static) -> Self {
        Self {
            kv: Box::new(kv),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    fn key(id: &str) -> String {
        format!("{KEY_PREFIX}{id}")
    }

    /// Run `f` while holding the lock for `id`.
    fn exclusive<R>(&self, id: &str, f: impl FnOnce() -> SessionResult<R>) -> SessionResult<R> {
        let lock = {
            let mut table = self.locks.lock().map_err(|_| StorageError::LockPoisoned)?;
            Arc::clone(table.entry(id.to_string()).or_default())
        };
        let result = {
            let _guard = lock.lock().map_err(|_| StorageError::LockPoisoned)?;
            f()
        };
        drop(lock);
        // Forget the entry once nobody else is holding or waiting on it.
        if let Ok(mut table) = self.locks.lock() {
            if table.get(id).is_some_and(|l| Arc::strong_count(l) == 1) {
                table.remove(id);
            }
        }
        result
    }

    fn load(&self, id: &str) -> SessionResult<Session> {
        let bytes = self
            .kv
            .get(&Self::key(id))?
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))?;
        let doc: SessionDocument = serde_json::from_slice(&bytes)?;
        Ok(doc.into())
    }

    fn persist(&self, session: &Session) -> SessionResult<()> {
        let bytes = serde_json::to_vec(&SessionDocument::from(session))?;
        self.kv.set(&Self::key(session.id()), &bytes)?;
        Ok(())
    }

    /// Start a new game. The starting descriptor is validated before
    /// anything is written; `None` and `"startpos"` mean the standard array.
    #[instrument(skip(self, clock))]
    pub fn create(
        &self,
        opponent: &str,
        start: Option<&str>,
        clock: Option<ClockState>,
        human_color: Option<Color>,
    ) -> SessionResult<Session> {
        let start = StartingPosition::parse(start)?;
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id, opponent.to_string(), start, clock, human_color);
        self.persist(&session)?;
        info!(session = session.id(), "session created");
        Ok(session)
    }

    pub fn get(&self, id: &str) -> SessionResult<Session> {
        self.load(id)
    }

    /// Load `id`, apply `f`, and persist the result if `f` succeeded.
    /// A failing `f` leaves the stored session untouched.
    pub fn update<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> SessionResult<R>,
    ) -> SessionResult<(Session, R)> {
        self.exclusive(id, || {
            let mut session = self.load(id)?;
            let out = f(&mut session).map_err(|e| trace_corruption(id, e))?;
            self.persist(&session)?;
            Ok((session, out))
        })
    }

    #[instrument(skip(self))]
    pub fn apply_move(&self, id: &str, token: &str) -> SessionResult<(Session, PlayedMove)> {
        let (session, played) = self.update(id, |s| s.push_move(token))?;
        debug!(san = %played.san, ply = session.record().len(), "move applied");
        Ok((session, played))
    }

    /// Take back one move of each side. Clamped at the start of the game.
    #[instrument(skip(self))]
    pub fn undo_full_move(&self, id: &str) -> SessionResult<Session> {
        let (session, ()) = self.update(id, |s| {
            s.undo_full_move();
            Ok(())
        })?;
        Ok(session)
    }

    /// End the game by resignation in favour of `winner`. Repeated calls
    /// keep the first recorded outcome.
    #[instrument(skip(self))]
    pub fn resign(&self, id: &str, winner: Color) -> SessionResult<Session> {
        self.conclude(id, Outcome::resignation(winner))
    }

    /// End the game on time against `loser`.
    #[instrument(skip(self))]
    pub fn flag_timeout(&self, id: &str, loser: Color) -> SessionResult<Session> {
        self.conclude(id, Outcome::timeout(loser))
    }

    fn conclude(&self, id: &str, outcome: Outcome) -> SessionResult<Session> {
        let (session, applied) = self.update(id, |s| Ok(s.conclude(outcome)?))?;
        if applied {
            info!(session = id, reason = ?outcome.reason, "game concluded");
        }
        Ok(session)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
