//! Whole turns against the computer: the human move, then the reply.

use std::str::FromStr;
use std::sync::Mutex;

use chess_core::{Color, Outcome, PlayedMove, Status, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::clock::ClockState;
use crate::config::PlayConfig;
use crate::error::{SessionError, SessionResult, trace_corruption};
use crate::kv::FileStore;
use crate::oracle::{Oracle, OracleError, UciOracle, select_with_retry};
use crate::profiles::{BotProfile, ProfileTable};
use crate::session::Session;
use crate::store::SessionStore;

/// Which side the human takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    White,
    Black,
    #[default]
    Auto,
}

impl ColorChoice {
    pub fn resolve(self, rng: &mut impl Rng) -> Color {
        match self {
            ColorChoice::White => Color::White,
            ColorChoice::Black => Color::Black,
            ColorChoice::Auto if rng.gen_bool(0.5) => Color::White,
            ColorChoice::Auto => Color::Black,
        }
    }
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(ColorChoice::White),
            "black" | "b" => Ok(ColorChoice::Black),
            "auto" | "random" => Ok(ColorChoice::Auto),
            other => Err(format!("unknown colour {other:?} (expected white, black or auto)")),
        }
    }
}

/// Parameters for [`GameService::create_game`].
#[derive(Debug, Clone, Default)]
pub struct NewGame {
    pub bot: String,
    pub color: ColorChoice,
    pub fen: Option<String>,
    pub clock: Option<ClockState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub uci: String,
    pub san: String,
}

impl From<PlayedMove> for MoveReport {
    fn from(played: PlayedMove) -> Self {
        Self {
            uci: played.token,
            san: played.san,
        }
    }
}

/// The state of a game after a request, as shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameReport {
    pub id: String,
    pub bot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human_color: Option<Color>,
    /// The human move applied by this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_move: Option<MoveReport>,
    /// The opponent's reply applied by this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_move: Option<MoveReport>,
    pub fen: String,
    pub pgn: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clock: Option<ClockState>,
}

pub struct GameService {
    store: SessionStore,
    profiles: ProfileTable,
    oracle: Mutex<Box<dyn Oracle>>,
}

impl GameService {
    pub fn new(store: SessionStore, profiles: ProfileTable, oracle: impl Oracle + 'static) -> Self {
        Self {
            store,
            profiles,
            oracle: Mutex::new(Box::new(oracle)),
        }
    }

    /// File-backed store when `store_dir` is set, a UCI engine oracle, and
    /// the built-in profiles merged with any configured ones.
    pub fn from_config(config: &PlayConfig) -> SessionResult<Self> {
        let store = match &config.store_dir {
            Some(dir) => SessionStore::new(FileStore::open(dir)?),
            None => SessionStore::in_memory(),
        };
        Ok(Self::new(
            store,
            config.profiles(),
            UciOracle::new(config.engine.clone()),
        ))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Name the engine reports, starting it if needed.
    pub fn engine_name(&self) -> SessionResult<String> {
        let mut oracle = self.oracle.lock().map_err(|_| OracleError::LockPoisoned)?;
        oracle.prepare()?;
        Ok(oracle.name().to_string())
    }

    pub fn list_bots(&self) -> &[BotProfile] {
        self.profiles.all()
    }

    fn profile(&self, id: &str) -> SessionResult<&BotProfile> {
        self.profiles
            .get(id)
            .ok_or_else(|| SessionError::UnknownBot(id.to_string()))
    }

    /// Start a game. When the opponent is to move first it replies at once.
    #[instrument(skip(self, request), fields(bot = %request.bot))]
    pub fn create_game(&self, request: NewGame) -> SessionResult<GameReport> {
        let profile = self.profile(&request.bot)?;
        let human = request.color.resolve(&mut rand::thread_rng());
        let session = self.store.create(
            &profile.id,
            request.fen.as_deref(),
            request.clock,
            Some(human),
        )?;
        info!(session = session.id(), human = %human, "game created");
        let (session, bot_move) = self.maybe_reply(session, profile)?;
        self.report(&session, None, bot_move)
    }

    /// Play the human move `token`, then let the opponent answer if the
    /// game is still going.
    ///
    /// A reply left owed by an earlier oracle failure is made first, and
    /// the token is then checked against the resulting position.
    ///
    /// With a clock and `elapsed_ms`, the time is charged to the mover
    /// first; if their flag falls the game ends on time and the move is
    /// not played.
    #[instrument(skip(self))]
    pub fn play(&self, id: &str, token: &str, elapsed_ms: Option<u64>) -> SessionResult<GameReport> {
        let session = self.store.get(id)?;
        let profile = self.profile(session.opponent())?;
        let (_, owed) = self.maybe_reply(session, profile)?;
        if let Some(owed) = &owed {
            info!(session = id, reply = %owed.uci, "owed reply played");
        }

        let (session, user_move) = self.store.update(id, |s| {
            if s.status()?.game_over {
                return Err(SessionError::GameAlreadyOver);
            }
            let pos = s.position()?;
            if s.human_color().is_some_and(|human| human != pos.side_to_move) {
                return Err(SessionError::NotYourTurn);
            }
            // Reject bad input before any time is charged.
            decode(token, &pos)?;
            if let Some(elapsed) = elapsed_ms
                && !s.charge_clock(pos.side_to_move, elapsed)
            {
                s.conclude(Outcome::timeout(pos.side_to_move))?;
                warn!(session = s.id(), "flag fell");
                return Ok(None);
            }
            Ok(Some(s.push_move(token)?))
        })?;

        let Some(user_move) = user_move else {
            return self.report(&session, None, owed);
        };
        let (session, bot_move) = self.maybe_reply(session, profile)?;
        self.report(&session, Some(user_move.into()), bot_move)
    }

    /// Have the opponent move if it is its turn in an ongoing game. The
    /// session stays locked while the oracle thinks.
    fn maybe_reply(
        &self,
        session: Session,
        profile: &BotProfile,
    ) -> SessionResult<(Session, Option<MoveReport>)> {
        if !self.bot_to_move(&session)? {
            return Ok((session, None));
        }
        let (session, played) = self.store.update(session.id(), |s| {
            if !self.bot_to_move(s)? {
                return Ok(None);
            }
            let pos = s.position()?;
            let mv = {
                let mut oracle = self.oracle.lock().map_err(|_| OracleError::LockPoisoned)?;
                select_with_retry(&mut **oracle, &pos, profile)?
            };
            Ok(Some(s.push_move(&encode(mv))?))
        })?;
        Ok((session, played.map(MoveReport::from)))
    }

    fn bot_to_move(&self, session: &Session) -> SessionResult<bool> {
        if session.status()?.game_over {
            return Ok(false);
        }
        let to_move = session.position()?.side_to_move;
        Ok(session.human_color().is_some_and(|human| human != to_move))
    }

    /// Take back the last full move.
    #[instrument(skip(self))]
    pub fn undo(&self, id: &str) -> SessionResult<GameReport> {
        let session = self.store.undo_full_move(id)?;
        self.report(&session, None, None)
    }

    /// The human gives up. For sessions without a recorded human colour
    /// the side to move resigns.
    #[instrument(skip(self))]
    pub fn resign(&self, id: &str) -> SessionResult<GameReport> {
        let session = self.store.get(id)?;
        let loser = match session.human_color() {
            Some(color) => color,
            None => session
                .position()
                .map_err(|e| trace_corruption(id, e.into()))?
                .side_to_move,
        };
        let session = self.store.resign(id, loser.other())?;
        self.report(&session, None, None)
    }

    pub fn get(&self, id: &str) -> SessionResult<GameReport> {
        let session = self.store.get(id)?;
        self.report(&session, None, None)
    }

    pub fn pgn(&self, id: &str) -> SessionResult<String> {
        let session = self.store.get(id)?;
        session
            .pgn()
            .map_err(|e| trace_corruption(id, e.into()))
    }

    fn report(
        &self,
        session: &Session,
        user_move: Option<MoveReport>,
        bot_move: Option<MoveReport>,
    ) -> SessionResult<GameReport> {
        let build = || -> SessionResult<GameReport> {
            Ok(GameReport {
                id: session.id().to_string(),
                bot: session.opponent().to_string(),
                human_color: session.human_color(),
                user_move,
                bot_move,
                fen: session.fen()?,
                pgn: session.pgn()?,
                status: session.status()?,
                clock: session.clock().copied(),
            })
        };
        build().map_err(|e| trace_corruption(session.id(), e))
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
