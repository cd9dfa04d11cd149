//! Opponent move selection.
//!
//! The [`Oracle`] trait is the seam between a session and whatever picks
//! the computer's moves. [`UciOracle`] drives an external engine over the
//! UCI protocol, one long-lived process per oracle.

use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use chess_core::{Move, Position, decode};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::EngineConfig;
use crate::profiles::BotProfile;

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no engine configured (set STOCKFISH_PATH)")]
    NotConfigured,
    #[error("could not start engine at {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("engine i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("engine exited")]
    Terminated,
    #[error("engine did not answer `{0}` in time")]
    Timeout(&'static str),
    #[error("engine returned no move")]
    NoMove,
    #[error("engine returned an unusable move: {0}")]
    BadMove(String),
    #[error("oracle lock poisoned")]
    LockPoisoned,
}

impl OracleError {
    /// Failures a freshly started engine might not repeat.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OracleError::Io(_) | OracleError::Terminated | OracleError::Timeout(_)
        )
    }
}

/// Something that picks a move for the computer side.
pub trait Oracle: Send {
    /// Choose a legal move in `pos` at the strength of `profile`.
    fn select_move(&mut self, pos: &Position, profile: &BotProfile) -> Result<Move, OracleError>;

    /// Drop any connection so the next call starts afresh.
    fn reset(&mut self) {}

    /// Make sure the oracle is ready to answer, so `name` is meaningful.
    fn prepare(&mut self) -> Result<(), OracleError> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// Ask `oracle` for a move, restarting it and asking once more if the
/// first attempt fails transiently.
pub fn select_with_retry(
    oracle: &mut dyn Oracle,
    pos: &Position,
    profile: &BotProfile,
) -> Result<Move, OracleError> {
    match oracle.select_move(pos, profile) {
        Err(e) if e.is_transient() => {
            warn!(oracle = oracle.name(), error = %e, "oracle failed, restarting");
            oracle.reset();
            oracle.select_move(pos, profile)
        }
        other => other,
    }
}

/// Parse a `bestmove <token> [ponder <token>]` line against `pos`.
pub fn parse_bestmove(line: &str, pos: &Position) -> Result<Move, OracleError> {
    let mut parts = line.split_whitespace();
    if parts.next() != Some("bestmove") {
        return Err(OracleError::BadMove(line.to_string()));
    }
    match parts.next() {
        None | Some("(none)") | Some("0000") => Err(OracleError::NoMove),
        Some(token) => decode(token, pos).map_err(|_| OracleError::BadMove(token.to_string())),
    }
}

/// A running engine. Output lines arrive through a reader thread so every
/// wait can be bounded.
struct EngineProcess {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
    name: String,
}

impl EngineProcess {
    fn spawn(path: &Path) -> Result<Self, OracleError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| OracleError::Spawn {
                path: path.to_path_buf(),
                source,
            })?;
        let stdin = child.stdin.take().ok_or(OracleError::Terminated)?;
        let stdout = child.stdout.take().ok_or(OracleError::Terminated)?;

        let (tx, lines) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        let mut process = Self {
            child,
            stdin,
            lines,
            name: path.display().to_string(),
        };
        process.send("uci")?;
        let deadline = Instant::now() + HANDSHAKE_TIMEOUT;
        loop {
            let line = process.recv_until(deadline, "uci")?;
            let line = line.trim();
            if let Some(name) = line.strip_prefix("id name ") {
                process.name = name.to_string();
            }
            if line == "uciok" {
                return Ok(process);
            }
        }
    }

    fn send(&mut self, cmd: &str) -> Result<(), OracleError> {
        debug!(cmd, "engine <");
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn recv_until(&self, deadline: Instant, waiting_for: &'static str) -> Result<String, OracleError> {
        let left = deadline.saturating_duration_since(Instant::now());
        match self.lines.recv_timeout(left) {
            Ok(line) => Ok(line),
            Err(RecvTimeoutError::Timeout) => Err(OracleError::Timeout(waiting_for)),
            Err(RecvTimeoutError::Disconnected) => Err(OracleError::Terminated),
        }
    }

    /// Skip output until a line whose first word is `keyword`.
    fn wait_for(&self, keyword: &'static str, timeout: Duration) -> Result<String, OracleError> {
        let deadline = Instant::now() + timeout;
        loop {
            let line = self.recv_until(deadline, keyword)?;
            if line.split_whitespace().next() == Some(keyword) {
                debug!(line = %line, "engine >");
                return Ok(line);
            }
        }
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        let _ = self.send("quit");
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Oracle backed by a UCI engine executable such as Stockfish.
///
/// The process is started on first use and kept for later calls. A
/// transient failure discards it; the next call starts a new one.
pub struct UciOracle {
    config: EngineConfig,
    process: Option<EngineProcess>,
}

impl UciOracle {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            process: None,
        }
    }

    fn process(&mut self) -> Result<&mut EngineProcess, OracleError> {
        if self.process.is_none() {
            let path = self.config.path.as_deref().ok_or(OracleError::NotConfigured)?;
            let process = EngineProcess::spawn(path)?;
            info!(engine = %process.name, "engine started");
            self.process = Some(process);
        }
        self.process.as_mut().ok_or(OracleError::Terminated)
    }

    fn search(&mut self, pos: &Position, profile: &BotProfile) -> Result<Move, OracleError> {
        let limits = profile.limits(&self.config);
        let grace = Duration::from_millis(self.config.response_grace_ms);
        let process = self.process()?;

        process.send("setoption name UCI_LimitStrength value true")?;
        process.send(&format!("setoption name UCI_Elo value {}", profile.elo))?;
        process.send(&format!("setoption name MultiPV value {}", profile.multipv))?;
        process.send("isready")?;
        process.wait_for("readyok", grace)?;

        process.send(&format!("position fen {}", pos.to_fen()))?;
        process.send(&limits.go_command())?;
        let line = process.wait_for("bestmove", Duration::from_millis(limits.movetime_ms) + grace)?;
        parse_bestmove(&line, pos)
    }
}

impl Oracle for UciOracle {
    #[instrument(skip_all, fields(bot = %profile.id))]
    fn select_move(&mut self, pos: &Position, profile: &BotProfile) -> Result<Move, OracleError> {
        let result = self.search(pos, profile);
        if let Err(e) = &result
            && e.is_transient()
        {
            self.process = None;
        }
        result
    }

    fn reset(&mut self) {
        self.process = None;
    }

    fn prepare(&mut self) -> Result<(), OracleError> {
        self.process().map(|_| ())
    }

    fn name(&self) -> &str {
        self.process.as_ref().map_or("uci", |p| p.name.as_str())
    }
}

#[cfg(test)]
#[path = "oracle_tests.rs"]
mod oracle_tests;
