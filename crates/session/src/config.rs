//! Runtime configuration: an optional `chess_play.toml` overridden by the
//! environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profiles::{BotProfile, ProfileTable};

pub const DEFAULT_CONFIG_FILE: &str = "chess_play.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },
}

/// Settings for the UCI engine that picks the opponent's moves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable. Unset means the opponent cannot move.
    pub path: Option<PathBuf>,
    pub default_depth: u32,
    pub default_movetime_ms: u64,
    /// Slack on top of the move time before a silent engine is given up on.
    pub response_grace_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: None,
            default_depth: 12,
            default_movetime_ms: 300,
            response_grace_ms: 5_000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayConfig {
    pub engine: EngineConfig,
    /// Directory for session documents. Unset keeps sessions in memory.
    pub store_dir: Option<PathBuf>,
    /// Extra or replacement opponent profiles.
    pub bots: Vec<BotProfile>,
}

impl PlayConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read `path`, or `chess_play.toml` in the working directory when it
    /// exists, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path, source })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply `STOCKFISH_PATH`, `ENGINE_DEFAULT_DEPTH`,
    /// `ENGINE_DEFAULT_MOVETIME` and `CHESS_STORE_DIR`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(path) = lookup("STOCKFISH_PATH").filter(|p| !p.is_empty()) {
            self.engine.path = Some(PathBuf::from(path));
        }
        if let Some(value) = lookup("ENGINE_DEFAULT_DEPTH") {
            self.engine.default_depth = parse_env("ENGINE_DEFAULT_DEPTH", value)?;
        }
        if let Some(value) = lookup("ENGINE_DEFAULT_MOVETIME") {
            self.engine.default_movetime_ms = parse_env("ENGINE_DEFAULT_MOVETIME", value)?;
        }
        if let Some(dir) = lookup("CHESS_STORE_DIR").filter(|d| !d.is_empty()) {
            self.store_dir = Some(PathBuf::from(dir));
        }
        Ok(())
    }

    pub fn profiles(&self) -> ProfileTable {
        ProfileTable::builtin().with_overrides(self.bots.iter().cloned())
    }
}

fn parse_env<T: std::str::FromStr>(var: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { var, value })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
