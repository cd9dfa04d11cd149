//! Opponent strength profiles.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// How strong an opponent plays. Fields left unset fall back to the
/// engine-wide defaults when the search limits are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotProfile {
    pub id: String,
    pub name: String,
    pub elo: u32,
    #[serde(default)]
    pub depth: Option<u32>,
    #[serde(default)]
    pub nodes: Option<u64>,
    #[serde(default)]
    pub movetime_ms: Option<u64>,
    #[serde(default = "default_multipv")]
    pub multipv: u32,
}

fn default_multipv() -> u32 {
    1
}

impl BotProfile {
    fn builtin(id: &str, name: &str, elo: u32, depth: Option<u32>, movetime_ms: u64, multipv: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            elo,
            depth,
            nodes: None,
            movetime_ms: Some(movetime_ms),
            multipv,
        }
    }

    /// Concrete limits for one search.
    pub fn limits(&self, engine: &EngineConfig) -> SearchLimits {
        SearchLimits {
            depth: self.depth.unwrap_or(engine.default_depth),
            nodes: self.nodes,
            movetime_ms: self.movetime_ms.unwrap_or(engine.default_movetime_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: u32,
    pub nodes: Option<u64>,
    pub movetime_ms: u64,
}

impl SearchLimits {
    /// The UCI `go` command for these limits.
    pub fn go_command(&self) -> String {
        let mut cmd = format!("go depth {}", self.depth);
        if let Some(nodes) = self.nodes {
            cmd.push_str(&format!(" nodes {nodes}"));
        }
        cmd.push_str(&format!(" movetime {}", self.movetime_ms));
        cmd
    }
}

/// The opponents a game can be created against, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileTable {
    bots: Vec<BotProfile>,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileTable {
    pub fn builtin() -> Self {
        Self {
            bots: vec![
                BotProfile::builtin("penny", "Penny the Starter", 700, Some(6), 160, 2),
                BotProfile::builtin("nelson", "Nelson the Rookie", 900, Some(8), 200, 2),
                BotProfile::builtin("sophia", "Sophia the Club Player", 1200, Some(10), 250, 2),
                BotProfile::builtin("dmitri", "Dmitri the Tactician", 1600, Some(12), 300, 1),
                BotProfile::builtin("houyifan", "Hou Yifan the Expert", 2000, Some(14), 300, 1),
                BotProfile::builtin("magnus", "Magnus the Master", 2300, None, 400, 1),
            ],
        }
    }

    /// Replace profiles with a matching id and append the rest.
    pub fn with_overrides(mut self, overrides: impl IntoIterator<Item = BotProfile>) -> Self {
        for profile in overrides {
            match self.bots.iter_mut().find(|b| b.id == profile.id) {
                Some(existing) => *existing = profile,
                None => self.bots.push(profile),
            }
        }
        self
    }

    pub fn get(&self, id: &str) -> Option<&BotProfile> {
        self.bots.iter().find(|b| b.id == id)
    }

    pub fn all(&self) -> &[BotProfile] {
        &self.bots
    }
}

#[cfg(test)]
#[path = "profiles_tests.rs"]
mod profiles_tests;
