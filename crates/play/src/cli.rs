//! Command-line interface for chess_play.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use session::ColorChoice;

/// Play chess against a UCI engine, one request per invocation.
#[derive(Parser, Debug)]
#[command(name = "chess_play")]
#[command(about = "Play persisted chess games against a UCI engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ./chess_play.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding session documents
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Print JSON instead of a text board
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the engine starts and report its name
    Health,

    /// List the available opponents
    Bots,

    /// Start a new game
    New {
        /// Opponent profile id
        #[arg(short, long, default_value = "sophia")]
        bot: String,

        /// Your colour: white, black or auto
        #[arg(short, long, default_value = "auto")]
        color: ColorChoice,

        /// Starting position as FEN (standard start when omitted)
        #[arg(long)]
        fen: Option<String>,

        /// Starting time per side in milliseconds
        #[arg(long)]
        clock_ms: Option<u64>,

        /// Increment per move in milliseconds
        #[arg(long, default_value_t = 0, requires = "clock_ms")]
        inc_ms: u64,
    },

    /// Play a move given in coordinate form, e.g. e2e4 or e7e8q
    Move {
        id: String,
        token: String,

        /// Thinking time to charge to your clock
        #[arg(long)]
        elapsed_ms: Option<u64>,
    },

    /// Take back your last move and the reply
    Undo { id: String },

    /// Resign the game
    Resign { id: String },

    /// Show the current position and status
    Show { id: String },

    /// Print the game as PGN
    Pgn { id: String },
}
