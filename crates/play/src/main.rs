//! chess_play - play persisted chess games against a UCI engine.

mod cli;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use session::{ClockState, GameReport, GameService, NewGame, PlayConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Where sessions live when neither the config nor the flags say.
const DEFAULT_STORE_DIR: &str = ".chess_sessions";

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut config = PlayConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = cli.store_dir.clone() {
        config.store_dir = Some(dir);
    }
    if config.store_dir.is_none() {
        config.store_dir = Some(DEFAULT_STORE_DIR.into());
    }
    debug!(?config, "configuration loaded");

    let service = GameService::from_config(&config).context("failed to open session store")?;
    run(&service, cli.command, cli.json)
}

fn run(service: &GameService, command: Command, json: bool) -> Result<()> {
    let report = match command {
        Command::Health => {
            let engine = service.engine_name()?;
            if json {
                println!("{}", serde_json::json!({ "ok": true, "engine": engine }));
            } else {
                println!("ok: {engine}");
            }
            return Ok(());
        }
        Command::Bots => {
            if json {
                println!("{}", serde_json::to_string_pretty(service.list_bots())?);
            } else {
                print!("{}", render::bots(service.list_bots()));
            }
            return Ok(());
        }
        Command::Pgn { id } => {
            println!("{}", service.pgn(&id)?);
            return Ok(());
        }
        Command::New {
            bot,
            color,
            fen,
            clock_ms,
            inc_ms,
        } => service.create_game(NewGame {
            bot,
            color,
            fen,
            clock: clock_ms.map(|ms| ClockState::new(ms, inc_ms)),
        })?,
        Command::Move {
            id,
            token,
            elapsed_ms,
        } => service.play(&id, &token, elapsed_ms)?,
        Command::Undo { id } => service.undo(&id)?,
        Command::Resign { id } => service.resign(&id)?,
        Command::Show { id } => service.get(&id)?,
    };
    print_report(&report, json)
}

fn print_report(report: &GameReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render::report(report)?);
    }
    Ok(())
}
