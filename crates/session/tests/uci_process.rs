//! `UciOracle` against a scripted stand-in engine.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use chess_core::{Position, encode};
use session::{EngineConfig, Oracle, OracleError, ProfileTable, UciOracle, select_with_retry};

const FAKE_ENGINE: &str = r#"#!/bin/sh
while read -r line; do
  case "$line" in
    uci) echo "id name FakeFish 1.0"; echo "option name UCI_Elo type spin"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "info depth 1 score cp 20"; echo "bestmove e7e5 ponder g1f3" ;;
    quit) exit 0 ;;
  esac
done
"#;

const SILENT_ENGINE: &str = r#"#!/bin/sh
while read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
    quit) exit 0 ;;
  esac
done
"#;

fn install(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// Kept as a single test so no other thread forks while a script is being
// written.
#[test]
fn test_uci_oracle_conversation() {
    let dir = tempfile::tempdir().unwrap();
    let fake = install(dir.path(), "fakefish", FAKE_ENGINE);
    let silent = install(dir.path(), "silent", SILENT_ENGINE);
    let profile = ProfileTable::builtin().get("penny").cloned().unwrap();
    let after_e4 =
        Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap();

    let mut oracle = UciOracle::new(EngineConfig {
        path: Some(fake),
        ..EngineConfig::default()
    });
    let mv = select_with_retry(&mut oracle, &after_e4, &profile).unwrap();
    assert_eq!(encode(mv), "e7e5");
    assert_eq!(oracle.name(), "FakeFish 1.0");
    // The process is reused for the next request.
    assert_eq!(encode(oracle.select_move(&after_e4, &profile).unwrap()), "e7e5");

    // An answer that is illegal in the position is not retried.
    let err = oracle.select_move(&Position::startpos(), &profile).unwrap_err();
    assert!(matches!(err, OracleError::BadMove(ref t) if t == "e7e5"));

    let mut oracle = UciOracle::new(EngineConfig {
        path: Some(silent),
        default_movetime_ms: 50,
        response_grace_ms: 200,
        ..EngineConfig::default()
    });
    let magnus = ProfileTable::builtin().get("magnus").cloned().unwrap();
    let magnus = session::BotProfile {
        movetime_ms: None,
        ..magnus
    };
    let err = select_with_retry(&mut oracle, &after_e4, &magnus).unwrap_err();
    assert!(matches!(err, OracleError::Timeout("bestmove")));
}
