use super::*;
use crate::status::{Reason, Winner};

fn play(tokens: &[&str]) -> GameRecord {
    let mut record = GameRecord::default();
    for token in tokens {
        record.push(token).unwrap();
    }
    record
}

#[test]
fn test_push_returns_san_and_position() {
    let mut record = GameRecord::default();
    let played = record.push("e2e4").unwrap();
    assert_eq!(played.san, "e4");
    assert_eq!(played.token, "e2e4");
    assert_eq!(played.position.side_to_move, Color::Black);
    assert_eq!(record.moves(), ["e2e4"]);
}

#[test]
fn test_rejected_push_leaves_record_unchanged() {
    let mut record = play(&["e2e4"]);
    assert!(matches!(record.push("e4e5x"), Err(ChessError::MalformedToken(_))));
    assert!(matches!(record.push("e2e4"), Err(ChessError::IllegalMove(_))));
    assert_eq!(record.len(), 1);
}

#[test]
fn test_replay_matches_incremental_positions() {
    let mut record = GameRecord::default();
    let mut last = None;
    for token in ["d2d4", "g8f6", "c2c4", "e7e6", "b1c3", "f8b4"] {
        last = Some(record.push(token).unwrap().position);
    }
    assert_eq!(Some(record.replay().unwrap()), last);
    assert_eq!(record.replay_all().unwrap().last(), &record.replay().unwrap());
}

#[test]
fn test_truncate_clamps_at_zero() {
    let mut record = play(&["e2e4", "e7e5", "g1f3"]);
    record.truncate(2);
    assert_eq!(record.moves(), ["e2e4"]);
    record.truncate(5);
    assert!(record.is_empty());
    record.truncate(2);
    assert!(record.is_empty());
}

#[test]
fn test_corrupt_history_reports_ply() {
    let record = GameRecord::from_parts(
        StartingPosition::Standard,
        vec!["e2e4".into(), "e7e5".into(), "e1e3".into()],
    );
    assert_eq!(
        record.replay(),
        Err(ChessError::CorruptHistory {
            ply: 3,
            token: "e1e3".into()
        })
    );
    assert!(matches!(record.status(), Err(ChessError::CorruptHistory { ply: 3, .. })));
}

#[test]
fn test_corrupt_starting_descriptor() {
    let record = GameRecord::from_parts(StartingPosition::Fen("garbage".into()), vec![]);
    assert!(matches!(record.replay(), Err(ChessError::CorruptHistory { ply: 0, .. })));
}

#[test]
fn test_starting_position_parse() {
    assert_eq!(StartingPosition::parse(None).unwrap(), StartingPosition::Standard);
    assert_eq!(StartingPosition::parse(Some("startpos")).unwrap(), StartingPosition::Standard);
    assert!(matches!(
        StartingPosition::parse(Some("8/8/8/8 w - -")),
        Err(ChessError::InvalidFen(_))
    ));
    let parsed = StartingPosition::parse(Some("4k3/8/8/8/8/8/8/4K3 w - -")).unwrap();
    assert_eq!(parsed.as_str(), "4k3/8/8/8/8/8/8/4K3 w - - 0 1");
}

#[test]
fn test_starting_position_serde() {
    let json = serde_json::to_string(&StartingPosition::Standard).unwrap();
    assert_eq!(json, "\"startpos\"");
    let back: StartingPosition = serde_json::from_str("\"8/8/8/8/8/8/8/8 w - - 0 1\"").unwrap();
    assert_eq!(back, StartingPosition::Fen("8/8/8/8/8/8/8/8 w - - 0 1".into()));
}

#[test]
fn test_fools_mate_status() {
    let record = play(&["f2f3", "e7e5", "g2g4", "d8h4"]);
    let status = record.status().unwrap();
    assert!(status.in_check);
    assert!(status.game_over);
    assert_eq!(status.winner, Some(Winner::Black));
    assert_eq!(status.reason, Some(Reason::Checkmate));
    assert_eq!(record.san_moves().unwrap(), ["f3", "e5", "g4", "Qh4#"]);
}

#[test]
fn test_threefold_by_knight_shuffle() {
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
    let mut record = GameRecord::default();
    for token in shuffle {
        record.push(token).unwrap();
    }
    assert!(!record.status().unwrap().game_over);
    for token in shuffle {
        record.push(token).unwrap();
    }
    let status = record.status().unwrap();
    assert_eq!(status.reason, Some(Reason::Threefold));
    assert_eq!(status.winner, Some(Winner::Draw));
}

#[test]
fn test_pgn_standard_start() {
    let record = play(&["e2e4", "e7e5", "g1f3"]);
    let pgn = record.to_pgn(None).unwrap();
    assert!(pgn.starts_with("[Event \"?\"]\n"));
    assert!(pgn.contains("[Result \"*\"]"));
    assert!(!pgn.contains("[FEN"));
    assert!(pgn.ends_with("\n\n1. e4 e5 2. Nf3 *"));
}

#[test]
fn test_pgn_checkmate_result() {
    let pgn = play(&["f2f3", "e7e5", "g2g4", "d8h4"]).to_pgn(None).unwrap();
    assert!(pgn.contains("[Result \"0-1\"]"));
    assert!(pgn.ends_with("1. f3 e5 2. g4 Qh4# 0-1"));
}

#[test]
fn test_pgn_override_result() {
    let pgn = play(&["e2e4"])
        .to_pgn(Some(Outcome::resignation(Color::Black)))
        .unwrap();
    assert!(pgn.ends_with("1. e4 0-1"));
}

#[test]
fn test_pgn_black_to_move_start() {
    let fen = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
    let mut record = GameRecord::new(StartingPosition::parse(Some(fen)).unwrap());
    record.push("e7e5").unwrap();
    record.push("g1f3").unwrap();
    let pgn = record.to_pgn(None).unwrap();
    assert!(pgn.contains("[SetUp \"1\"]\n[FEN \"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1\"]"));
    assert!(pgn.ends_with("1... e5 2. Nf3 *"));
}

#[test]
fn test_pgn_wraps_long_movetext() {
    let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8", "b1c3", "b8c6", "c3b1", "c6b8"];
    let mut record = GameRecord::default();
    for token in shuffle.iter().cycle().take(24) {
        record.push(token).unwrap();
    }
    let pgn = record.to_pgn(None).unwrap();
    let movetext = pgn.split("\n\n").nth(1).unwrap();
    assert!(movetext.lines().count() > 1);
    assert!(movetext.lines().all(|l| l.len() <= 80));
}

#[test]
fn test_pgn_movetext_matches_san_moves() {
    let record = play(&["d2d4", "d7d5", "c2c4", "d5c4", "e2e3", "b7b5", "a2a4", "c7c6"]);
    let pgn = record.to_pgn(None).unwrap();
    let movetext = pgn.split("\n\n").nth(1).unwrap();
    let sans: Vec<&str> = movetext
        .split_whitespace()
        .filter(|t| !t.ends_with('.') && *t != "*")
        .collect();
    assert_eq!(sans, record.san_moves().unwrap());
}
