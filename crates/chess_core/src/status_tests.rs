use super::*;

fn status_of(fen: &str) -> Status {
    evaluate_position(&Position::from_fen(fen).unwrap())
}

#[test]
fn test_startpos_ongoing() {
    assert_eq!(evaluate_position(&Position::startpos()), Status::ongoing(false));
}

#[test]
fn test_fools_mate_is_checkmate_for_black() {
    let st = status_of("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    assert!(st.in_check);
    assert!(st.game_over);
    assert_eq!(st.winner, Some(Winner::Black));
    assert_eq!(st.reason, Some(Reason::Checkmate));
}

#[test]
fn test_stalemate() {
    let st = status_of("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1");
    assert!(!st.in_check);
    assert_eq!(st.winner, Some(Winner::Draw));
    assert_eq!(st.reason, Some(Reason::Stalemate));
}

#[test]
fn test_fifty_move_threshold() {
    let st = status_of("8/8/8/4k3/8/4K3/8/8 w - - 100 60");
    assert_eq!(st.reason, Some(Reason::FiftyMove));
    let st = status_of("8/8/8/4k3/8/4K3/8/8 w - - 99 60");
    assert!(!st.game_over);
}

#[test]
fn test_checkmate_beats_fifty_move() {
    // Back-rank mate delivered on the hundredth quiet ply.
    let st = status_of("R5k1/5ppp/8/8/8/8/8/6K1 b - - 100 80");
    assert_eq!(st.reason, Some(Reason::Checkmate));
}

#[test]
fn test_threefold_counts_current_key() {
    let pos = Position::startpos();
    let key = pos.position_hash();
    assert!(!evaluate(&pos, &[key, 1, 2, key]).game_over);
    let st = evaluate(&pos, &[key, 1, 2, key, 3, 4, key]);
    assert_eq!(st.reason, Some(Reason::Threefold));
    assert_eq!(st.winner, Some(Winner::Draw));
}

#[test]
fn test_override_keeps_check_flag() {
    let st = Status::ongoing(true).with_override(Some(Outcome::resignation(Color::Black)));
    assert!(st.in_check);
    assert!(st.game_over);
    assert_eq!(st.winner, Some(Winner::Black));
    assert_eq!(st.reason, Some(Reason::Resign));

    let st = Status::ongoing(false).with_override(Some(Outcome::timeout(Color::Black)));
    assert_eq!(st.winner, Some(Winner::White));
    assert_eq!(st.reason, Some(Reason::Timeout));
}

#[test]
fn test_status_wire_format() {
    let st = status_of("8/8/8/4k3/8/4K3/8/8 w - - 100 60");
    let json = serde_json::to_value(st).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "inCheck": false,
            "gameOver": true,
            "winner": "draw",
            "reason": "50move",
        })
    );
}

#[test]
fn test_result_markers() {
    assert_eq!(Status::ongoing(false).result_marker(), "*");
    let mate = status_of("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
    assert_eq!(mate.result_marker(), "0-1");
    assert_eq!(status_of("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1").result_marker(), "1/2-1/2");
}
