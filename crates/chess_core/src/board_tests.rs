use super::*;

fn pos(fen: &str) -> Position {
    Position::from_fen(fen).unwrap()
}

fn mv(token: &str) -> Move {
    crate::codec::parse_token(token).unwrap()
}

#[test]
fn test_apply_move_is_pure() {
    let start = Position::startpos();
    let next = start.apply_move(mv("e2e4")).unwrap();
    assert_eq!(start, Position::startpos());
    assert_eq!(next.side_to_move, Color::Black);
    assert_eq!(next.en_passant, coord_to_sq("e3"));
    assert_eq!(
        next.to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
    );
}

#[test]
fn test_apply_move_rejects_illegal() {
    let start = Position::startpos();
    assert!(matches!(
        start.apply_move(mv("e2e5")),
        Err(ChessError::IllegalMove(_))
    ));
    assert!(matches!(
        start.apply_move(mv("e7e5")),
        Err(ChessError::IllegalMove(_))
    ));
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 10");
    let next = p.apply_move(mv("e1g1")).unwrap();
    assert_eq!(next.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 10");
    let next = next.apply_move(mv("e8c8")).unwrap();
    assert_eq!(next.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 5 11");
}

#[test]
fn test_rook_capture_clears_opponent_right() {
    let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    let next = p.apply_move(mv("a1a8")).unwrap();
    assert!(!next.castling.wq);
    assert!(!next.castling.bq);
    assert!(next.castling.wk && next.castling.bk);
}

#[test]
fn test_en_passant_removes_captured_pawn() {
    let p = pos("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
    let next = p.apply_move(mv("e5d6")).unwrap();
    assert_eq!(next.piece_at(coord_to_sq("d5").unwrap()), None);
    assert_eq!(
        next.piece_at(coord_to_sq("d6").unwrap()),
        Some(Piece::new(Color::White, PieceKind::Pawn))
    );
    assert_eq!(next.halfmove_clock, 0);
}

#[test]
fn test_underpromotion() {
    let p = pos("8/4P3/8/8/8/8/k7/4K3 w - - 7 40");
    let next = p.apply_move(mv("e7e8r")).unwrap();
    assert_eq!(
        next.piece_at(coord_to_sq("e8").unwrap()),
        Some(Piece::new(Color::White, PieceKind::Rook))
    );
    assert_eq!(next.halfmove_clock, 0);
}

#[test]
fn test_make_unmake_restores_position() {
    let original = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
    let mut scratch = original.clone();
    for m in crate::movegen::legal_moves(&original) {
        let undo = scratch.make_move(m);
        scratch.unmake_move(m, undo);
        assert_eq!(scratch, original, "unmake of {m:?} diverged");
    }
}

#[test]
fn test_is_check() {
    assert!(!Position::startpos().is_check());
    assert!(pos("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").is_check());
}
