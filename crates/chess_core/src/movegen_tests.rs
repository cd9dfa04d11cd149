use super::*;

fn has(moves: &[Move], from: &str, to: &str) -> bool {
    let from = coord_to_sq(from).unwrap();
    let to = coord_to_sq(to).unwrap();
    moves.iter().any(|m| m.from == from && m.to == to)
}

#[test]
fn test_startpos_moves() {
    let pos = Position::startpos();
    let moves = legal_moves(&pos);
    // Starting position has 20 legal moves
    assert_eq!(moves.len(), 20);
}

#[test]
fn test_kiwipete_moves() {
    // Kiwipete position - complex with many move types
    let pos =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -")
            .unwrap();
    let moves = legal_moves(&pos);
    assert_eq!(moves.len(), 48);
    assert_eq!(moves.iter().filter(|m| m.is_castle).count(), 2);
}

#[test]
fn test_castling_blocked_by_attacked_transit_square() {
    // Black rook on f8 covers f1: no kingside castling, queenside still fine.
    let pos = Position::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let moves = legal_moves(&pos);
    assert!(!has(&moves, "e1", "g1"));
    assert!(has(&moves, "e1", "c1"));
}

#[test]
fn test_castling_allowed_when_only_b_file_attacked() {
    // b1 only needs to be empty, not safe.
    let pos = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K3 w Q - 0 1").unwrap();
    assert!(has(&legal_moves(&pos), "e1", "c1"));
}

#[test]
fn test_no_castling_out_of_check() {
    let pos = Position::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let moves = legal_moves(&pos);
    assert!(moves.iter().all(|m| !m.is_castle));
}

#[test]
fn test_en_passant_generated_only_with_target() {
    let with_ep = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
    let moves = legal_moves(&with_ep);
    let ep = moves
        .iter()
        .find(|m| m.is_en_passant)
        .expect("en passant available");
    assert_eq!(sq_to_coord(ep.to), "d6");

    let without = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - - 0 2").unwrap();
    assert!(legal_moves(&without).iter().all(|m| !m.is_en_passant));
}

#[test]
fn test_en_passant_exposing_king_is_illegal() {
    // Capturing on d6 would clear the fifth rank between the rook and the king.
    let pos = Position::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 2").unwrap();
    assert!(legal_moves(&pos).iter().all(|m| !m.is_en_passant));
}

#[test]
fn test_all_four_promotions() {
    let pos = Position::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
    let promos: Vec<_> = legal_moves(&pos)
        .into_iter()
        .filter_map(|m| m.promo)
        .collect();
    assert_eq!(promos.len(), 4);
    for kind in [PieceKind::Knight, PieceKind::Bishop, PieceKind::Rook, PieceKind::Queen] {
        assert!(promos.contains(&kind));
    }
}

#[test]
fn test_pinned_piece_cannot_move() {
    // The e2 knight is pinned against the king by the e8 rook.
    let pos = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
    let e2 = coord_to_sq("e2").unwrap();
    assert!(legal_moves(&pos).iter().all(|m| m.from != e2));
}

#[test]
fn test_no_move_leaves_own_king_attacked() {
    let pos =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -")
            .unwrap();
    for mv in legal_moves(&pos) {
        let next = pos.apply_move(mv).unwrap();
        assert!(!next.in_check(Color::White), "{mv:?} leaves the king in check");
    }
}
