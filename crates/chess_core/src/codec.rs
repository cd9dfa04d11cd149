//! Move codec: coordinate tokens (`e2e4`, `e7e8q`) and standard algebraic
//! notation.

use crate::board::Position;
use crate::error::{ChessError, ChessResult};
use crate::movegen::legal_moves;
use crate::types::*;

/// Render a move in coordinate form.
pub fn encode(mv: Move) -> String {
    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(mv.to));
    if let Some(p) = mv.promo {
        s.push(p.letter().to_ascii_lowercase());
    }
    s
}

/// Parse a coordinate token without consulting a position.
///
/// Only the exact grammar `<file><rank><file><rank>[qrbn]` is accepted.
pub fn parse_token(token: &str) -> ChessResult<Move> {
    let malformed = || ChessError::MalformedToken(token.to_string());
    if !token.is_ascii() || !(4..=5).contains(&token.len()) {
        return Err(malformed());
    }
    let from = coord_to_sq(&token[0..2]).ok_or_else(malformed)?;
    let to = coord_to_sq(&token[2..4]).ok_or_else(malformed)?;
    let promo = match token.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(PieceKind::Queen),
        Some(b'r') => Some(PieceKind::Rook),
        Some(b'b') => Some(PieceKind::Bishop),
        Some(b'n') => Some(PieceKind::Knight),
        Some(_) => return Err(malformed()),
    };
    Ok(Move {
        promo,
        ..Move::new(from, to)
    })
}

/// Parse a token and resolve it against the legal moves of `pos`.
///
/// The returned move carries the generator's castle/en-passant flags.
pub fn decode(token: &str, pos: &Position) -> ChessResult<Move> {
    let wanted = parse_token(token)?;
    legal_moves(pos)
        .into_iter()
        .find(|m| *m == wanted)
        .ok_or_else(|| ChessError::IllegalMove(token.to_string()))
}

/// Standard algebraic notation for `mv`, which must be legal in `pos`.
pub fn encode_algebraic(mv: Move, pos: &Position) -> ChessResult<String> {
    let legal = legal_moves(pos);
    let mv = legal
        .iter()
        .copied()
        .find(|m| *m == mv)
        .ok_or_else(|| ChessError::IllegalMove(encode(mv)))?;
    let piece = pos
        .piece_at(mv.from)
        .ok_or_else(|| ChessError::IllegalMove(encode(mv)))?;

    let mut san = if mv.is_castle {
        if mv.to > mv.from {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        }
    } else {
        let mut san = String::new();
        let is_capture = pos.piece_at(mv.to).is_some() || mv.is_en_passant;

        if piece.kind == PieceKind::Pawn {
            if is_capture {
                san.push(file_char(mv.from));
            }
        } else {
            san.push(piece.kind.letter());
            san.push_str(&disambiguator(pos, &legal, mv, piece.kind));
        }

        if is_capture {
            san.push('x');
        }
        san.push_str(&sq_to_coord(mv.to));

        if let Some(promo) = mv.promo {
            san.push('=');
            san.push(promo.letter());
        }
        san
    };

    let mut after = pos.clone();
    after.make_move(mv);
    if after.is_check() {
        san.push(if legal_moves(&after).is_empty() { '#' } else { '+' });
    }
    Ok(san)
}

// File if it is unique among the rivals, else rank, else both.
fn disambiguator(pos: &Position, legal: &[Move], mv: Move, kind: PieceKind) -> String {
    let rivals: Vec<u8> = legal
        .iter()
        .filter(|m| m.to == mv.to && m.from != mv.from)
        .filter(|m| pos.piece_at(m.from).is_some_and(|p| p.kind == kind))
        .map(|m| m.from)
        .collect();
    if rivals.is_empty() {
        return String::new();
    }
    let same_file = rivals.iter().any(|&s| file_of(s) == file_of(mv.from));
    let same_rank = rivals.iter().any(|&s| rank_of(s) == rank_of(mv.from));
    match (same_file, same_rank) {
        (false, _) => file_char(mv.from).to_string(),
        (true, false) => rank_char(mv.from).to_string(),
        (true, true) => sq_to_coord(mv.from),
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod codec_tests;
