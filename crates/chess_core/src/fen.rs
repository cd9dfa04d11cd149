//! Forsyth-Edwards Notation: the six-field position descriptor.

use crate::board::{CastlingRights, Position};
use crate::error::{ChessError, ChessResult};
use crate::types::*;

/// Sentinel accepted wherever a FEN is expected, meaning the standard array.
pub const STARTPOS: &str = "startpos";

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn invalid(msg: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(msg.into())
}

impl Position {
    /// Parse a FEN string.
    ///
    /// The halfmove and fullmove fields may be omitted (defaults `0` and
    /// `1`). Positions without exactly one king per side, or where the side
    /// that just moved is still in check, are rejected. Castling rights
    /// whose king or rook is not on its home square are dropped, and an
    /// en-passant square on the wrong rank is ignored.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 || parts.len() > 6 {
            return Err(invalid(format!("expected 4 to 6 fields, got {}", parts.len())));
        }

        let board = parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(invalid(format!("side to move {other:?}"))),
        };

        let mut castling = CastlingRights::none();
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => castling.wk = true,
                    'Q' => castling.wq = true,
                    'k' => castling.bk = true,
                    'q' => castling.bq = true,
                    _ => return Err(invalid(format!("castling character {c:?}"))),
                }
            }
        }

        let en_passant = match parts[3] {
            "-" => None,
            coord => Some(
                coord_to_sq(coord).ok_or_else(|| invalid(format!("en-passant square {coord:?}")))?,
            ),
        };

        let halfmove_clock = match parts.get(4) {
            Some(s) => s
                .parse()
                .map_err(|_| invalid(format!("halfmove clock {s:?}")))?,
            None => 0,
        };
        let fullmove_number = match parts.get(5) {
            Some(s) => s
                .parse::<u32>()
                .map_err(|_| invalid(format!("fullmove number {s:?}")))?
                .max(1),
            None => 1,
        };

        let mut pos = Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        };
        pos.sanitize_castling();
        pos.sanitize_en_passant();
        pos.validate()?;
        Ok(pos)
    }

    /// Parse either the `startpos` sentinel or a FEN string.
    pub fn from_descriptor(descriptor: &str) -> ChessResult<Self> {
        if descriptor == STARTPOS {
            Ok(Self::startpos())
        } else {
            Self::from_fen(descriptor)
        }
    }

    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board[rank * 8 + file] {
                    Some(pc) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(pc.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(self.side_to_move.fen_char());
        out.push(' ');

        let c = &self.castling;
        let rights: String = [(c.wk, 'K'), (c.wq, 'Q'), (c.bk, 'k'), (c.bq, 'q')]
            .iter()
            .filter(|(on, _)| *on)
            .map(|(_, ch)| *ch)
            .collect();
        out.push_str(if rights.is_empty() { "-" } else { &rights });

        out.push(' ');
        // The target is written only when the capture is actually legal.
        match self.capturable_en_passant() {
            Some(ep) => out.push_str(&sq_to_coord(ep)),
            None => out.push('-'),
        }
        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    fn sanitize_castling(&mut self) {
        let has = |p: &Position, s: u8, c: Color, k: PieceKind| p.piece_at(s) == Some(Piece::new(c, k));
        let white_king = has(self, 4, Color::White, PieceKind::King);
        let black_king = has(self, 60, Color::Black, PieceKind::King);
        self.castling.wk &= white_king && has(self, 7, Color::White, PieceKind::Rook);
        self.castling.wq &= white_king && has(self, 0, Color::White, PieceKind::Rook);
        self.castling.bk &= black_king && has(self, 63, Color::Black, PieceKind::Rook);
        self.castling.bq &= black_king && has(self, 56, Color::Black, PieceKind::Rook);
    }

    fn sanitize_en_passant(&mut self) {
        let Some(ep) = self.en_passant else {
            return;
        };
        // The target must sit behind an enemy pawn that could just have
        // double-pushed.
        let (ep_rank, pawn_rank, mover) = match self.side_to_move {
            Color::White => (5, 4, Color::Black),
            Color::Black => (2, 3, Color::White),
        };
        let pawn_sq = sq(file_of(ep), pawn_rank);
        let consistent = rank_of(ep) == ep_rank
            && self.piece_at(ep).is_none()
            && pawn_sq.and_then(|s| self.piece_at(s)) == Some(Piece::new(mover, PieceKind::Pawn));
        if !consistent {
            self.en_passant = None;
        }
    }

    fn validate(&self) -> ChessResult<()> {
        for color in [Color::White, Color::Black] {
            let kings = self
                .board
                .iter()
                .filter(|p| **p == Some(Piece::new(color, PieceKind::King)))
                .count();
            if kings != 1 {
                return Err(invalid(format!("{color} has {kings} kings")));
            }
        }
        let pawn_on_back_rank = (0..8u8)
            .chain(56..64)
            .any(|s| self.piece_at(s).is_some_and(|p| p.kind == PieceKind::Pawn));
        if pawn_on_back_rank {
            return Err(invalid("pawn on first or last rank"));
        }
        if self.in_check(self.side_to_move.other()) {
            return Err(invalid("side not to move is in check"));
        }
        Ok(())
    }
}

fn parse_placement(placement: &str) -> ChessResult<[Option<Piece>; 64]> {
    let mut board = [None; 64];
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid(format!("expected 8 ranks, got {}", ranks.len())));
    }

    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let mut file: i8 = 0;
        let rank: i8 = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
        for ch in rank_str.chars() {
            if let Some(d) = ch.to_digit(10) {
                if !(1..=8).contains(&d) {
                    return Err(invalid(format!("empty-run digit {d}")));
                }
                file += d as i8;
            } else {
                let kind = PieceKind::from_letter(ch)
                    .ok_or_else(|| invalid(format!("piece character {ch:?}")))?;
                let color = if ch.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let s = sq(file, rank)
                    .ok_or_else(|| invalid(format!("rank {} overflows", rank + 1)))?;
                board[s as usize] = Some(Piece::new(color, kind));
                file += 1;
            }
            if file > 8 {
                return Err(invalid(format!("rank {} has too many files", rank + 1)));
            }
        }
        if file != 8 {
            return Err(invalid(format!("rank {} has {} files", rank + 1, file)));
        }
    }
    Ok(board)
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
