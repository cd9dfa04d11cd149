//! Plain-text rendering of game reports.

use chess_core::{Color, Position, Reason, Status, Winner, sq};
use session::{BotProfile, GameReport};

/// Board diagram from `perspective`'s side, with rank and file labels.
pub fn board(pos: &Position, perspective: Color) -> String {
    let ranks: Vec<i8> = match perspective {
        Color::White => (0..8).rev().collect(),
        Color::Black => (0..8).collect(),
    };
    let files: Vec<i8> = match perspective {
        Color::White => (0..8).collect(),
        Color::Black => (0..8).rev().collect(),
    };

    let mut out = String::new();
    for &rank in &ranks {
        out.push_str(&format!("{} ", rank + 1));
        for &file in &files {
            let piece = sq(file, rank).and_then(|s| pos.piece_at(s));
            out.push(' ');
            out.push(piece.map_or('.', |p| p.fen_char()));
        }
        out.push('\n');
    }
    out.push_str("  ");
    for &file in &files {
        out.push(' ');
        out.push((b'a' + file as u8) as char);
    }
    out.push('\n');
    out
}

pub fn status_line(status: &Status, to_move: Color) -> String {
    if !status.game_over {
        let check = if status.in_check { " (check)" } else { "" };
        return format!("{to_move} to move{check}");
    }
    let how = match status.reason {
        Some(Reason::Checkmate) => "checkmate",
        Some(Reason::Stalemate) => "stalemate",
        Some(Reason::Resign) => "resignation",
        Some(Reason::Timeout) => "timeout",
        Some(Reason::Threefold) => "threefold repetition",
        Some(Reason::FiftyMove) => "fifty-move rule",
        None => "unknown reason",
    };
    match status.winner {
        Some(Winner::Draw) | None => format!("draw by {how}"),
        Some(Winner::White) => format!("white wins by {how}"),
        Some(Winner::Black) => format!("black wins by {how}"),
    }
}

pub fn report(report: &GameReport) -> anyhow::Result<String> {
    let pos = Position::from_fen(&report.fen)?;
    let perspective = report.human_color.unwrap_or(Color::White);

    let mut out = format!("game {} vs {}\n", report.id, report.bot);
    if let Some(mv) = &report.user_move {
        out.push_str(&format!("you played {}\n", mv.san));
    }
    if let Some(mv) = &report.bot_move {
        out.push_str(&format!("{} played {} ({})\n", report.bot, mv.san, mv.uci));
    }
    out.push('\n');
    out.push_str(&board(&pos, perspective));
    out.push('\n');
    out.push_str(&status_line(&report.status, pos.side_to_move));
    out.push('\n');
    if let Some(clock) = &report.clock {
        out.push_str(&format!(
            "clock: white {} / black {}\n",
            format_ms(clock.white_ms),
            format_ms(clock.black_ms)
        ));
    }
    out.push_str(&format!("fen: {}\n", report.fen));
    Ok(out)
}

pub fn bots(profiles: &[BotProfile]) -> String {
    profiles
        .iter()
        .map(|b| format!("{:<10} {:>5}  {}\n", b.id, b.elo, b.name))
        .collect()
}

/// `M:SS`, with tenths under ten seconds.
pub fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    if ms < 10_000 {
        format!("{}:{:02}.{}", secs / 60, secs % 60, (ms % 1000) / 100)
    } else {
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
