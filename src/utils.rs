/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use anyhow::{Context, Result};

use crate::{Game, Square};

/// Compile-time verbosity of a [`crate::Search`].
///
/// Implementors are zero-sized markers, so checks like `if Log::INFO { ... }` vanish entirely when disabled.
pub trait LogLevel {
    /// Print `info` lines and the final `bestmove`.
    const INFO: bool = false;

    /// Print extra diagnostics.
    const DEBUG: bool = false;
}

/// Print nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNone;
impl LogLevel for LogNone {}

/// Print search progress and the final result.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogInfo;
impl LogLevel for LogInfo {
    const INFO: bool = true;
}

/// Print everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDebug;
impl LogLevel for LogDebug {
    const INFO: bool = true;
    const DEBUG: bool = true;
}

/// Opening lines, played from the starting position, used by the `bench` command.
///
/// They span the whole game so that the benchmark exercises early, middle, and late positions.
pub const BENCHMARK_LINES: [&str; 8] = [
    "",
    "d6 e6 f6 c6 b6 f7",
    "f4 d3 c6 f6 e6 d6 c4 c3 c7 g4 d2 c2",
    "e3 f5 f6 f3 d6 e6 g3 g7 f4 c6 g6 e2 d1 h2 g4 h6 d2 c5",
    "c5 c6 f4 f5 d6 c4 b7 d3 b3 c7 b8 g4 h4 a8 d2 h3 f6 b4 b6 e2 c2 a2 b5 b2",
    "d6 c4 d3 e6 b4 c2 d2 c3 b3 d1 e3 a5 f5 a4 c1 c6 c5 g4 g6 e2 f1 b5 h3 b1 a6 b2 a3 f2 a2 g5",
    "e3 f3 d6 d3 f4 f5 g2 e6 g3 h3 f6 d7 c4 g1 c6 c7 e2 d1 g4 e7 h2 h1 f7 b5 b4 c3 e1 b3 a3 h5 a5 f1 c8 c5 h4 g6",
    "e3 d3 c2 f2 c5 e6 f3 d2 f7 b5 c4 d6 g1 f5 c6 e7 e2 f4 g4 d7 a6 g2 b6 g3 f8 b3 h2 h3 d8 a5 f6 b7 a4 c3 b2 c1 d1 a1 a8 a2 h4 e8",
];

/// Plays a whitespace-separated list of moves on `game`.
///
/// Each move is a square such as `d3`, or `pass`.
pub fn play_line(game: &mut Game, line: &str) -> Result<()> {
    for mv_str in line.split_ascii_whitespace() {
        let mv = parse_move(mv_str)?;
        game.make_move(mv)
            .with_context(|| format!("Failed to apply {mv_str:?} from line {line:?}"))?;
    }

    Ok(())
}

/// Parses a move, where `pass` is `None` and anything else must be a [`Square`].
pub fn parse_move(mv_str: &str) -> Result<Option<Square>> {
    if mv_str.eq_ignore_ascii_case("pass") {
        Ok(None)
    } else {
        mv_str.parse().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_lines_are_legal() {
        for line in BENCHMARK_LINES {
            let mut game = Game::new();
            play_line(&mut game, line).unwrap();
            assert!(!game.is_game_over(), "{line:?} should leave moves to search");
        }
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move("pass").unwrap(), None);
        assert_eq!(parse_move("PASS").unwrap(), None);
        assert_eq!(parse_move("c4").unwrap(), Some(Square::new(3, 2)));
        assert!(parse_move("c9").is_err());
    }
}
