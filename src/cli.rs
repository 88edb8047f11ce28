/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::str::FromStr;

use clap::{builder::BoolishValueParser, ArgAction, Parser};

use crate::{Color, Player, Square};

/// A command to be sent to the engine.
#[derive(Debug, Clone, Parser)]
#[command(
    multicall = true,
    about,
    rename_all = "lower",
    override_usage("<ENGINE COMMAND>")
)]
pub enum EngineCommand {
    /// Run a benchmark with the provided parameters.
    Bench {
        /// If set, the benchmarking results will be printed in a well-formatted table.
        #[arg(short, long, default_value = "false")]
        pretty: bool,

        /// Override the default benchmark depth.
        #[arg(short, long, required = false)]
        depth: Option<usize>,
    },

    /// Toggle extra search diagnostics: `debug on` or `debug off`.
    Debug {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        status: bool,
    },

    /// Set the search depth used by `go` and by computer players.
    Depth { depth: usize },

    /// Print a visual representation of the current board state.
    #[command(alias = "d")]
    Display,

    /// Print an evaluation of the current position.
    Eval {
        /// If set, the features and weighted scores of both sides will be printed as well.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Quit the engine.
    #[command(alias = "quit")]
    Exit,

    /// Search the current position and print the best move, without playing it.
    Go {
        /// Override the configured search depth.
        #[arg(short, long, required = false)]
        depth: Option<usize>,
    },

    /// Shows all legal moves for the side to move.
    Moves,

    /// Reset the board to the starting position, with Black to move.
    NewGame,

    /// Print the coefficients of the evaluation curves.
    Params,

    /// Pass the turn. Only allowed when the side to move has no legal move.
    Pass,

    /// Performs a perft on the current position at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Place a disc on the provided square, without applying any game rules.
    Place { square: Square, color: Color },

    /// Play a legal move for the side to move, then let any computer opponent reply.
    Play { square: Square },

    /// Choose who plays for a color: `human`, `random`, or `computer`.
    Player { color: Color, kind: Player },

    /// Set up a position from a 64-character board layout and the side to move.
    ///
    /// Use `X` for Black, `O` for White, and `.` for empty squares, rows from top to bottom.
    /// Rows may be separated by `/`.
    Position { layout: String, side: Color },

    /// Performs a split perft on the current position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Print the squares holding stable discs.
    Stable,

    /// Remove the disc at the provided square.
    Take { square: Square },
}

impl FromStr for EngineCommand {
    type Err = clap::Error;
    /// Attempt to parse an [`EngineCommand`] from a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}
