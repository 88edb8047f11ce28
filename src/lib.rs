/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The board, its rules, and move generation.
mod board;

/// Commands recognized by the engine.
mod cli;

/// Code related to the engine's functionality, such as user input handling.
mod engine;

/// Evaluation of Othello positions.
mod eval;

/// Human, random, and computer players.
mod player;

/// Search values and terminal scoring.
mod score;

/// Main engine logic; all search related code.
mod search;

/// Constants that control search and evaluation.
mod tune;

/// Misc utility functions, constants, and types.
mod utils;

pub use board::*;
pub use cli::*;
pub use engine::*;
pub use eval::*;
pub use player::*;
pub use score::*;
pub use search::*;
pub use utils::*;
