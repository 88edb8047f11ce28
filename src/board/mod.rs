/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Sets of squares as 64-bit masks.
mod bitboard;

/// Black and White.
mod color;

/// A position paired with the side to move.
mod game;

/// Move generation testing and debugging.
mod perft;

/// Board state and the rules of Othello.
mod position;

/// Board coordinates and compass directions.
mod square;

/// Detection of discs that can never be flipped.
mod stability;

pub use bitboard::*;
pub use color::*;
pub use game::*;
pub use perft::*;
pub use position::*;
pub use square::*;
