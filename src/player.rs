/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::bail;

use crate::{Color, EvalParams, LogNone, Position, Search, SearchConfig, Square};

/// Who picks the moves for one side of the board.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Player {
    /// Moves are supplied from outside, through the `play` command.
    #[default]
    Human,

    /// Picks uniformly among the legal moves.
    Random,

    /// Picks moves with an alpha-beta search.
    Computer {
        params: EvalParams,
        config: SearchConfig,
    },
}

impl Player {
    /// A computer player with the stock evaluation curve and default depth.
    #[inline(always)]
    pub fn computer() -> Self {
        Self::Computer {
            params: EvalParams::default(),
            config: SearchConfig::default(),
        }
    }

    /// Returns `true` if this player chooses its own moves.
    #[inline(always)]
    pub const fn is_computer(&self) -> bool {
        !matches!(self, Self::Human)
    }

    /// Chooses a move for `color` on `position`.
    ///
    /// Returns `None` if `color` has to pass, and always for [`Player::Human`], whose moves arrive separately.
    pub fn choose_move(&self, position: &Position, color: Color) -> Option<Square> {
        match self {
            Self::Human => None,

            Self::Random => {
                let moves = position.legal_moves(color);
                if moves.is_empty() {
                    None
                } else {
                    Some(moves[fastrand::usize(..moves.len())])
                }
            }

            Self::Computer { params, config } => {
                Search::<LogNone>::new(position, params, *config)
                    .start(color)
                    .bestmove
            }
        }
    }

    /// Short name of this kind of player.
    #[inline(always)]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Random => "random",
            Self::Computer { .. } => "computer",
        }
    }
}

impl FromStr for Player {
    type Err = anyhow::Error;

    /// Parses `human`, `random`, or `computer` (also `ai`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "h" => Ok(Self::Human),
            "random" | "r" => Ok(Self::Random),
            "computer" | "ai" | "c" => Ok(Self::computer()),
            _ => bail!("Invalid Player: Expected one of [human, random, computer]. Got {s:?}"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Computer { config, .. } => write!(f, "{} (depth {})", self.kind(), config.depth),
            _ => write!(f, "{}", self.kind()),
        }
    }
}
