/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not, str::FromStr};

use anyhow::{bail, Result};

/// Represents the color of a disc, or the side to move.
///
/// An empty square has no color, which is expressed as `Option<Color>::None` throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Color {
    /// Black always moves first.
    #[default]
    Black,
    White,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with Black.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::Black, Self::White]
    }

    /// Creates a new [`Color`] from a `bool`, where `true = White`.
    ///
    /// This matches the encoding of the ownership mask of a [`crate::Position`].
    ///
    /// # Example
    /// ```
    /// # use flipper::Color;
    /// assert_eq!(Color::from_bool(false), Color::Black);
    /// assert_eq!(Color::from_bool(true), Color::White);
    /// ```
    #[inline(always)]
    pub const fn from_bool(is_white: bool) -> Self {
        if is_white {
            Self::White
        } else {
            Self::Black
        }
    }

    /// Returns the opposing color.
    ///
    /// # Example
    /// ```
    /// # use flipper::Color;
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// ```
    #[inline(always)]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    /// Returns `true` if this color is [`Color::White`].
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Sign of this color in the search's frame of reference.
    ///
    /// White maximizes (`+1`) and Black minimizes (`-1`).
    #[inline(always)]
    pub const fn sign(&self) -> f64 {
        match self {
            Self::Black => -1.0,
            Self::White => 1.0,
        }
    }

    /// Index of this color, for use in per-color arrays.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Character used for a disc of this color in board diagrams.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Black => 'X',
            Self::White => 'O',
        }
    }

    /// Attempts to parse a [`Color`] from a single character.
    ///
    /// Accepts `X`/`B` for Black and `O`/`W` for White, case-insensitively.
    pub fn from_char(c: char) -> Result<Self> {
        match c.to_ascii_lowercase() {
            'x' | 'b' => Ok(Self::Black),
            'o' | 'w' => Ok(Self::White),
            _ => bail!("Invalid Color char: Expected one of [x, o, b, w]. Got {c:?}"),
        }
    }

    /// Name of this color, capitalized.
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Black => "Black",
            Self::White => "White",
        }
    }
}

impl Not for Color {
    type Output = Self;

    /// Alias for [`Color::opponent`].
    #[inline(always)]
    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Self::Black),
            "white" => Ok(Self::White),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::from_char(c),
                    _ => bail!("Invalid Color string: Expected `black`, `white`, or a single char. Got {s:?}"),
                }
            }
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}
