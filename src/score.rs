/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Color, Square};

/// A numerical representation of the evaluation of a position / move.
///
/// Scores are always from White's point of view: White tries to maximize them and Black tries to minimize them.
/// Finished games are worth at least [`Self::WIN`] in magnitude, far beyond anything the evaluator produces.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Score(pub f64);

impl Score {
    /// Largest possible score ever achievable.
    pub const INF: Self = Self(f64::MAX / 1024.0);

    /// Smallest magnitude of a decided game.
    pub const WIN: Self = Self(Self::INF.0 / 2.0);

    /// Score of a drawn game.
    pub const DRAW: Self = Self(0.0);

    /// Score of a finished game where White holds `white` discs and Black holds `black` discs.
    ///
    /// The winner gets [`Self::WIN`], doubled only for a full-board 64-0 sweep.
    ///
    /// # Example
    /// ```
    /// # use flipper::Score;
    /// assert_eq!(Score::terminal(32, 32), Score::DRAW);
    /// assert_eq!(Score::terminal(40, 24), Score::WIN);
    /// assert_eq!(Score::terminal(0, 64), -Score::INF);
    /// ```
    pub fn terminal(white: usize, black: usize) -> Self {
        let diff = white as i32 - black as i32;

        if diff == 0 {
            Self::DRAW
        } else if diff < 0 {
            -Self::WIN * f64::from(-diff / 64 + 1)
        } else {
            Self::WIN * f64::from(diff / 64 + 1)
        }
    }

    /// Returns `true` if this score can only come from a finished game.
    #[inline(always)]
    pub fn is_decisive(&self) -> bool {
        self.0.abs() >= Self::WIN.0
    }

    /// The color this score favors, if any.
    #[inline(always)]
    pub fn favors(&self) -> Option<Color> {
        if self.0 > 0.0 {
            Some(Color::White)
        } else if self.0 < 0.0 {
            Some(Color::Black)
        } else {
            None
        }
    }

    /// Returns `true` if `self` is strictly better than `other` for `color`.
    #[inline(always)]
    pub fn is_better_for(&self, color: Color, other: Self) -> bool {
        match color {
            Color::White => *self > other,
            Color::Black => *self < other,
        }
    }

    /// The worst possible score for `color`, used to seed a search node.
    #[inline(always)]
    pub fn worst_for(color: Color) -> Self {
        match color {
            Color::White => -Self::INF,
            Color::Black => Self::INF,
        }
    }

    /// Returns the larger of the two scores.
    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        if other > self {
            other
        } else {
            self
        }
    }

    /// Returns the smaller of the two scores.
    #[inline(always)]
    pub fn min(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }
}

macro_rules! impl_binary_op {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: Self) -> Self::Output {
                Self(self.0.$fn(rhs.0))
            }
        }

        impl std::ops::$trait<f64> for Score {
            type Output = Self;

            #[inline(always)]
            fn $fn(self, rhs: f64) -> Self::Output {
                Self(self.0.$fn(rhs))
            }
        }
    };
}

macro_rules! impl_binary_op_assign {
    ($trait:tt, $fn:ident) => {
        impl std::ops::$trait for Score {
            #[inline(always)]
            fn $fn(&mut self, rhs: Self) {
                self.0.$fn(rhs.0);
            }
        }

        impl std::ops::$trait<f64> for Score {
            #[inline(always)]
            fn $fn(&mut self, rhs: f64) {
                self.0.$fn(rhs);
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);
impl_binary_op!(Div, div);

impl_binary_op_assign!(AddAssign, add_assign);
impl_binary_op_assign!(SubAssign, sub_assign);

impl std::ops::Neg for Score {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self(self.0.neg())
    }
}

impl From<f64> for Score {
    #[inline(always)]
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl PartialEq<f64> for Score {
    fn eq(&self, other: &f64) -> bool {
        self.0.eq(other)
    }
}

impl PartialOrd<f64> for Score {
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for Score {
    /// Decided games are printed as `win <color>`, everything else as a number with two decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.favors() {
            Some(color) if self.is_decisive() => write!(f, "win {}", color.name().to_lowercase()),
            _ => write!(f, "{:.2}", self.0),
        }
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_decisive() {
            write!(f, "{:e} ({self})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A move paired with the score it leads to.
///
/// A move of `None` stands for a pass, or for a leaf where nothing was played.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoredMove {
    pub mv: Option<Square>,
    pub score: Score,
}

impl ScoredMove {
    #[inline(always)]
    pub const fn new(mv: Option<Square>, score: Score) -> Self {
        Self { mv, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_scores() {
        assert_eq!(Score::terminal(10, 10), Score::DRAW);

        // Any ordinary win is worth exactly half of infinity
        assert_eq!(Score::terminal(33, 31), Score::WIN);
        assert_eq!(Score::terminal(31, 33), -Score::WIN);
        assert_eq!(Score::terminal(20, 0), Score::WIN);

        // Only a full-board sweep doubles it
        assert_eq!(Score::terminal(64, 0), Score::INF);
        assert_eq!(Score::terminal(0, 64), -Score::INF);
    }

    #[test]
    fn test_decisive_scores() {
        assert!(Score::terminal(40, 24).is_decisive());
        assert!(!Score(1_000_000.0).is_decisive());
        assert!(!Score::DRAW.is_decisive());
        assert_eq!(Score::terminal(1, 60).favors(), Some(Color::Black));
    }

    #[test]
    fn test_better_for() {
        let low = Score(-3.5);
        let high = Score(2.0);
        assert!(high.is_better_for(Color::White, low));
        assert!(low.is_better_for(Color::Black, high));
        assert!(!low.is_better_for(Color::Black, low));
        assert!(Score::DRAW.is_better_for(Color::White, Score::worst_for(Color::White)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Score(1.234).to_string(), "1.23");
        assert_eq!(Score::terminal(50, 14).to_string(), "win white");
        assert_eq!(Score::terminal(14, 50).to_string(), "win black");
    }
}
