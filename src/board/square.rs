/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use super::Bitboard;

/// One of the eight compass directions, as a `(row, col)` delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction {
    /// Change in row per step.
    pub drow: i8,

    /// Change in column per step.
    pub dcol: i8,
}

impl Direction {
    /// All eight directions, in the fixed order used by move generation and stability.
    ///
    /// `ALL[i]` and `ALL[i + 4]` always point in opposite directions, so the first four entries
    /// describe the four axes of the board.
    pub const ALL: [Self; 8] = [
        Self::new(0, 1),
        Self::new(1, 1),
        Self::new(1, 0),
        Self::new(-1, 1),
        Self::new(0, -1),
        Self::new(-1, -1),
        Self::new(-1, 0),
        Self::new(1, -1),
    ];

    /// Construct a new [`Direction`] from a row and column delta.
    #[inline(always)]
    pub const fn new(drow: i8, dcol: i8) -> Self {
        Self { drow, dcol }
    }

    /// Returns the direction pointing the opposite way.
    ///
    /// # Example
    /// ```
    /// # use flipper::Direction;
    /// assert_eq!(Direction::ALL[1].opposite(), Direction::ALL[5]);
    /// ```
    #[inline(always)]
    pub const fn opposite(self) -> Self {
        Self::new(-self.drow, -self.dcol)
    }
}

/// Represents a single square on an 8x8 Othello board.
///
/// Internally this is the index `row * 8 + col`, where row `0` is the top row of the board
/// and column `0` is the leftmost column.
///
/// Squares are written as a column letter followed by a row number, so `(2, 3)` is `d3`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Number of rows (and columns) on the board.
    pub const SIZE: u8 = 8;

    pub const A1: Self = Self(0);
    pub const H1: Self = Self(7);
    pub const A8: Self = Self(56);
    pub const H8: Self = Self(63);

    /// The four corners, which can never be outflanked.
    pub const CORNERS: [Self; 4] = [Self::A1, Self::H1, Self::A8, Self::H8];

    /// Constructs a new [`Square`] from a row and column, both in `[0, 8)`.
    ///
    /// # Panics
    /// If either coordinate is out of bounds and debug assertions are enabled.
    ///
    /// # Example
    /// ```
    /// # use flipper::Square;
    /// let d3 = Square::new(2, 3);
    /// assert_eq!(d3.to_string(), "d3");
    /// assert_eq!(d3.index(), 19);
    /// ```
    #[inline(always)]
    pub const fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < Self::SIZE && col < Self::SIZE, "Square coordinates out of bounds");
        Self(row * Self::SIZE + col)
    }

    /// Constructs a new [`Square`] from signed coordinates, yielding `None` if they fall off the board.
    #[inline(always)]
    pub const fn try_new(row: i8, col: i8) -> Option<Self> {
        if row < 0 || col < 0 || row >= Self::SIZE as i8 || col >= Self::SIZE as i8 {
            None
        } else {
            Some(Self::new(row as u8, col as u8))
        }
    }

    /// An iterator over all squares, rows first, then columns.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// The row of this square, in `[0, 8)`.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.0 / Self::SIZE
    }

    /// The column of this square, in `[0, 8)`.
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.0 % Self::SIZE
    }

    /// The `(row, col)` pair of this square.
    #[inline(always)]
    pub const fn coords(&self) -> (u8, u8) {
        (self.row(), self.col())
    }

    /// The scalar index `row * 8 + col` used for bit addressing.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Alias for [`Bitboard::from_square`].
    #[inline(always)]
    pub const fn bitboard(&self) -> Bitboard {
        Bitboard::from_square(*self)
    }

    /// Returns `true` if this square is one of the four corners.
    #[inline(always)]
    pub const fn is_corner(&self) -> bool {
        Bitboard::CORNERS.intersects_square(*self)
    }

    /// Attempt to step `n` times in `direction` from this square.
    ///
    /// Yields `None` if that would leave the board.
    ///
    /// # Example
    /// ```
    /// # use flipper::{Direction, Square};
    /// let d3 = Square::new(2, 3);
    /// assert_eq!(d3.offset(Direction::new(1, 1), 2), Some(Square::new(4, 5)));
    /// assert_eq!(Square::A1.offset(Direction::new(-1, 0), 1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, direction: Direction, n: i8) -> Option<Self> {
        Self::try_new(
            self.row() as i8 + direction.drow * n,
            self.col() as i8 + direction.dcol * n,
        )
    }

    /// Attempt to step once in `direction`.
    #[inline(always)]
    pub const fn step(&self, direction: Direction) -> Option<Self> {
        self.offset(direction, 1)
    }

    /// An iterator over the squares reached by repeatedly stepping in `direction`, excluding `self`.
    #[inline(always)]
    pub fn ray(self, direction: Direction) -> impl Iterator<Item = Self> {
        std::iter::successors(self.step(direction), move |sq| sq.step(direction))
    }

    /// Parses a [`Square`] from its textual form, such as `d3`.
    ///
    /// # Example
    /// ```
    /// # use flipper::Square;
    /// assert_eq!(Square::from_notation("e6").unwrap(), Square::new(5, 4));
    /// assert!(Square::from_notation("z9").is_err());
    /// ```
    pub fn from_notation(square: &str) -> Result<Self> {
        let mut chars = square.trim().chars();
        let (Some(col), Some(row), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Invalid Square string: String must contain exactly 2 characters. Got {square:?}");
        };

        let col = col.to_ascii_lowercase();
        if !('a'..='h').contains(&col) {
            bail!("Invalid column for Square: Column must be between [a,h]. Got {col:?}");
        }

        let row = row
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .with_context(|| format!("Invalid row for Square: Row must be between [1,8]. Got {row:?}"))?;

        Ok(Self::new(row as u8 - 1, col as u8 - b'a'))
    }

    /// Converts this [`Square`] to its textual form.
    #[inline(always)]
    pub fn to_notation(self) -> String {
        format!("{}{}", (b'a' + self.col()) as char, self.row() + 1)
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;

    /// Alias for [`Square::from_notation`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_notation(s)
    }
}

impl fmt::Display for Square {
    /// Calls [`Square::to_notation`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_notation().fmt(f)
    }
}

impl fmt::Debug for Square {
    /// Displays the notation along with the `(row, col)` coordinates.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.to_notation(), self.row(), self.col())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_round_trips_through_notation() {
        for square in Square::iter() {
            let parsed: Square = square.to_string().parse().unwrap();
            assert_eq!(parsed, square, "{square:?} failed to round-trip");
        }
    }

    #[test]
    fn test_offsets_stop_at_edges() {
        let h8 = Square::H8;
        for direction in [Direction::new(0, 1), Direction::new(1, 0), Direction::new(1, 1)] {
            assert_eq!(h8.step(direction), None);
        }

        let ray: Vec<_> = Square::A1.ray(Direction::new(1, 1)).collect();
        assert_eq!(ray.len(), 7);
        assert_eq!(ray.last(), Some(&Square::H8));
    }

    #[test]
    fn test_direction_table_pairs_are_opposites() {
        for i in 0..4 {
            assert_eq!(Direction::ALL[i].opposite(), Direction::ALL[i + 4]);
        }
    }

    #[test]
    fn test_corners() {
        assert_eq!(Square::CORNERS.map(|sq| sq.coords()), [(0, 0), (0, 7), (7, 0), (7, 7)]);
        assert!(Square::CORNERS.iter().all(Square::is_corner));
        assert!(!Square::new(3, 3).is_corner());
    }
}
