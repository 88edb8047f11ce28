/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not};

use super::Square;

/// A [`Bitboard`] represents a set of squares on the board as a 64-bit number.
///
/// Bit `i` corresponds to the square with index `i = row * 8 + col`, so the low-order byte
/// holds the top row of the board as it is displayed.
///
/// Bit index 0 is the least-significant bit (LSB = 2^0), square `a1`.
/// Bit index 63 is the most-significant bit (MSB = 2^63), square `h8`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    pub const EMPTY_BOARD: Self = Self(0x0000000000000000);
    pub const CORNERS: Self = Self(0x8100000000000081);

    /// Constructs a new [`Bitboard`] from the provided bit pattern.
    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Constructs a new [`Bitboard`] with only the bit of `square` set.
    ///
    /// # Example
    /// ```
    /// # use flipper::{Bitboard, Square};
    /// let board = Bitboard::from_square(Square::H8);
    /// assert_eq!(board.to_hex_string(), "0x8000000000000000");
    /// ```
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.0)
    }

    /// Returns the raw bit pattern.
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Returns `true` if no bits are set.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if at least one bit is set.
    #[inline(always)]
    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }

    /// Returns `true` if the bit of `square` is set.
    #[inline(always)]
    pub const fn intersects_square(&self, square: Square) -> bool {
        self.0 & (1 << square.0) != 0
    }

    /// Returns `true` if `self` and `other` share any set bits.
    #[inline(always)]
    pub fn intersects(&self, other: impl Into<Self>) -> bool {
        let other: Self = other.into();
        (*self & other).is_nonempty()
    }

    /// Returns `true` if every bit of `other` is also set in `self`.
    #[inline(always)]
    pub fn is_superset(&self, other: impl Into<Self>) -> bool {
        let other: Self = other.into();
        (*self & other) == other
    }

    /// Sets the bit(s) specified by `other` to `1` (on).
    #[inline(always)]
    pub fn set(&mut self, other: impl Into<Self>) {
        let other: Self = other.into();
        *self |= other
    }

    /// Clears the bit(s) specified by `other` to `0` (off).
    #[inline(always)]
    pub fn clear(&mut self, other: impl Into<Self>) {
        let other: Self = other.into();
        *self &= !other
    }

    /// Returns the lowest set bit as a [`Square`], if any.
    #[inline(always)]
    pub fn lsb(&self) -> Option<Square> {
        self.is_nonempty().then(|| Square(self.0.trailing_zeros() as u8))
    }

    /// Pops and returns the lowest set bit as a [`Square`], if any.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        let lsb = self.lsb();
        self.0 &= self.0.wrapping_sub(1);
        lsb
    }

    /// Returns a [`BitboardIter`] over all set bits as [`Square`]s, in ascending index order.
    #[inline(always)]
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter { bitboard: *self }
    }

    /// Yields the total number of `1`s in this [`Bitboard`].
    ///
    /// # Example
    /// ```
    /// # use flipper::Bitboard;
    /// assert_eq!(Bitboard::CORNERS.population(), 4);
    /// ```
    #[inline(always)]
    pub const fn population(&self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Formats this [`Bitboard`] as a `0x`-prefixed, 16-digit hexadecimal string.
    #[inline(always)]
    pub fn to_hex_string(&self) -> String {
        format!("0x{:0>16X}", self.0)
    }
}

macro_rules! impl_bitwise_op {
    ($op:tt, $op_assign:tt, $func:ident, $func_assign:ident) => {
        impl<T> std::ops::$op<T> for Bitboard
        where
            Self: From<T>,
        {
            type Output = Self;
            #[inline(always)]
            fn $func(self, rhs: T) -> Self::Output {
                Self(self.0.$func(Self::from(rhs).0))
            }
        }

        impl<T> std::ops::$op_assign<T> for Bitboard
        where
            Self: From<T>,
        {
            #[inline(always)]
            fn $func_assign(&mut self, rhs: T) {
                self.0.$func_assign(Self::from(rhs).0);
            }
        }
    };
}

impl_bitwise_op!(BitAnd, BitAndAssign, bitand, bitand_assign);
impl_bitwise_op!(BitOr, BitOrAssign, bitor, bitor_assign);
impl_bitwise_op!(BitXor, BitXorAssign, bitxor, bitxor_assign);

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl From<Square> for Bitboard {
    /// Wrapper for [`Bitboard::from_square`].
    #[inline(always)]
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}

impl From<u64> for Bitboard {
    /// Wrapper for [`Bitboard::new`].
    #[inline(always)]
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::EMPTY_BOARD, |bb, square| bb | square)
    }
}

impl Default for Bitboard {
    #[inline(always)]
    fn default() -> Self {
        Self::EMPTY_BOARD
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(136);

        for row in 0..Square::SIZE {
            for col in 0..Square::SIZE {
                let occupant = if self.intersects_square(Square::new(row, col)) {
                    'X'
                } else {
                    '.'
                };

                board.push(occupant);
                board.push(' ');
            }
            board.push('\n');
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{self}", self.to_hex_string())
    }
}

/// An iterator over all set bits in a [`Bitboard`].
///
/// See [`Bitboard::iter`].
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bitboard.population() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for BitboardIter {
    #[inline(always)]
    fn len(&self) -> usize {
        self.bitboard.population() as usize
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: self }
    }
}

impl IntoIterator for &Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: *self }
    }
}
