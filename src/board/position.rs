/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use anyhow::{bail, Result};

use super::{stability::stable_discs, Bitboard, Color, Direction, Square};

/// Reasons a move can be rejected by [`Position::play_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// The square already holds a disc.
    Occupied(Square),

    /// Placing a disc on the square would not outflank anything.
    NoCaptures(Square),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Occupied(square) => write!(f, "Illegal move {square}: square is not empty"),
            Self::NoCaptures(square) => {
                write!(f, "Illegal move {square}: no discs would be flipped")
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// The state of an Othello board.
///
/// Occupancy and ownership are stored as two [`Bitboard`]s. Totals per color are maintained
/// incrementally, while the set of stable discs is cached and only recomputed when it is queried
/// after the board has changed.
///
/// Since this type is [`Copy`], a copy is a full, independent snapshot of the board.
#[derive(Clone, Copy)]
pub struct Position {
    /// Squares holding a disc.
    occupied: Bitboard,

    /// Squares holding a white disc. Always a subset of `occupied`.
    owner: Bitboard,

    /// Cached set of stable discs. Only trustworthy while `dirty` is `false`.
    stable: Bitboard,

    /// Whether any square has changed color since `stable` was last computed.
    dirty: bool,

    /// Number of discs of each color, indexed by [`Color::index`].
    totals: [u8; Color::COUNT],

    /// Number of stable discs of each color, indexed by [`Color::index`].
    stable_counts: [u8; Color::COUNT],
}

impl Position {
    /// Constructs the standard starting position.
    ///
    /// Black holds `d4` and `e5`, White holds `e4` and `d5`.
    ///
    /// # Example
    /// ```
    /// # use flipper::{Color, Position, Square};
    /// let position = Position::new();
    /// assert_eq!(position.color_at(Square::new(3, 3)), Some(Color::Black));
    /// assert_eq!(position.color_at(Square::new(3, 4)), Some(Color::White));
    /// assert_eq!(position.move_number(), 0);
    /// ```
    pub fn new() -> Self {
        let mut position = Self::empty();

        position.set_square(Square::new(3, 3), Some(Color::Black));
        position.set_square(Square::new(4, 4), Some(Color::Black));
        position.set_square(Square::new(4, 3), Some(Color::White));
        position.set_square(Square::new(3, 4), Some(Color::White));

        position
    }

    /// Constructs a board without any discs on it.
    pub const fn empty() -> Self {
        Self {
            occupied: Bitboard::EMPTY_BOARD,
            owner: Bitboard::EMPTY_BOARD,
            stable: Bitboard::EMPTY_BOARD,
            dirty: false,
            totals: [0; Color::COUNT],
            stable_counts: [0; Color::COUNT],
        }
    }

    /// Returns the color of the disc on `square`, if there is one.
    #[inline(always)]
    pub const fn color_at(&self, square: Square) -> Option<Color> {
        if self.occupied.intersects_square(square) {
            Some(Color::from_bool(self.owner.intersects_square(square)))
        } else {
            None
        }
    }

    /// Returns `true` if `square` holds no disc.
    #[inline(always)]
    pub const fn is_empty(&self, square: Square) -> bool {
        !self.occupied.intersects_square(square)
    }

    /// Squares holding a disc.
    #[inline(always)]
    pub(crate) const fn occupied(&self) -> Bitboard {
        self.occupied
    }

    /// Squares holding a white disc.
    #[inline(always)]
    pub(crate) const fn owner(&self) -> Bitboard {
        self.owner
    }

    /// Squares holding a disc of `color`.
    #[inline(always)]
    pub fn discs(&self, color: Color) -> Bitboard {
        match color {
            Color::Black => self.occupied & !self.owner,
            Color::White => self.owner,
        }
    }

    /// Returns `true` if playing `color` on `square` would open at least one direction.
    ///
    /// A direction opens if the adjacent square holds an opposing disc and, scanning further,
    /// a disc of `color` is reached before an empty square or the edge of the board.
    pub fn is_legal(&self, square: Square, color: Color) -> bool {
        self.is_empty(square)
            && Direction::ALL
                .into_iter()
                .any(|dir| self.opens(square, dir, color))
    }

    /// Checks a single direction from `square` for a capturing line.
    #[inline(always)]
    fn opens(&self, square: Square, direction: Direction, color: Color) -> bool {
        let mut ray = square.ray(direction);

        // The adjacent square must hold an opposing disc
        if ray.next().and_then(|sq| self.color_at(sq)) != Some(color.opponent()) {
            return false;
        }

        for sq in ray {
            match self.color_at(sq) {
                Some(c) if c == color => return true,
                Some(_) => continue,
                None => return false,
            }
        }

        // Ran off the edge of the board
        false
    }

    /// Returns every legal move for `color`, rows first, then columns.
    ///
    /// An empty list means `color` has to pass.
    ///
    /// # Example
    /// ```
    /// # use flipper::{Color, Position};
    /// let moves = Position::new().legal_moves(Color::Black);
    /// let names: Vec<_> = moves.iter().map(|sq| sq.to_string()).collect();
    /// assert_eq!(names, ["e3", "f4", "c5", "d6"]);
    /// ```
    pub fn legal_moves(&self, color: Color) -> Vec<Square> {
        (!self.occupied)
            .iter()
            .filter(|&square| self.is_legal(square, color))
            .collect()
    }

    /// Returns `true` if `color` has at least one legal move.
    #[inline(always)]
    pub fn has_legal_moves(&self, color: Color) -> bool {
        (!self.occupied)
            .iter()
            .any(|square| self.is_legal(square, color))
    }

    /// Number of legal moves available to `color`.
    #[inline(always)]
    pub fn mobility(&self, color: Color) -> usize {
        (!self.occupied)
            .iter()
            .filter(|&square| self.is_legal(square, color))
            .count()
    }

    /// Computes the set of discs that `color` would flip by playing on `square`.
    ///
    /// This does not check that `square` is empty.
    pub fn flips(&self, square: Square, color: Color) -> Bitboard {
        let mut flips = Bitboard::EMPTY_BOARD;

        for direction in Direction::ALL {
            let mut run = Bitboard::EMPTY_BOARD;

            for sq in square.ray(direction) {
                match self.color_at(sq) {
                    // Bounded by our own disc; the whole run is captured
                    Some(c) if c == color => {
                        flips |= run;
                        break;
                    }
                    Some(_) => run.set(sq),
                    None => break,
                }
            }
        }

        flips
    }

    /// Plays `color` on `square`, flipping every outflanked disc.
    ///
    /// Returns the set of flipped discs, or a [`MoveError`] if the move is not legal.
    /// On error, the board is left untouched.
    ///
    /// # Example
    /// ```
    /// # use flipper::{Color, Position, Square};
    /// let mut position = Position::new();
    /// let flipped = position.play_move(Square::new(2, 4), Color::Black).unwrap();
    /// assert_eq!(flipped.population(), 1);
    /// assert_eq!(position.total_count(Color::Black), 4);
    /// assert_eq!(position.total_count(Color::White), 1);
    /// ```
    pub fn play_move(&mut self, square: Square, color: Color) -> Result<Bitboard, MoveError> {
        if !self.is_empty(square) {
            return Err(MoveError::Occupied(square));
        }

        let flips = self.flips(square, color);
        if flips.is_empty() {
            return Err(MoveError::NoCaptures(square));
        }

        self.apply(square, color, flips);
        Ok(flips)
    }

    /// Plays `color` on `square` without checking that the move is legal.
    ///
    /// The caller is responsible for only passing squares from [`Position::legal_moves`].
    #[inline(always)]
    pub fn play_move_unchecked(&mut self, square: Square, color: Color) -> Bitboard {
        debug_assert!(
            self.is_legal(square, color),
            "{color} cannot play {square} on\n{self}"
        );

        let flips = self.flips(square, color);
        self.apply(square, color, flips);
        flips
    }

    /// Places the disc and recolors everything in `flips`.
    #[inline(always)]
    fn apply(&mut self, square: Square, color: Color, flips: Bitboard) {
        self.set_square(square, Some(color));
        for flipped in flips {
            self.set_square(flipped, Some(color));
        }
    }

    /// Sets the contents of `square` directly, without applying any game rules.
    ///
    /// Passing `None` removes the disc on `square`, if any.
    /// Disc totals are kept in sync, and the stability cache is invalidated if anything changed.
    pub fn set_square(&mut self, square: Square, color: Option<Color>) {
        let old = self.color_at(square);
        if old == color {
            return;
        }

        if let Some(old) = old {
            self.totals[old.index()] -= 1;
        }

        match color {
            None => {
                self.occupied.clear(square);
                self.owner.clear(square);
            }
            Some(color) => {
                self.occupied.set(square);
                if color.is_white() {
                    self.owner.set(square);
                } else {
                    self.owner.clear(square);
                }
                self.totals[color.index()] += 1;
            }
        }

        self.dirty = true;
    }

    /// Returns `true` if neither side can move.
    ///
    /// A full board is always over, but so is any board where both sides would have to pass.
    pub fn is_game_over(&self) -> bool {
        !self.has_legal_moves(Color::Black) && !self.has_legal_moves(Color::White)
    }

    /// Returns the color with strictly more discs, or `None` on a tie.
    ///
    /// This is only meaningful once [`Position::is_game_over`] is `true`.
    pub fn winner(&self) -> Option<Color> {
        let black = self.total_count(Color::Black);
        let white = self.total_count(Color::White);

        match black.cmp(&white) {
            std::cmp::Ordering::Greater => Some(Color::Black),
            std::cmp::Ordering::Less => Some(Color::White),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Number of discs placed since the starting position.
    #[inline(always)]
    pub fn move_number(&self) -> usize {
        self.disc_count().saturating_sub(4)
    }

    /// Number of discs on the board.
    #[inline(always)]
    pub fn disc_count(&self) -> usize {
        self.occupied.population() as usize
    }

    /// Number of discs of `color` on the board.
    #[inline(always)]
    pub fn total_count(&self, color: Color) -> usize {
        self.totals[color.index()] as usize
    }

    /// Number of stable discs of `color`, recomputing stability first if the board changed.
    pub fn stable_count(&mut self, color: Color) -> usize {
        self.refresh_stability();
        self.stable_counts[color.index()] as usize
    }

    /// The set of stable discs, recomputing stability first if the board changed.
    pub fn stable_squares(&mut self) -> Bitboard {
        self.refresh_stability();
        self.stable
    }

    /// Returns `true` if the next stability query will trigger a recompute.
    #[inline(always)]
    pub const fn needs_stability_update(&self) -> bool {
        self.dirty
    }

    /// Recomputes the stability cache if the board has changed since it was last computed.
    fn refresh_stability(&mut self) {
        if !self.dirty {
            return;
        }

        self.stable = stable_discs(self.occupied, self.owner);
        self.stable_counts = [
            (self.stable & self.discs(Color::Black)).population(),
            (self.stable & self.discs(Color::White)).population(),
        ];
        self.dirty = false;
    }

    /// Renders the board as 64 characters, rows top to bottom: `X` for Black, `O` for White, `.` for empty.
    pub fn to_layout(&self) -> String {
        Square::iter()
            .map(|square| self.color_at(square).map(|c| c.char()).unwrap_or('.'))
            .collect()
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Position {
    /// Two positions are equal if they have the same discs; cached data is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.occupied == other.occupied && self.owner == other.owner
    }
}

impl Eq for Position {}

impl Hash for Position {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.occupied.hash(state);
        self.owner.hash(state);
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;

    /// Parses a board from 64 square characters, rows top to bottom.
    ///
    /// `X`/`B` is a black disc, `O`/`W` a white disc, and `.`/`-` an empty square (case-insensitive).
    /// Whitespace and `/` separators are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect::<Vec<_>>();

        if cells.len() != Square::COUNT {
            bail!(
                "Invalid board layout: Expected {} squares. Got {}",
                Square::COUNT,
                cells.len()
            );
        }

        let mut position = Self::empty();
        for (square, &c) in Square::iter().zip(&cells) {
            let color = match c {
                '.' | '-' => None,
                other => Some(Color::from_char(other)?),
            };
            position.set_square(square, color);
        }

        Ok(position)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for col in 0..Square::SIZE {
            write!(f, " {}", (b'a' + col) as char)?;
        }
        writeln!(f)?;

        for row in 0..Square::SIZE {
            write!(f, "{:>2} ", row + 1)?;
            for col in 0..Square::SIZE {
                let c = self
                    .color_at(Square::new(row, col))
                    .map(|c| c.char())
                    .unwrap_or('.');
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("layout", &self.to_layout())
            .field("black", &self.total_count(Color::Black))
            .field("white", &self.total_count(Color::White))
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    /// Checks that the cached counts agree with a full rescan of the board.
    fn assert_consistent(position: &mut Position) {
        let black = Square::iter()
            .filter(|&s| position.color_at(s) == Some(Color::Black))
            .count();
        let white = Square::iter()
            .filter(|&s| position.color_at(s) == Some(Color::White))
            .count();

        assert_eq!(position.total_count(Color::Black), black);
        assert_eq!(position.total_count(Color::White), white);
        assert_eq!(black + white, position.disc_count());

        let stable = position.stable_squares();
        assert!(position.occupied().is_superset(stable));
        assert_eq!(
            position.stable_count(Color::Black) + position.stable_count(Color::White),
            stable.population() as usize
        );
    }

    #[test]
    fn test_initial_position() {
        let mut position = Position::new();
        assert_eq!(position.disc_count(), 4);
        assert_eq!(position.move_number(), 0);
        assert_eq!(position.color_at(sq("d4")), Some(Color::Black));
        assert_eq!(position.color_at(sq("e5")), Some(Color::Black));
        assert_eq!(position.color_at(sq("d5")), Some(Color::White));
        assert_eq!(position.color_at(sq("e4")), Some(Color::White));
        assert!(position.has_legal_moves(Color::Black));
        assert!(position.has_legal_moves(Color::White));
        assert!(!position.is_game_over());
        assert_consistent(&mut position);
    }

    #[test]
    fn test_initial_legal_moves() {
        let position = Position::new();
        assert_eq!(
            position.legal_moves(Color::Black),
            vec![
                Square::new(2, 4),
                Square::new(3, 5),
                Square::new(4, 2),
                Square::new(5, 3)
            ]
        );
        assert_eq!(
            position.legal_moves(Color::White),
            vec![
                Square::new(2, 3),
                Square::new(3, 2),
                Square::new(4, 5),
                Square::new(5, 4)
            ]
        );
        assert_eq!(position.mobility(Color::Black), 4);
    }

    #[test]
    fn test_flip_updates_counts() {
        let mut position = Position::new();
        let e3 = Square::new(2, 4);

        let flips = position.flips(e3, Color::Black);
        assert_eq!(flips, sq("e4").bitboard());

        let black = position.total_count(Color::Black);
        let white = position.total_count(Color::White);
        let total = position.disc_count();

        let flipped = position.play_move(e3, Color::Black).unwrap();
        let n = flipped.population() as usize;

        assert_eq!(position.total_count(Color::Black), black + 1 + n);
        assert_eq!(position.total_count(Color::White), white - n);
        assert_eq!(position.disc_count(), total + 1);
        assert_eq!(position.move_number(), 1);
        assert_consistent(&mut position);
    }

    #[test]
    fn test_flips_multiple_directions() {
        // Playing c3 as black captures along the row, the column, and the diagonal
        let mut position: Position = "........\
                                      ........\
                                      ..-OOX..\
                                      ..OO....\
                                      ..X.X...\
                                      ........\
                                      ........\
                                      ........"
            .parse()
            .unwrap();

        let c3 = sq("c3");
        let flips = position.flips(c3, Color::Black);
        let expected: Bitboard = [sq("d3"), sq("e3"), sq("c4"), sq("d4")].into_iter().collect();
        assert_eq!(flips, expected);

        position.play_move(c3, Color::Black).unwrap();
        assert_eq!(position.total_count(Color::White), 0);
        assert_consistent(&mut position);
    }

    #[test]
    fn test_unbounded_runs_are_not_flipped() {
        // The white run on row 4 reaches the edge without a black disc behind it
        let position: Position = "........\
                                  ........\
                                  ........\
                                  .OOOOOOO\
                                  X.......\
                                  ........\
                                  ........\
                                  ........"
            .parse()
            .unwrap();

        assert!(position.flips(sq("a4"), Color::Black).is_empty());
        assert!(!position.is_legal(sq("a4"), Color::Black));
    }

    #[test]
    fn test_illegal_moves_are_rejected() {
        let mut position = Position::new();
        let before = position;

        assert_eq!(
            position.play_move(sq("d4"), Color::Black),
            Err(MoveError::Occupied(sq("d4")))
        );
        assert_eq!(
            position.play_move(sq("a1"), Color::Black),
            Err(MoveError::NoCaptures(sq("a1")))
        );
        assert_eq!(position, before);
        assert_eq!(position.disc_count(), 4);
    }

    #[test]
    fn test_stability_is_lazy_and_idempotent() {
        let mut position: Position = "XXXO....\
                                      X.......\
                                      ........\
                                      ...XO...\
                                      ...OX...\
                                      ........\
                                      ........\
                                      ........"
            .parse()
            .unwrap();

        assert!(position.needs_stability_update());
        let first = position.stable_count(Color::Black);
        assert!(!position.needs_stability_update());
        let second = position.stable_count(Color::Black);
        assert!(!position.needs_stability_update());

        assert_eq!(first, second);
        assert_eq!(first, 4);
        assert_eq!(position.stable_count(Color::White), 0);
    }

    #[test]
    fn test_mutation_invalidates_stability() {
        let mut position = Position::new();
        position.stable_squares();
        assert!(!position.needs_stability_update());

        position.play_move(sq("e3"), Color::Black).unwrap();
        assert!(position.needs_stability_update());

        // Setting a square to its current color changes nothing
        position.stable_squares();
        position.set_square(sq("e3"), Some(Color::Black));
        assert!(!position.needs_stability_update());
    }

    #[test]
    fn test_corner_stays_stable() {
        let mut position: Position = "........\
                                      .O......\
                                      ..X.....\
                                      ...XO...\
                                      ...OX...\
                                      ........\
                                      ........\
                                      ........"
            .parse()
            .unwrap();

        let a1 = sq("a1");
        assert!(position.is_legal(a1, Color::Black));
        position.play_move(a1, Color::Black).unwrap();
        assert!(position.stable_squares().intersects(a1));

        // Keep playing out the game; the corner never changes hands
        let mut color = Color::White;
        let mut rng = fastrand::Rng::with_seed(7);
        while !position.is_game_over() {
            let moves = position.legal_moves(color);
            if !moves.is_empty() {
                let mv = moves[rng.usize(..moves.len())];
                position.play_move(mv, color).unwrap();
                assert!(position.stable_squares().intersects(a1));
                assert_eq!(position.color_at(a1), Some(Color::Black));
            }
            color = !color;
        }
    }

    #[test]
    fn test_random_playouts_conserve_discs() {
        let mut rng = fastrand::Rng::with_seed(0x0DD5);

        for _ in 0..200 {
            let mut position = Position::new();
            let mut color = Color::Black;
            assert_consistent(&mut position);

            while !position.is_game_over() {
                let moves = position.legal_moves(color);
                if !moves.is_empty() {
                    let mv = moves[rng.usize(..moves.len())];
                    let mine = position.total_count(color);
                    let theirs = position.total_count(!color);

                    let flipped = position.play_move(mv, color).unwrap().population() as usize;
                    assert!(flipped > 0);
                    assert_eq!(position.total_count(color), mine + 1 + flipped);
                    assert_eq!(position.total_count(!color), theirs - flipped);
                    assert_consistent(&mut position);
                }
                color = !color;
            }

            assert_eq!(position.move_number(), position.disc_count() - 4);
        }
    }

    #[test]
    fn test_removal_keeps_counts_in_sync() {
        let mut position = Position::new();
        position.set_square(sq("d4"), None);
        assert_eq!(position.color_at(sq("d4")), None);
        assert_eq!(position.total_count(Color::Black), 1);
        assert_eq!(position.disc_count(), 3);

        position.set_square(sq("e4"), Some(Color::Black));
        assert_eq!(position.total_count(Color::Black), 2);
        assert_eq!(position.total_count(Color::White), 1);
        assert_consistent(&mut position);
    }

    #[test]
    fn test_game_over_and_winner() {
        // Black has wiped out White
        let position: Position = "XXXXXXXX\
                                  ........\
                                  ........\
                                  ........\
                                  ........\
                                  ........\
                                  ........\
                                  ........"
            .parse()
            .unwrap();
        assert!(position.is_game_over());
        assert_eq!(position.winner(), Some(Color::Black));

        // Full board, split evenly
        let position: Position = format!("{}{}", "X".repeat(32), "O".repeat(32))
            .parse()
            .unwrap();
        assert!(position.is_game_over());
        assert_eq!(position.winner(), None);
    }

    #[test]
    fn test_pass_is_not_game_over() {
        // White cannot move, but Black can still play h1 to capture g1
        let position: Position = "XXXXXXO.\
                                  XXXXXXXX\
                                  XXXXXXXX\
                                  XXXXXXXX\
                                  XXXXXXXX\
                                  XXXXXXXX\
                                  XXXXXXXX\
                                  XXXXXXXX"
            .parse()
            .unwrap();

        assert!(position.legal_moves(Color::White).is_empty());
        assert_eq!(position.legal_moves(Color::Black), vec![sq("h1")]);
        assert!(!position.is_game_over());
    }

    #[test]
    fn test_layout_round_trip() {
        let mut position = Position::new();
        position.play_move(sq("f4"), Color::Black).unwrap();

        let parsed: Position = position.to_layout().parse().unwrap();
        assert_eq!(parsed, position);
        assert!("XO".parse::<Position>().is_err());
        assert!(format!("{}?", ".".repeat(63)).parse::<Position>().is_err());
    }
}
