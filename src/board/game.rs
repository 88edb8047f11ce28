/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref, str::FromStr};

use anyhow::{bail, Context, Result};

use super::{perft, Color, Position, Square};

/// Formats a move for output, where `None` is a pass.
#[inline(always)]
pub fn fmt_move(mv: Option<Square>) -> String {
    mv.map(|sq| sq.to_string())
        .unwrap_or_else(|| String::from("pass"))
}

/// Represents a game of Othello in progress.
///
/// This wraps a [`Position`] together with the color whose turn it is.
/// Unlike [`Position::play_move`], moves made through a [`Game`] always belong to the side to move,
/// and the turn passes to the opponent afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Game {
    /// The board being played on.
    position: Position,

    /// The color whose turn it is.
    side_to_move: Color,
}

impl Game {
    /// Creates a new [`Game`] from the standard starting position, with Black to move.
    #[inline(always)]
    pub fn new() -> Self {
        Self::from_position(Position::new(), Color::Black)
    }

    /// Creates a new [`Game`] from the provided [`Position`] and side to move.
    #[inline(always)]
    pub const fn from_position(position: Position, side_to_move: Color) -> Self {
        Self {
            position,
            side_to_move,
        }
    }

    /// Fetch the internal [`Position`] of this [`Game`].
    #[inline(always)]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Mutably fetch the internal [`Position`], for editing the board directly.
    #[inline(always)]
    pub fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    /// The color whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Hands the turn to the opponent without touching the board.
    #[inline(always)]
    pub fn toggle_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// All legal placements for the side to move.
    ///
    /// # Example
    /// ```
    /// # use flipper::Game;
    /// assert_eq!(Game::new().legal_moves().len(), 4);
    /// ```
    #[inline(always)]
    pub fn legal_moves(&self) -> Vec<Square> {
        self.position.legal_moves(self.side_to_move)
    }

    /// All moves available to the side to move, with a pass expressed as `None`.
    ///
    /// If the side to move cannot place a disc but the game is not over, the only option is to pass.
    /// If the game is over, there are no options at all.
    pub fn available_moves(&self) -> Vec<Option<Square>> {
        let moves = self.legal_moves();

        if !moves.is_empty() {
            moves.into_iter().map(Some).collect()
        } else if self.position.has_legal_moves(self.side_to_move.opponent()) {
            vec![None]
        } else {
            Vec::new()
        }
    }

    /// Returns `true` if the side to move has no placement but the opponent does.
    #[inline(always)]
    pub fn needs_pass(&self) -> bool {
        !self.position.has_legal_moves(self.side_to_move)
            && self.position.has_legal_moves(self.side_to_move.opponent())
    }

    /// Returns `true` if neither side can move.
    #[inline(always)]
    pub fn is_game_over(&self) -> bool {
        self.position.is_game_over()
    }

    /// The winner of the game, or `None` on a tie or if the game is still going.
    #[inline(always)]
    pub fn winner(&self) -> Option<Color> {
        if self.is_game_over() {
            self.position.winner()
        } else {
            None
        }
    }

    /// Describes the final result as `"Black"`, `"White"`, or `"Tie"`.
    ///
    /// # Example
    /// ```
    /// # use flipper::Game;
    /// let game: Game = format!("{} x", "X".repeat(64)).parse().unwrap();
    /// assert_eq!(game.result_string(), "Black");
    /// ```
    pub fn result_string(&self) -> &'static str {
        match self.position.winner() {
            Some(color) => color.name(),
            None => "Tie",
        }
    }

    /// Applies `mv` for the side to move and hands the turn to the opponent.
    ///
    /// `Some(square)` must be a legal placement. `None` passes, which is only permitted when the side to
    /// move has no placement at all. On error, the game is left untouched.
    pub fn make_move(&mut self, mv: Option<Square>) -> Result<()> {
        let color = self.side_to_move;

        match mv {
            Some(square) => {
                self.position
                    .play_move(square, color)
                    .with_context(|| format!("{color} cannot play {square}"))?;
            }
            None => {
                if self.position.has_legal_moves(color) {
                    bail!("{color} cannot pass while a legal move is available");
                }
                if self.is_game_over() {
                    bail!("Cannot pass: the game is over");
                }
            }
        }

        self.toggle_side_to_move();
        Ok(())
    }

    /// Applies `mv`, trusting that it came from [`Game::available_moves`].
    #[inline(always)]
    pub fn make_move_unchecked(&mut self, mv: Option<Square>) {
        if let Some(square) = mv {
            self.position.play_move_unchecked(square, self.side_to_move);
        }
        self.toggle_side_to_move();
    }

    /// Copies `self` and returns a [`Game`] after having applied the provided move.
    ///
    /// The move is not checked for legality.
    #[inline(always)]
    pub fn with_move_made(&self, mv: Option<Square>) -> Self {
        let mut copied = *self;
        copied.make_move_unchecked(mv);
        copied
    }

    /// Recursively make all available moves until the supplied depth is reached, returning the total number of positions reachable.
    ///
    /// This is just a convenience method.
    /// See [`perft()`] for more.
    #[inline(always)]
    pub fn perft(&self, depth: usize) -> u64 {
        perft(self, depth)
    }

    /// Parses a [`Game`] from a 64-character board layout followed by the side to move (`x` or `o`).
    ///
    /// # Example
    /// ```
    /// # use flipper::{Color, Game};
    /// let layout = "........\
    ///               ........\
    ///               ........\
    ///               ...XO...\
    ///               ...OX...\
    ///               ........\
    ///               ........\
    ///               ........";
    /// let game = Game::from_layout(&format!("{layout} o")).unwrap();
    /// assert_eq!(game.side_to_move(), Color::White);
    /// ```
    pub fn from_layout(layout: &str) -> Result<Self> {
        let layout = layout.trim();
        let Some((board, color)) = layout.rsplit_once(char::is_whitespace) else {
            bail!("Invalid game string: Expected `<layout> <x|o>`. Got {layout:?}");
        };

        let position = board
            .parse()
            .with_context(|| format!("Invalid board layout in {layout:?}"))?;
        let side_to_move = color
            .parse()
            .with_context(|| format!("Invalid side to move in {layout:?}"))?;

        Ok(Self::from_position(position, side_to_move))
    }

    /// Renders this [`Game`] in the format accepted by [`Game::from_layout`].
    pub fn to_layout(&self) -> String {
        let stm = self.side_to_move.char().to_ascii_lowercase();
        format!("{} {stm}", self.position.to_layout())
    }
}

impl Deref for Game {
    type Target = Position;
    /// A [`Game`] immutably dereferences to a [`Position`], for simplicity.
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.position
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;
    /// Wrapper for [`Game::from_layout`]
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_layout(s)
    }
}

impl Default for Game {
    /// Standard starting position, Black to move.
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..Square::SIZE {
            write!(f, " {}", (b'a' + col) as char)?;
        }
        writeln!(f)?;

        for row in 0..Square::SIZE {
            write!(f, "{} |", row + 1)?;
            for col in 0..Square::SIZE {
                let square = Square::new(row, col);
                let disc = self.color_at(square).map(|c| c.char()).unwrap_or('.');
                write!(f, " {disc}")?;
            }

            match row {
                1 => write!(f, "        Turn: {}", self.side_to_move)?,
                2 => write!(f, "       Black: {}", self.total_count(Color::Black))?,
                3 => write!(f, "       White: {}", self.total_count(Color::White))?,
                4 => write!(f, "        Move: {}", self.move_number())?,
                5 if self.is_game_over() => write!(f, "      Result: {}", self.result_string())?,
                _ => {}
            }
            writeln!(f)?;
        }

        write!(f, "  +")?;
        for _ in 0..Square::SIZE {
            write!(f, "--")?;
        }

        Ok(())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Side to move: {}\n{:?}",
            self.side_to_move, self.position
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turns_alternate() {
        let mut game = Game::new();
        assert_eq!(game.side_to_move(), Color::Black);

        game.make_move(Some(Square::new(2, 4))).unwrap();
        assert_eq!(game.side_to_move(), Color::White);
        assert_eq!(game.legal_moves().len(), 3);
    }

    #[test]
    fn test_illegal_moves_leave_game_untouched() {
        let mut game = Game::new();
        let before = game;

        assert!(game.make_move(Some(Square::A1)).is_err());
        assert!(game.make_move(Some(Square::new(3, 3))).is_err());
        assert!(game.make_move(None).is_err(), "Passing with moves available");
        assert_eq!(game, before);
    }

    #[test]
    fn test_forced_pass() {
        // White has no placement, but Black can still play h1
        let game: Game = "XXXXXXO.\
                          ........\
                          ........\
                          ........\
                          ........\
                          ........\
                          ........\
                          ........ o"
            .parse()
            .unwrap();

        assert!(game.needs_pass());
        assert!(!game.is_game_over());
        assert_eq!(game.available_moves(), vec![None]);

        let mut passed = game;
        passed.make_move(None).unwrap();
        assert_eq!(passed.side_to_move(), Color::Black);
        assert_eq!(passed.legal_moves(), vec![Square::H1]);
    }

    #[test]
    fn test_finished_game_has_no_moves() {
        let layout = format!("{}{} x", "X".repeat(32), "O".repeat(32));
        let game: Game = layout.parse().unwrap();

        assert!(game.is_game_over());
        assert!(game.available_moves().is_empty());
        assert_eq!(game.winner(), None);
        assert_eq!(game.result_string(), "Tie");
    }

    #[test]
    fn test_winner_only_when_over() {
        assert_eq!(Game::new().winner(), None);

        let game: Game = format!("{}{} o", "O".repeat(40), "X".repeat(24))
            .parse()
            .unwrap();
        assert_eq!(game.winner(), Some(Color::White));
        assert_eq!(game.result_string(), "White");
    }

    #[test]
    fn test_layout_round_trip() {
        let game = Game::new().with_move_made(Some(Square::new(3, 5)));
        let parsed: Game = game.to_layout().parse().unwrap();
        assert_eq!(parsed, game);
        assert_eq!(parsed.side_to_move(), Color::White);
    }

    #[test]
    fn test_bad_game_strings() {
        assert!("".parse::<Game>().is_err());
        assert!(Position::new().to_layout().parse::<Game>().is_err());
        assert!(format!("{} q", Position::new().to_layout())
            .parse::<Game>()
            .is_err());
    }
}
