/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::VecDeque;

use super::{Bitboard, Direction, Square};

/// Computes the set of stable discs on a board with the given occupancy and ownership masks.
///
/// Stability is propagated outward from the occupied corners. A disc becomes stable once,
/// along each of the four axes, at least one neighbor is either off the board or a stable disc
/// of its own color. Every newly stabilized disc is queued so that its neighbors get another look.
///
/// This is an under-approximation: a disc that can never be flipped for deeper reasons,
/// but is not connected to a corner through this rule, is reported as unstable.
pub(crate) fn stable_discs(occupied: Bitboard, owner: Bitboard) -> Bitboard {
    let mut stable = Bitboard::EMPTY_BOARD;
    let mut queue = VecDeque::with_capacity(Square::COUNT);

    // Seed with the occupied corners
    for corner in Square::CORNERS {
        if occupied.intersects_square(corner) {
            stable.set(corner);
            queue.push_back(corner);
        }
    }

    while let Some(square) = queue.pop_front() {
        for neighbor in Direction::ALL.into_iter().filter_map(|dir| square.step(dir)) {
            if !occupied.intersects_square(neighbor) || stable.intersects_square(neighbor) {
                continue;
            }

            if is_secured(neighbor, owner, stable) {
                stable.set(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    stable
}

/// Returns `true` if every axis through `square` is closed off by the edge or a stable friendly disc.
#[inline(always)]
fn is_secured(square: Square, owner: Bitboard, stable: Bitboard) -> bool {
    let is_white = owner.intersects_square(square);

    let closes = |direction: Direction| match square.step(direction) {
        None => true,
        Some(next) => {
            stable.intersects_square(next) && owner.intersects_square(next) == is_white
        }
    };

    Direction::ALL[..4]
        .iter()
        .all(|&dir| closes(dir) || closes(dir.opposite()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    fn stable_of(layout: &str) -> Bitboard {
        let position: Position = layout.parse().unwrap();
        stable_discs(position.occupied(), position.owner())
    }

    #[test]
    fn test_no_corners_means_nothing_is_stable() {
        let position = Position::new();
        assert!(stable_discs(position.occupied(), position.owner()).is_empty());
    }

    #[test]
    fn test_lone_corner_is_stable() {
        let stable = stable_of(
            "X.......\
             ........\
             ........\
             ........\
             ........\
             ........\
             ........\
             ........",
        );
        assert_eq!(stable, Square::A1.bitboard());
    }

    #[test]
    fn test_full_edge_row_propagates() {
        // A full top row of black discs: each disc is closed off vertically by the edge,
        // horizontally by its stable neighbor, and diagonally by the edge.
        let stable = stable_of(
            "XXXXXXXX\
             ........\
             ........\
             ........\
             ........\
             ........\
             ........\
             ........",
        );
        assert_eq!(stable.population(), 8);
    }

    #[test]
    fn test_opposing_color_does_not_secure() {
        // b1 is white next to a black corner, so its horizontal axis is open on both sides
        let stable = stable_of(
            "XO......\
             ........\
             ........\
             ........\
             ........\
             ........\
             ........\
             ........",
        );
        assert_eq!(stable, Square::A1.bitboard());
    }

    #[test]
    fn test_corner_triangle() {
        // Black owns a1, b1, a2 and b2. b2 is closed off vertically by b1, horizontally by a2
        // and along the main diagonal by a1, but the anti-diagonal through c1/a3 stays open.
        let stable = stable_of(
            "XX......\
             XX......\
             ........\
             ........\
             ........\
             ........\
             ........\
             ........",
        );
        assert!(stable.intersects(Square::new(0, 1)));
        assert!(stable.intersects(Square::new(1, 0)));
        assert!(!stable.intersects(Square::new(1, 1)));
        assert_eq!(stable.population(), 3);
    }
}
