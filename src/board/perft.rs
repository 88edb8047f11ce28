/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::time::Instant;

use super::{fmt_move, Game};

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// A forced pass counts as a move, and a finished game counts as a single leaf no matter how much depth remains.
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
/// If you do *not* want to use bulk counting, use [`perft_generic`].
///
/// # Example
/// ```
/// # use flipper::{perft, Game};
/// assert_eq!(perft(&Game::new(), 3), 56);
/// ```
#[inline(always)]
pub fn perft(game: &Game, depth: usize) -> u64 {
    perft_generic::<true, false>(game, depth)
}

/// Perform a splitperft at the specified depth, collecting only data about the number of possible positions (nodes),
/// and printing the number of nodes reachable after each move available at the root node.
#[inline(always)]
pub fn splitperft(game: &Game, depth: usize) -> u64 {
    perft_generic::<true, true>(game, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(game: &Game, depth: usize) -> u64 {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return 1;
    }

    let moves = game.available_moves();

    // Nothing left to play, so this node is a leaf regardless of depth
    if moves.is_empty() {
        return 1;
    }

    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && !SPLIT && depth == 1 {
        return moves.len() as u64;
    }

    // Recursively accumulate the nodes from the remaining depths
    moves.into_iter().fold(0, |nodes, mv| {
        let new_nodes = perft_generic::<BULK, false>(&game.with_move_made(mv), depth - 1);

        if SPLIT {
            println!("{}\t{new_nodes}", fmt_move(mv));
        }

        nodes + new_nodes
    })
}

/// Runs a perft (or splitperft, if `SPLIT` is set) and prints the total node count along with timing information.
pub fn print_perft<const SPLIT: bool>(game: &Game, depth: usize) -> u64 {
    let now = Instant::now();

    let nodes = if SPLIT {
        splitperft(game, depth)
    } else {
        perft(game, depth)
    };

    let elapsed = now.elapsed();
    let nps = nodes as f64 / elapsed.as_secs_f64();
    if SPLIT {
        println!();
    }
    println!("Nodes:\t{nodes}");
    println!("Time:\t{elapsed:.2?}");
    println!("NPS:\t{nps:.0}");

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_and_full_counts_agree() {
        let game = Game::new();
        for depth in 0..=4 {
            assert_eq!(
                perft_generic::<true, false>(&game, depth),
                perft_generic::<false, false>(&game, depth),
                "Bulk counting disagrees at depth {depth}"
            );
        }
    }

    #[test]
    fn test_finished_game_is_one_leaf() {
        let game: Game = format!("{} o", "X".repeat(64)).parse().unwrap();
        assert_eq!(perft(&game, 1), 1);
        assert_eq!(perft(&game, 5), 1);
    }

    #[test]
    fn test_pass_counts_as_a_move() {
        // White must pass, then Black has exactly one reply (h1), after which the board is over
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

        assert_eq!(perft(&game, 1), 1);
        assert_eq!(perft(&game, 2), 1);
        assert_eq!(perft(&game, 3), 1);
    }
}
