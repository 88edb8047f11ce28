/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Default number of plies to search.
macro_rules! default_depth {
    () => {
        5
    };
}
pub(crate) use default_depth;

/// A node with at most this many legal moves may have its depth extended.
macro_rules! narrow_branch_threshold {
    () => {
        2
    };
}
pub(crate) use narrow_branch_threshold;

/// Extensions only happen at nodes whose remaining depth is below `config.depth` minus this margin.
macro_rules! extension_margin {
    () => {
        2
    };
}
pub(crate) use extension_margin;

/// Default depth at which to run the benchmark searches.
macro_rules! bench_depth {
    () => {
        6
    };
}
pub(crate) use bench_depth;

/// Disc count weight, as `[constant, slope]` over the move number.
///
/// Slightly negative in the opening and rising to `+2.0` by move 60.
macro_rules! count_curve {
    () => {
        [-1.0, 0.05]
    };
}
pub(crate) use count_curve;

/// Mobility weight, constant over the game.
macro_rules! mobility_curve {
    () => {
        [2.0]
    };
}
pub(crate) use mobility_curve;

/// Stable disc weight, constant over the game.
macro_rules! stability_curve {
    () => {
        [5.0]
    };
}
pub(crate) use stability_curve;
