/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, marker::PhantomData, time::Instant};

use crate::{
    fmt_move, tune, Color, EvalParams, Evaluator, LogLevel, LogNone, Position, Score, ScoredMove,
    Square,
};

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Best move found during the search, or `None` if the side to move had to pass.
    pub bestmove: Option<Square>,

    /// Evaluation of the position after `bestmove` is made, from White's point of view.
    pub score: Score,

    /// Depth that was searched.
    pub depth: usize,
}

impl Default for SearchResult {
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            bestmove: None,
            score: Score::DRAW,
            depth: 0,
        }
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of plies to search, before any extensions.
    pub depth: usize,
}

impl SearchConfig {
    /// Constructs a new [`SearchConfig`] with the given depth.
    #[inline(always)]
    pub const fn new(depth: usize) -> Self {
        Self { depth }
    }
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self::new(tune::default_depth!())
    }
}

/// Finds the best move for `color` with the default [`SearchConfig`], printing nothing.
///
/// Returns `None` only if `color` has no legal move.
///
/// # Example
/// ```
/// # use flipper::{best_move, Color, EvalParams, Position};
/// let position = Position::new();
/// let mv = best_move(&EvalParams::default(), &position, Color::Black).unwrap();
/// assert!(position.is_legal(mv, Color::Black));
/// ```
#[inline(always)]
pub fn best_move(params: &EvalParams, position: &Position, color: Color) -> Option<Square> {
    Search::<LogNone>::new(position, params, SearchConfig::default())
        .start(color)
        .bestmove
}

/// Executes a depth-limited minimax search with alpha-beta pruning on a position.
///
/// White is the maximizing side and Black the minimizing side. The position supplied is never modified;
/// every line is played out on copies.
pub struct Search<'a, Log> {
    /// The position to search.
    position: &'a Position,

    /// Weights used to evaluate leaves.
    params: &'a EvalParams,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,

    /// Number of nodes visited so far.
    nodes: u64,

    /// Marker for the level of logging to print.
    log: PhantomData<&'a Log>,
}

impl<'a, Log: LogLevel> Search<'a, Log> {
    /// Construct a new [`Search`] instance to execute.
    #[inline(always)]
    pub fn new(position: &'a Position, params: &'a EvalParams, config: SearchConfig) -> Self {
        Self {
            position,
            params,
            config,
            nodes: 0,
            log: PhantomData,
        }
    }

    /// Start the search with `color` to move, returning a [`SearchResult`].
    ///
    /// This is the entrypoint of the search. Depending on `Log`, it prints `info` lines and concludes
    /// by sending the `bestmove` message.
    pub fn start(mut self, color: Color) -> SearchResult {
        let starttime = Instant::now();

        if Log::DEBUG {
            self.send_string(format!(
                "Starting search on {:?} with {color} to move",
                self.position.to_layout()
            ));
            self.send_string(format!("Max depth := {}", self.config.depth));
        }

        let root = self.explore(
            *self.position,
            color,
            self.config.depth,
            -Score::INF,
            Score::INF,
        );

        let result = SearchResult {
            nodes: self.nodes,
            bestmove: root.mv,
            score: root.score,
            depth: self.config.depth,
        };

        if Log::INFO {
            self.send_end_of_search_info(&result, starttime);
            println!("bestmove {}", fmt_move(result.bestmove));
        }

        result
    }

    /// Helper to send an `info string` message to `stdout`.
    #[inline(always)]
    fn send_string<T: fmt::Display>(&self, string: T) {
        println!("info string {string}");
    }

    /// Sends info about the conclusion of this search.
    #[inline(always)]
    fn send_end_of_search_info(&self, result: &SearchResult, starttime: Instant) {
        let elapsed = starttime.elapsed();
        let nps = (result.nodes as f64 / elapsed.as_secs_f64()).trunc();

        println!(
            "info depth {} nodes {} score {} time {} nps {nps} pv {}",
            result.depth,
            result.nodes,
            result.score,
            elapsed.as_millis(),
            fmt_move(result.bestmove)
        );
    }

    /// Primary location of search logic.
    ///
    /// Returns the best move for `color` together with its backed-up score. The move is `None` at leaves
    /// and when `color` has to pass.
    fn explore(
        &mut self,
        mut position: Position,
        color: Color,
        mut depth: usize,
        mut alpha: Score,
        mut beta: Score,
    ) -> ScoredMove {
        self.nodes += 1;

        // Finished games are scored by their final disc counts
        if position.is_game_over() {
            let white = position.total_count(Color::White);
            let black = position.total_count(Color::Black);
            return ScoredMove::new(None, Score::terminal(white, black));
        }

        if depth == 0 {
            let score = Evaluator::new(&mut position, self.params).eval_for(color);
            return ScoredMove::new(None, score);
        }

        let moves = position.legal_moves(color);

        // The game isn't over, so the opponent can move; hand them the turn without spending depth
        if moves.is_empty() {
            let reply = self.explore(position, color.opponent(), depth, alpha, beta);
            return ScoredMove::new(None, reply.score);
        }

        // Narrow nodes are cheap to look past
        if moves.len() <= tune::narrow_branch_threshold!()
            && depth + tune::extension_margin!() < self.config.depth
        {
            depth += 1;
        }

        let mut best: Option<ScoredMove> = None;
        let mut scratch = position;

        for square in moves {
            scratch.play_move_unchecked(square, color);
            let child = self.explore(scratch, color.opponent(), depth - 1, alpha, beta);
            scratch = position;

            let improves = match best {
                Some(best) => child.score.is_better_for(color, best.score),
                None => true,
            };
            if improves {
                best = Some(ScoredMove::new(Some(square), child.score));
            }

            let best_score = best.map_or(child.score, |best| best.score);
            match color {
                Color::White => alpha = alpha.max(best_score),
                Color::Black => beta = beta.min(best_score),
            }

            if alpha >= beta {
                break;
            }
        }

        // `moves` was not empty, so at least one child was searched
        best.unwrap_or_else(|| ScoredMove::new(None, Score::worst_for(color)))
    }
}
