/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use anyhow::{bail, Result};

use crate::{tune, Color, Position, Score};

/// Weights for the three features of the evaluation: disc count, mobility, and stable discs.
///
/// Each weight is a polynomial in the move number, stored as its coefficients in increasing powers,
/// so `[b, m]` is the line `b + m * move_number` and `[a, b, c]` is a quadratic.
/// An empty coefficient list means the feature is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalParams {
    count: Vec<f64>,
    mobility: Vec<f64>,
    stability: Vec<f64>,
}

impl EvalParams {
    /// Constructs a new set of parameters from the coefficients of each weight curve.
    pub fn new(count: Vec<f64>, mobility: Vec<f64>, stability: Vec<f64>) -> Self {
        Self {
            count,
            mobility,
            stability,
        }
    }

    /// Coefficients of the disc count weight.
    #[inline(always)]
    pub fn count(&self) -> &[f64] {
        &self.count
    }

    /// Coefficients of the mobility weight.
    #[inline(always)]
    pub fn mobility(&self) -> &[f64] {
        &self.mobility
    }

    /// Coefficients of the stability weight.
    #[inline(always)]
    pub fn stability(&self) -> &[f64] {
        &self.stability
    }

    /// Weighted sum of one side's features at the given move number.
    ///
    /// # Example
    /// ```
    /// # use flipper::EvalParams;
    /// let params = EvalParams::new(vec![1.0], vec![2.0, 1.0], vec![0.0, 0.0, 1.0]);
    /// // 10 * 1 + 3 * (2 + 4) + 1 * 16
    /// assert_eq!(params.score(4, 10, 3, 1), 44.0);
    /// ```
    pub fn score(&self, move_number: usize, total: usize, mobility: usize, stable: usize) -> f64 {
        let x = move_number as f64;

        total as f64 * horner(&self.count, x)
            + mobility as f64 * horner(&self.mobility, x)
            + stable as f64 * horner(&self.stability, x)
    }

    /// Computes the `[intercept, slope]` of the line through `(x1, y1)` and `(x2, y2)`.
    ///
    /// The result can be used directly as the coefficients of a weight curve.
    ///
    /// # Example
    /// ```
    /// # use flipper::EvalParams;
    /// assert_eq!(EvalParams::linear_from_points(0.0, 1.0, 10.0, 6.0).unwrap(), [1.0, 0.5]);
    /// assert!(EvalParams::linear_from_points(3.0, 1.0, 3.0, 2.0).is_err());
    /// ```
    pub fn linear_from_points(x1: f64, y1: f64, x2: f64, y2: f64) -> Result<[f64; 2]> {
        if x1 == x2 {
            bail!("Cannot fit a line through two points with the same x coordinate ({x1})");
        }

        let m = (y2 - y1) / (x2 - x1);
        let b = y1 - m * x1;

        Ok([b, m])
    }
}

impl Default for EvalParams {
    #[inline(always)]
    fn default() -> Self {
        Self::new(
            tune::count_curve!().to_vec(),
            tune::mobility_curve!().to_vec(),
            tune::stability_curve!().to_vec(),
        )
    }
}

impl fmt::Display for EvalParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "count:     {:?}", self.count)?;
        writeln!(f, "mobility:  {:?}", self.mobility)?;
        write!(f, "stability: {:?}", self.stability)
    }
}

/// Evaluates `coeffs[0] + coeffs[1] * x + coeffs[2] * x^2 + ...` with Horner's rule.
#[inline(always)]
fn horner(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// The raw features of one side of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    /// Discs on the board.
    pub total: usize,

    /// Legal moves available.
    pub mobility: usize,

    /// Discs that can never be flipped.
    pub stable: usize,
}

impl Features {
    /// Collects the features of `color`, refreshing the stability cache if needed.
    #[inline(always)]
    pub fn of(position: &mut Position, color: Color) -> Self {
        Self {
            total: position.total_count(color),
            mobility: position.mobility(color),
            stable: position.stable_count(color),
        }
    }
}

/// Encapsulates the logic of scoring an Othello position.
///
/// A high score is good for White, and a low score is good for Black.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    /// The weights to apply.
    params: &'a EvalParams,

    /// Number of discs placed so far.
    move_number: usize,

    /// Features of each side, indexed by [`Color::index`].
    features: [Features; Color::COUNT],
}

impl<'a> Evaluator<'a> {
    /// Construct a new [`Evaluator`], extracting the features of both sides.
    ///
    /// This needs mutable access because stability is computed lazily.
    #[inline(always)]
    pub fn new(position: &mut Position, params: &'a EvalParams) -> Self {
        Self {
            params,
            move_number: position.move_number(),
            features: [
                Features::of(position, Color::Black),
                Features::of(position, Color::White),
            ],
        }
    }

    /// The features that were extracted for `color`.
    #[inline(always)]
    pub fn features(&self, color: Color) -> Features {
        self.features[color.index()]
    }

    /// Weighted score of `color`'s features alone.
    #[inline(always)]
    pub fn side_score(&self, color: Color) -> f64 {
        let f = self.features(color);
        self.params.score(self.move_number, f.total, f.mobility, f.stable)
    }

    /// Evaluates this position as seen by `color`, signed so that White is always positive.
    ///
    /// The side's own score is added with its sign, and its opponent's score is subtracted with the same sign,
    /// so the result is White's score minus Black's score whichever color is asked.
    #[inline(always)]
    pub fn eval_for(&self, color: Color) -> Score {
        let sign = color.sign();
        Score(sign * self.side_score(color) - sign * self.side_score(color.opponent()))
    }
}

impl fmt::Display for Evaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Move number: {}", self.move_number)?;
        writeln!(
            f,
            "{:<8}{:>8}{:>10}{:>8}{:>12}",
            "", "Discs", "Mobility", "Stable", "Score"
        )?;

        for color in Color::all() {
            let feat = self.features(color);
            writeln!(
                f,
                "{:<8}{:>8}{:>10}{:>8}{:>12.2}",
                color.name(),
                feat.total,
                feat.mobility,
                feat.stable,
                self.side_score(color)
            )?;
        }

        let score = Score(self.side_score(Color::White) - self.side_score(Color::Black));
        let winning_side = score.favors();
        write!(
            f,
            "Winning side: {}",
            winning_side.map(|c| c.name()).unwrap_or("N/A")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;

    #[test]
    fn test_horner_matches_powers() {
        let coeffs = [1.5, -2.0, 0.25, 3.0];
        for x in [0.0, 1.0, 7.0, 60.0] {
            let naive: f64 = coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| c * f64::powi(x, i as i32))
                .sum();
            assert!((horner(&coeffs, x) - naive).abs() < 1e-6, "x = {x}");
        }
        assert_eq!(horner(&[], 12.0), 0.0);
    }

    #[test]
    fn test_default_count_curve_from_points() {
        let line = EvalParams::linear_from_points(0.0, -1.0, 60.0, 2.0).unwrap();
        let expected: [f64; 2] = tune::count_curve!();
        assert!((line[0] - expected[0]).abs() < 1e-12);
        assert!((line[1] - expected[1]).abs() < 1e-12);
    }

    #[test]
    fn test_initial_position_is_balanced() {
        let params = EvalParams::default();
        let mut position = Position::new();
        let eval = Evaluator::new(&mut position, &params);

        assert_eq!(eval.eval_for(Color::Black), Score::DRAW);
        assert_eq!(eval.eval_for(Color::White), Score::DRAW);
        assert_eq!(
            eval.features(Color::Black),
            Features {
                total: 2,
                mobility: 4,
                stable: 0
            }
        );
    }

    #[test]
    fn test_eval_is_white_positive_for_both_sides() {
        let params = EvalParams::new(vec![1.0], vec![], vec![]);
        let mut position = Position::new();
        position.play_move(Square::new(2, 4), Color::Black).unwrap();

        // Black has 4 discs, White has 1
        let eval = Evaluator::new(&mut position, &params);
        assert_eq!(eval.eval_for(Color::Black), Score(-3.0));
        assert_eq!(eval.eval_for(Color::White), Score(-3.0));
    }

    #[test]
    fn test_stability_feature() {
        let params = EvalParams::new(vec![], vec![], vec![1.0]);
        let mut position: Position = "O.......\
                                      ........\
                                      ........\
                                      ...XO...\
                                      ...OX...\
                                      ........\
                                      ........\
                                      ........"
            .parse()
            .unwrap();

        let eval = Evaluator::new(&mut position, &params);
        assert_eq!(eval.features(Color::White).stable, 1);
        assert_eq!(eval.eval_for(Color::Black), Score(1.0));
    }
}
