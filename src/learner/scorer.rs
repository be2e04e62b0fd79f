// This file is part of the open-source port of SeetaFace engine, which originally includes three modules:
//      SeetaFace Detection, SeetaFace Alignment, and SeetaFace Identification.
//
// This file is part of the SeetaFace Detection module, containing codes implementing the face detection method described in the following paper:
//
//      Funnel-structured cascade for multi-view face detection with alignment awareness,
//      Shuzhe Wu, Meina Kan, Zhenliang He, Shiguang Shan, Xilin Chen.
//      In Neurocomputing (under review)
//
// Copyright (C) 2016, Visual Information Processing and Learning (VIPL) group,
// Institute of Computing Technology, Chinese Academy of Sciences, Beijing, China.
//
// As an open-source face recognition engine: you can redistribute SeetaFace source codes
// and/or modify it under the terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use crate::math;

/// Direction in which scores improve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOrder {
    LowerIsBetter,
    HigherIsBetter,
}

impl ScoreOrder {
    /// Strict comparison; NaN is never better.
    #[inline]
    pub fn is_better(self, candidate: f64, best: f64) -> bool {
        match self {
            ScoreOrder::LowerIsBetter => candidate < best,
            ScoreOrder::HigherIsBetter => candidate > best,
        }
    }
}

/// Ranks one candidate from its response column.
///
/// `responses`, `weights` and `labels` are parallel slices, one entry per
/// training example; labels are `+1` or `-1`.
pub trait Scorer: Sync {
    fn score(&self, responses: &[i64], weights: &[f64], labels: &[i8]) -> f64;

    fn order(&self) -> ScoreOrder {
        ScoreOrder::LowerIsBetter
    }
}

/// Weighted error of the best decision stump (threshold and polarity) on
/// the response column.
#[derive(Debug, Clone, Copy, Default)]
pub struct StumpErrorScorer;

impl Scorer for StumpErrorScorer {
    fn score(&self, responses: &[i64], weights: &[f64], labels: &[i8]) -> f64 {
        let mut total_pos = 0.0;
        let mut total_neg = 0.0;
        for (w, &label) in weights.iter().zip(labels) {
            if label > 0 {
                total_pos += w;
            } else {
                total_neg += w;
            }
        }

        // threshold below every response: all examples on one side
        let mut best = f64::min(total_pos, total_neg);
        let mut pos_below = 0.0;
        let mut neg_below = 0.0;

        let order = math::sorted_indices(responses);
        for (i, &idx) in order.iter().enumerate() {
            if labels[idx] > 0 {
                pos_below += weights[idx];
            } else {
                neg_below += weights[idx];
            }

            if i + 1 < order.len() && responses[order[i + 1]] == responses[idx] {
                continue;
            }

            let above_is_positive = pos_below + (total_neg - neg_below);
            let above_is_negative = neg_below + (total_pos - pos_below);
            best = best.min(above_is_positive).min(above_is_negative);
        }

        best
    }
}

/// Absolute weighted correlation between responses and labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelationScorer;

impl Scorer for CorrelationScorer {
    fn score(&self, responses: &[i64], weights: &[f64], labels: &[i8]) -> f64 {
        let responses: Vec<f64> = responses.iter().map(|&r| r as f64).collect();
        let labels: Vec<f64> = labels.iter().map(|&l| f64::from(l)).collect();

        let var_responses = math::weighted_covariance(&responses, &responses, weights);
        let var_labels = math::weighted_covariance(&labels, &labels, weights);
        if var_responses <= 0.0 || var_labels <= 0.0 {
            return 0.0;
        }

        (math::weighted_covariance(&responses, &labels, weights) / (var_responses * var_labels).sqrt())
            .abs()
    }

    fn order(&self) -> ScoreOrder {
        ScoreOrder::HigherIsBetter
    }
}

/// Adapts a closure supplied by the boosting loop.
pub struct FnScorer<F> {
    f: F,
    order: ScoreOrder,
}

impl<F> FnScorer<F>
where
    F: Fn(&[i64], &[f64], &[i8]) -> f64 + Sync,
{
    pub fn new(order: ScoreOrder, f: F) -> Self {
        FnScorer { f, order }
    }
}

impl<F> Scorer for FnScorer<F>
where
    F: Fn(&[i64], &[f64], &[i8]) -> f64 + Sync,
{
    #[inline]
    fn score(&self, responses: &[i64], weights: &[f64], labels: &[i8]) -> f64 {
        (self.f)(responses, weights, labels)
    }

    fn order(&self) -> ScoreOrder {
        self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const THIRD: f64 = 1.0 / 3.0;

    #[test]
    fn test_score_order() {
        assert!(ScoreOrder::LowerIsBetter.is_better(0.1, 0.2));
        assert!(!ScoreOrder::LowerIsBetter.is_better(0.2, 0.2));
        assert!(ScoreOrder::HigherIsBetter.is_better(0.3, 0.2));
        assert!(!ScoreOrder::HigherIsBetter.is_better(f64::NAN, 0.2));
    }

    #[test]
    fn test_stump_separable() {
        let error = StumpErrorScorer.score(&[10, -5, 12], &[THIRD; 3], &[1, -1, 1]);
        assert_relative_eq!(0.0, error);
        // inverted polarity separates as well
        let error = StumpErrorScorer.score(&[-10, 5, -12], &[THIRD; 3], &[1, -1, 1]);
        assert_relative_eq!(0.0, error);
    }

    #[test]
    fn test_stump_constant_responses() {
        let error = StumpErrorScorer.score(&[0, 0, 0], &[THIRD; 3], &[1, -1, 1]);
        assert_relative_eq!(THIRD, error);
    }

    #[test]
    fn test_stump_ties_are_not_split() {
        // a positive and a negative share the same response
        let error = StumpErrorScorer.score(&[1, 1, 5], &[0.25, 0.25, 0.5], &[1, -1, 1]);
        assert_relative_eq!(0.25, error);
    }

    #[test]
    fn test_correlation() {
        let score = CorrelationScorer.score(&[3, -3, 3], &[THIRD; 3], &[1, -1, 1]);
        assert_relative_eq!(1.0, score, epsilon = 1e-12);
        let score = CorrelationScorer.score(&[-3, 3, -3], &[THIRD; 3], &[1, -1, 1]);
        assert_relative_eq!(1.0, score, epsilon = 1e-12);
        assert_eq!(0.0, CorrelationScorer.score(&[2, 2, 2], &[THIRD; 3], &[1, -1, 1]));
        assert_eq!(ScoreOrder::HigherIsBetter, CorrelationScorer.order());
    }

    #[test]
    fn test_fn_scorer() {
        let scorer = FnScorer::new(ScoreOrder::HigherIsBetter, |r: &[i64], w: &[f64], l: &[i8]| {
            r.iter()
                .zip(w)
                .zip(l)
                .map(|((&r, w), &l)| w * f64::from(l) * r as f64)
                .sum()
        });
        assert_relative_eq!(6.0, scorer.score(&[6, -6, 6], &[THIRD; 3], &[1, -1, 1]));
        assert_eq!(ScoreOrder::HigherIsBetter, scorer.order());
        assert_eq!(ScoreOrder::LowerIsBetter, StumpErrorScorer.order());
    }
}
