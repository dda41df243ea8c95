//! `model` describes what a predictive model hands back and how that output
//! becomes probabilities.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// An integer token identifier assigned by the vocabulary. Only compared for
/// equality.
pub type TokenId = u32;

/// The (count, total) weight a model assigns to one candidate token at one
/// context position.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrequencyPair {
    /// Observed weight of the candidate.
    pub count: f64,
    /// Normalizing total at this position.
    pub total: f64,
}

impl FrequencyPair {
    pub fn new(count: f64, total: f64) -> Self {
        Self { count, total }
    }

    /// `count / total`, clamped to `[0, 1]`.
    ///
    /// A zero, negative or non-finite total is a degenerate distribution: the
    /// candidate gets probability 0 instead of an error, so aggregate
    /// statistics stay computable.
    pub fn probability(&self) -> f64 {
        if !(self.total.is_finite() && self.total > 0.0) {
            trace!(count = self.count, total = self.total, "degenerate frequency pair");
            return 0.0;
        }
        unit_interval(self.count / self.total)
    }
}

/// Clamps to `[0, 1]`. NaN and `-0.0` become `0.0`.
fn unit_interval(p: f64) -> f64 {
    if p.is_nan() {
        0.0
    } else {
        // + 0.0 turns -0.0 into 0.0
        p.clamp(0.0, 1.0) + 0.0
    }
}

/// The model's output for one context position, in the model's iteration
/// order. Order matters: it breaks ties between equally probable candidates.
pub type Prediction = Vec<(TokenId, FrequencyPair)>;

/// A candidate token with its probability.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    token: TokenId,
    prob: f64,
}

impl ScoredCandidate {
    /// `prob` is clamped into `[0, 1]`.
    pub fn new(token: TokenId, prob: f64) -> Self {
        Self {
            token,
            prob: unit_interval(prob),
        }
    }

    pub fn from_pair(token: TokenId, pair: &FrequencyPair) -> Self {
        Self {
            token,
            prob: pair.probability(),
        }
    }

    pub fn token(&self) -> TokenId {
        self.token
    }

    /// Always within `[0, 1]`.
    pub fn prob(&self) -> f64 {
        self.prob
    }
}

/// Scores every candidate of a prediction and sorts them by descending
/// probability. The sort is stable, so ties keep the prediction's order.
pub fn rank_prediction(prediction: &[(TokenId, FrequencyPair)]) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = prediction
        .iter()
        .map(|(token, pair)| ScoredCandidate::from_pair(*token, pair))
        .collect();

    // b before a: descending. probabilities are never NaN here
    ranked.sort_by(|a, b| b.prob.partial_cmp(&a.prob).unwrap_or(Ordering::Equal));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_probability() {
        assert_eq!(FrequencyPair::new(3.0, 4.0).probability(), 0.75);
        assert_eq!(FrequencyPair::new(0.0, 4.0).probability(), 0.0);
        assert_eq!(FrequencyPair::new(4.0, 4.0).probability(), 1.0);
    }

    #[test]
    fn test_zero_total_is_zero_probability() {
        assert_eq!(FrequencyPair::new(0.0, 0.0).probability(), 0.0);
        assert_eq!(FrequencyPair::new(5.0, 0.0).probability(), 0.0);
        assert_eq!(FrequencyPair::new(1.0, f64::NAN).probability(), 0.0);
    }

    #[test]
    fn test_probability_stays_in_unit_interval() {
        assert_eq!(FrequencyPair::new(7.0, 2.0).probability(), 1.0);
        assert_eq!(FrequencyPair::new(-1.0, 2.0).probability(), 0.0);
    }

    #[test]
    fn test_negative_zero_is_zero() {
        let p = FrequencyPair::new(-0.0, 4.0).probability();
        assert!(p == 0.0 && p.is_sign_positive());
        assert!(ScoredCandidate::new(1, -0.0).prob().is_sign_positive());
    }

    #[test]
    fn test_scored_candidate_is_clamped() {
        assert_eq!(ScoredCandidate::new(1, 1.5).prob(), 1.0);
        assert_eq!(ScoredCandidate::new(1, -2.0).prob(), 0.0);
        assert_eq!(ScoredCandidate::new(1, f64::NAN).prob(), 0.0);
    }

    #[test]
    fn test_rank_descending() {
        let pred = vec![
            (1, FrequencyPair::new(2.0, 10.0)),
            (2, FrequencyPair::new(5.0, 10.0)),
            (3, FrequencyPair::new(3.0, 10.0)),
        ];
        let tokens: Vec<TokenId> = rank_prediction(&pred).iter().map(|c| c.token()).collect();
        assert_eq!(tokens, vec![2, 3, 1]);
    }

    #[test]
    fn test_rank_is_stable() {
        let pred = vec![
            (9, FrequencyPair::new(1.0, 4.0)),
            (4, FrequencyPair::new(2.0, 4.0)),
            (7, FrequencyPair::new(1.0, 4.0)),
            (5, FrequencyPair::new(0.0, 0.0)),
            (3, FrequencyPair::new(1.0, 4.0)),
            (6, FrequencyPair::new(-0.0, 4.0)),
            (8, FrequencyPair::new(0.0, 4.0)),
        ];
        let tokens: Vec<TokenId> = rank_prediction(&pred).iter().map(|c| c.token()).collect();
        assert_eq!(tokens, vec![4, 9, 7, 3, 5, 6, 8]);
    }
}
