//! Reciprocal rank and recall, summarized across completions.
//!
//! Values come in groups (typically one group per evaluated file). A summary
//! either pools every group together or is taken one group at a time; the
//! grouping is the caller's choice.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::completion::Completion;

/// Count, sum, min, max and average of a sequence of values.
///
/// An empty summary has count 0, sum 0 and average 0, with min and max at
/// `+inf` and `-inf` so that merging stays exact.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

impl SummaryStatistics {
    pub fn empty() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            average: 0.0,
        }
    }

    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }
        let sum: f64 = values.iter().sum();
        Self {
            count: values.len(),
            sum,
            min: Statistics::min(values),
            max: Statistics::max(values),
            average: sum / values.len() as f64,
        }
    }

    /// Combines two summaries as if their values had been summarized together.
    pub fn merge(&self, other: &Self) -> Self {
        let count = self.count + other.count;
        let sum = self.sum + other.sum;
        Self {
            count,
            sum,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            average: if count == 0 { 0.0 } else { sum / count as f64 },
        }
    }
}

impl Default for SummaryStatistics {
    fn default() -> Self {
        Self::empty()
    }
}

/// Flattens the groups and summarizes every value.
pub fn summarize<G, V>(groups: G) -> SummaryStatistics
where
    G: IntoIterator<Item = V>,
    V: IntoIterator<Item = f64>,
{
    let values: Vec<f64> = groups.into_iter().flatten().collect();
    SummaryStatistics::from_values(&values)
}

pub fn reciprocal_ranks(completions: &[Completion]) -> Vec<f64> {
    completions.iter().map(Completion::reciprocal_rank).collect()
}

pub fn recalls(completions: &[Completion]) -> Vec<f64> {
    completions.iter().map(Completion::recall).collect()
}

/// Mean reciprocal rank (the `average`) and friends over the completions.
pub fn mrr(completions: &[Completion]) -> SummaryStatistics {
    summarize([reciprocal_ranks(completions)])
}

/// Recall over the completions. When their rankings have been cut to K,
/// the `average` is recall@K.
pub fn recall(completions: &[Completion]) -> SummaryStatistics {
    summarize([recalls(completions)])
}

/// MRR pooled across every group.
pub fn pooled_mrr<G: AsRef<[Completion]>>(groups: &[G]) -> SummaryStatistics {
    summarize(groups.iter().map(|g| reciprocal_ranks(g.as_ref())))
}

/// Recall pooled across every group.
pub fn pooled_recall<G: AsRef<[Completion]>>(groups: &[G]) -> SummaryStatistics {
    summarize(groups.iter().map(|g| recalls(g.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScoredCandidate;
    use pretty_assertions::assert_eq;

    fn completion(actual: u32, ranked: &[u32]) -> Completion {
        let n = ranked.len() as f64;
        Completion::new(
            actual,
            ranked
                .iter()
                .enumerate()
                .map(|(i, &token)| ScoredCandidate::new(token, (n - i as f64) / (n + 1.0)))
                .collect(),
        )
    }

    #[test]
    fn test_summary() {
        let stats = summarize([vec![1.0, 0.5, 0.0]]);
        assert_eq!(
            stats,
            SummaryStatistics {
                count: 3,
                sum: 1.5,
                min: 0.0,
                max: 1.0,
                average: 0.5
            }
        );
    }

    #[test]
    fn test_summary_flattens_groups() {
        let pooled = summarize(vec![vec![1.0], vec![], vec![0.5, 0.0]]);
        assert_eq!(pooled, summarize([vec![1.0, 0.5, 0.0]]));
    }

    #[test]
    fn test_empty_summary() {
        let stats = summarize(Vec::<Vec<f64>>::new());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.sum, 0.0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.min, f64::INFINITY);
        assert_eq!(stats.max, f64::NEG_INFINITY);
    }

    #[test]
    fn test_merge() {
        let a = SummaryStatistics::from_values(&[1.0, 0.5]);
        let b = SummaryStatistics::from_values(&[0.0]);
        assert_eq!(a.merge(&b), SummaryStatistics::from_values(&[1.0, 0.5, 0.0]));
        assert_eq!(a.merge(&SummaryStatistics::empty()), a);
    }

    #[test]
    fn test_mrr() {
        let comps = vec![
            completion(1, &[1, 2, 3]),
            completion(2, &[1, 2, 3]),
            completion(9, &[1, 2, 3]),
        ];
        let stats = mrr(&comps);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.average, 0.5);
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 1.0);
    }

    #[test]
    fn test_recall() {
        let comps = vec![
            completion(3, &[1, 2, 3]),
            completion(9, &[1, 2, 3]),
            completion(1, &[1]),
            completion(2, &[]),
        ];
        let stats = recall(&comps);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.sum, 2.0);
        assert_eq!(stats.average, 0.5);
    }

    #[test]
    fn test_pooled() {
        let files = vec![
            vec![completion(1, &[1, 2]), completion(2, &[1, 2])],
            vec![completion(7, &[1, 2])],
        ];
        let stats = pooled_mrr(&files);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.sum, 1.5);
        assert_eq!(pooled_recall(&files).sum, 2.0);
    }
}
