//! A `Completion` is one evaluated prediction point: the token that actually
//! occurred plus the model's ranked candidates for it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{EvalError, Result};
use crate::model::{rank_prediction, FrequencyPair, ScoredCandidate, TokenId};

/// Why the actual token has no rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Miss {
    /// The model never scored the actual token.
    NotProposed,
    /// The model scored it, but suggestion filtering or the cutoff removed it.
    Filtered,
}

/// Position of the actual token in a completion's current ranking.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    /// 1-based position, never 0. [`Completion::rank`] only produces valid
    /// positions; a hand-built `At(0)` has no defined reciprocal.
    At(usize),
    Missing(Miss),
}

impl Rank {
    /// `1 / rank`, or 0 when missing.
    pub fn reciprocal(&self) -> f64 {
        match self {
            Rank::At(n) => 1.0 / *n as f64,
            Rank::Missing(_) => 0.0,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Rank::At(_))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    actual: TokenId,
    ranked: Vec<ScoredCandidate>,
    suggestions: Option<HashSet<TokenId>>,
    cutoff: Option<usize>,
    /// Whether the unfiltered ranking held the actual token.
    proposed: bool,
}

impl Completion {
    /// Builds a completion from an already-sorted candidate list.
    pub fn new(actual: TokenId, ranked: Vec<ScoredCandidate>) -> Self {
        let proposed = ranked.iter().any(|c| c.token() == actual);
        Self {
            actual,
            ranked,
            suggestions: None,
            cutoff: None,
            proposed,
        }
    }

    /// Ranks the candidates of the prediction at the position of `actual`.
    pub fn from_prediction(actual: TokenId, prediction: &[(TokenId, FrequencyPair)]) -> Self {
        Self::new(actual, rank_prediction(prediction))
    }

    pub fn actual(&self) -> TokenId {
        self.actual
    }

    pub fn ranked(&self) -> &[ScoredCandidate] {
        &self.ranked
    }

    pub fn suggestions(&self) -> Option<&HashSet<TokenId>> {
        self.suggestions.as_ref()
    }

    pub fn cutoff(&self) -> Option<usize> {
        self.cutoff
    }

    /// Keeps only the candidates in `suggestions`, in ranked order, and at
    /// most `cutoff` of them. Only allowed once per completion.
    pub fn filter_suggestions<I>(&mut self, suggestions: I, cutoff: usize) -> Result<()>
    where
        I: IntoIterator<Item = TokenId>,
    {
        if self.suggestions.is_some() {
            return Err(EvalError::AlreadyFiltered);
        }
        let allowed: HashSet<TokenId> = suggestions.into_iter().collect();

        let before = self.ranked.len();
        self.ranked.retain(|c| allowed.contains(&c.token()));
        self.ranked.truncate(cutoff);
        trace!(
            before,
            after = self.ranked.len(),
            suggestions = allowed.len(),
            cutoff,
            "filtered completion"
        );

        self.suggestions = Some(allowed);
        self.cutoff = Some(cutoff);
        Ok(())
    }

    pub fn rank(&self) -> Rank {
        match self.ranked.iter().position(|c| c.token() == self.actual) {
            Some(i) => Rank::At(i + 1),
            None if self.proposed => Rank::Missing(Miss::Filtered),
            None => Rank::Missing(Miss::NotProposed),
        }
    }

    pub fn reciprocal_rank(&self) -> f64 {
        self.rank().reciprocal()
    }

    /// 1.0 if the actual token is anywhere in the current ranking.
    pub fn recall(&self) -> f64 {
        if self.rank().is_found() {
            1.0
        } else {
            0.0
        }
    }

    /// Recall against only the first `k` entries of the current ranking.
    pub fn recall_at(&self, k: usize) -> f64 {
        match self.rank() {
            Rank::At(n) if n <= k => 1.0,
            _ => 0.0,
        }
    }
}

/// Attaches one suggestion set to each completion, pairwise, filtering each
/// down to `cutoff` candidates. On error no completion is changed.
pub fn apply_suggestions<S>(
    completions: &mut [Completion],
    suggestions: Vec<S>,
    cutoff: usize,
) -> Result<()>
where
    S: IntoIterator<Item = TokenId>,
{
    if completions.len() != suggestions.len() {
        return Err(EvalError::BatchLengthMismatch {
            completions: completions.len(),
            suggestions: suggestions.len(),
        });
    }
    if completions.iter().any(|c| c.suggestions.is_some()) {
        return Err(EvalError::AlreadyFiltered);
    }
    for (completion, allowed) in completions.iter_mut().zip(suggestions) {
        completion.filter_suggestions(allowed, cutoff)?;
    }
    Ok(())
}
