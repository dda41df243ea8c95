//! Runs a language model over lines and scores its last-token completions.

use rayon::prelude::*;
use tracing::debug;

use crate::completion::{apply_suggestions, Completion};
use crate::config::EvalConfig;
use crate::context::split_last_token;
use crate::error::{EvalError, Result};
use crate::lm::{Lexer, Vocabulary, LM};
use crate::metrics::{self, SummaryStatistics};
use crate::model::TokenId;

/// A line paired with its suggestion string: whitespace-separated token
/// texts that the completion may be restricted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuggestedLine<S> {
    pub line: S,
    pub suggestions: S,
}

/// The state of an evaluation: the collaborators plus the cutoffs.
pub struct CompletionRunner<X: Lexer, V: Vocabulary, L: LM> {
    lexer: X,
    vocab: V,
    lm: L,
    config: EvalConfig,
}

impl<X: Lexer, V: Vocabulary, L: LM> CompletionRunner<X, V, L> {
    pub fn new(lexer: X, vocab: V, lm: L) -> Self {
        Self::with_config(lexer, vocab, lm, EvalConfig::default())
    }

    pub fn with_config(lexer: X, vocab: V, lm: L, config: EvalConfig) -> Self {
        Self {
            lexer,
            vocab,
            lm,
            config,
        }
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Applies to every completion created afterwards.
    pub fn set_prediction_cutoff(&mut self, cutoff: usize) {
        self.config.prediction_cutoff = cutoff;
    }

    /// Applies to every completion filtered afterwards.
    pub fn set_completion_cutoff(&mut self, cutoff: usize) {
        self.config.completion_cutoff = cutoff;
    }

    /// Completes the last token of one line, without suggestion filtering.
    pub fn complete_line(&self, line: &str) -> Result<Completion> {
        let tokens = self.vocab.to_indices(self.lexer.lex_line(line));
        self.complete_last_token(&tokens)
    }

    /// Completes the last token of an already indexed line (ending with the
    /// end marker).
    pub fn complete_last_token(&self, tokens: &[TokenId]) -> Result<Completion> {
        let split = split_last_token(tokens)?;
        let preds = self
            .lm
            .predict(split.context, self.config.prediction_cutoff)?;

        // the prediction at the position right before the end marker
        let last = match preds.len().checked_sub(2) {
            Some(i) => &preds[i],
            None => return Err(EvalError::PredictionTooShort { len: preds.len() }),
        };
        let completion = Completion::from_prediction(split.actual, last);
        debug!(
            tokens = tokens.len(),
            candidates = completion.ranked().len(),
            rank = ?completion.rank(),
            "completed last token"
        );
        Ok(completion)
    }

    /// Completes every line and restricts each completion to its suggestions,
    /// keeping at most the completion cutoff.
    pub fn complete_suggested_lines<S>(&self, lines: &[SuggestedLine<S>]) -> Result<Vec<Completion>>
    where
        S: AsRef<str> + Sync,
    {
        debug!(lines = lines.len(), config = ?self.config, "completing suggested lines");
        lines
            .par_iter()
            .map(|SuggestedLine { line, suggestions }| {
                let mut completion = self.complete_line(line.as_ref())?;
                completion.filter_suggestions(
                    self.suggestion_ids(suggestions.as_ref()),
                    self.config.completion_cutoff,
                )?;
                Ok(completion)
            })
            .collect()
    }

    /// Like [`Self::complete_suggested_lines`] with lines and suggestion
    /// strings paired by position. Both slices must be the same length.
    pub fn complete_lines<S>(&self, lines: &[S], suggestions: &[S]) -> Result<Vec<Completion>>
    where
        S: AsRef<str> + Sync,
    {
        if lines.len() != suggestions.len() {
            return Err(EvalError::BatchLengthMismatch {
                completions: lines.len(),
                suggestions: suggestions.len(),
            });
        }
        let mut completions = lines
            .par_iter()
            .map(|line| self.complete_line(line.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let ids: Vec<Vec<TokenId>> = suggestions
            .iter()
            .map(|s| self.suggestion_ids(s.as_ref()))
            .collect();
        apply_suggestions(&mut completions, ids, self.config.completion_cutoff)?;
        Ok(completions)
    }

    fn suggestion_ids(&self, suggestions: &str) -> Vec<TokenId> {
        self.vocab.to_indices(suggestions.split_whitespace())
    }

    pub fn completion_mrr(&self, completions: &[Completion]) -> SummaryStatistics {
        metrics::mrr(completions)
    }

    pub fn completion_recall(&self, completions: &[Completion]) -> SummaryStatistics {
        metrics::recall(completions)
    }
}
