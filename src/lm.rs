//! Defines the collaborator traits the evaluator consumes: a lexer, a
//! vocabulary and the core `LM` trait.
//!
//! None of these are implemented here; callers plug in their own modeling
//! toolkit.

use crate::model::{Prediction, TokenId};

/// Splits one line of source text into token strings.
pub trait Lexer: Sync {
    fn lex_line(&self, text: &str) -> Vec<String>;
}

/// Maps token strings to integer ids.
///
/// A lexed line, once indexed, must end with the end-of-sequence marker's id;
/// whether the lexer or the vocabulary appends the marker is up to the
/// toolkit.
pub trait Vocabulary: Sync {
    /// Maps each token to its id, in order.
    fn to_indices<I>(&self, tokens: I) -> Vec<TokenId>
    where
        I: IntoIterator,
        I::Item: AsRef<str>;
}

/// A language model that scores candidate next tokens for every position of
/// a context.
pub trait LM: Sync {
    /// Returns one prediction per context position. `cutoff` bounds how many
    /// candidates each prediction may hold.
    fn predict(&self, context: &[TokenId], cutoff: usize) -> anyhow::Result<Vec<Prediction>>;
}
