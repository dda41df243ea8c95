//! Extracts the prediction context from an indexed line.

use crate::error::{EvalError, Result};
use crate::model::TokenId;

/// A line's indexed tokens split into the context and the token to predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineContext<'a> {
    /// Every token before the last real one.
    pub context: &'a [TokenId],
    /// The last real token, just before the end marker.
    pub actual: TokenId,
}

/// Splits `tokens` (which end with the end marker) into context and target.
/// The last two tokens, the target and its end marker, are not context.
pub fn split_last_token(tokens: &[TokenId]) -> Result<LineContext<'_>> {
    match tokens {
        [context @ .., actual, _eos] => Ok(LineContext {
            context,
            actual: *actual,
        }),
        _ => Err(EvalError::ContextTooShort { len: tokens.len() }),
    }
}
