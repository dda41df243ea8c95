//! Errors raised while evaluating completions.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("indexed line has {len} tokens, need at least one token plus end marker")]
    ContextTooShort { len: usize },

    #[error("model returned {len} predictions, need at least 2")]
    PredictionTooShort { len: usize },

    #[error("{completions} completions but {suggestions} suggestion lists")]
    BatchLengthMismatch { completions: usize, suggestions: usize },

    #[error("suggestions were already applied to this completion")]
    AlreadyFiltered,

    #[error(transparent)]
    Model(#[from] anyhow::Error),
}

impl EvalError {
    /// Whether the error comes from the shape of the caller's input rather
    /// than from the model.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, EvalError::Model(_))
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_kinds() {
        assert!(EvalError::ContextTooShort { len: 1 }.is_invalid_input());
        assert!(EvalError::PredictionTooShort { len: 0 }.is_invalid_input());
        assert!(EvalError::BatchLengthMismatch {
            completions: 2,
            suggestions: 3
        }
        .is_invalid_input());
        assert!(EvalError::AlreadyFiltered.is_invalid_input());
        assert!(!EvalError::from(anyhow::anyhow!("model offline")).is_invalid_input());
    }

    #[test]
    fn test_messages() {
        let err = EvalError::BatchLengthMismatch {
            completions: 2,
            suggestions: 3,
        };
        assert_eq!(err.to_string(), "2 completions but 3 suggestion lists");
        let err = EvalError::from(anyhow::anyhow!("model offline"));
        assert_eq!(err.to_string(), "model offline");
    }
}
