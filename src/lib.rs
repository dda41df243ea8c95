//! Scores a language model's last-token completions of source lines.
//!
//! A [`CompletionRunner`] lexes and indexes a line, asks the model for the
//! candidates at the last real token, ranks them into a [`Completion`],
//! optionally restricts that ranking to externally supplied suggestions, and
//! summarizes reciprocal rank and recall over many completions.

pub mod completion;
pub mod config;
pub mod context;
pub mod error;
pub mod lm;
pub mod metrics;
pub mod model;
pub mod runner;

pub use completion::{Completion, Miss, Rank};
pub use config::EvalConfig;
pub use error::EvalError;
pub use lm::{Lexer, Vocabulary, LM};
pub use metrics::SummaryStatistics;
pub use model::{FrequencyPair, Prediction, ScoredCandidate, TokenId};
pub use runner::{CompletionRunner, SuggestedLine};
