//! Runtime cutoffs for an evaluation run.

use serde::{Deserialize, Serialize};

/// Cutoff used by the model and by suggestion filtering when nothing else is
/// configured.
pub const DEFAULT_CUTOFF: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Forwarded to the model: the most candidates it returns per position.
    pub prediction_cutoff: usize,
    /// K: the most candidates a completion keeps after suggestion filtering.
    pub completion_cutoff: usize,
}

impl EvalConfig {
    pub fn with_prediction_cutoff(mut self, cutoff: usize) -> Self {
        self.prediction_cutoff = cutoff;
        self
    }

    pub fn with_completion_cutoff(mut self, cutoff: usize) -> Self {
        self.completion_cutoff = cutoff;
        self
    }
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            prediction_cutoff: DEFAULT_CUTOFF,
            completion_cutoff: DEFAULT_CUTOFF,
        }
    }
}
