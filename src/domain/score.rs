// ============================================================
// Layer 3 — Model Score Domain Type
// ============================================================
// The outcome of evaluating one approach on its test partition.
// The comparison table is just an ordered list of these.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    /// Display name, e.g. "SVM + Bag of Words"
    pub model: String,

    /// Fraction of test samples predicted correctly, in [0, 1]
    pub accuracy: f64,

    /// Support-weighted mean of per-class F1, in [0, 1]
    pub f1_weighted: f64,

    /// Number of test samples the scores were computed on
    pub test_samples: usize,
}

impl ModelScore {
    pub fn new(model: impl Into<String>, accuracy: f64, f1_weighted: f64, test_samples: usize) -> Self {
        Self { model: model.into(), accuracy, f1_weighted, test_samples }
    }
}

/// Returns the score with the highest weighted F1, if any.
pub fn best_by_f1(scores: &[ModelScore]) -> Option<&ModelScore> {
    scores
        .iter()
        .max_by(|a, b| a.f1_weighted.total_cmp(&b.f1_weighted))
}
