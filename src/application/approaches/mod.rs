// ============================================================
// Layer 2 — Modelling Approaches
// ============================================================
// Each approach fits on the train partition of a SplitCorpus,
// predicts the test partition and returns an ApproachOutcome:
//
//   bow.rs         — TF-IDF + SVC tuned by grid search
//   embedding.rs   — mean word vectors + scaling + RBF SVC
//   transformer.rs — transformer encoder, loaded from a
//                    checkpoint or trained from scratch

pub mod bow;
pub mod embedding;
pub mod transformer;

use crate::domain::score::ModelScore;
use crate::ml::evaluation::Evaluation;

/// Score and raw predictions of one approach on its test partition
#[derive(Debug, Clone)]
pub struct ApproachOutcome {
    pub score:      ModelScore,
    pub evaluation: Evaluation,
}

impl ApproachOutcome {
    pub fn new(name: &str, evaluation: Evaluation) -> Self {
        let score = ModelScore::new(
            name,
            evaluation.accuracy(),
            evaluation.f1_weighted(),
            evaluation.len(),
        );
        tracing::info!(
            "{}: accuracy {:.4}, weighted F1 {:.4} on {} test samples",
            name, score.accuracy, score.f1_weighted, score.test_samples,
        );
        Self { score, evaluation }
    }
}
