use anyhow::{bail, Result};

use super::ApproachOutcome;
use crate::application::corpus::SplitCorpus;
use crate::ml::evaluation::Evaluation;
use crate::ml::grid_search::{grid_search, ParamGrid, TfidfSvc};

pub const NAME: &str = "SVM + Bag of Words";

/// Cross-validation folds for the grid search
pub const CV_FOLDS: usize = 3;

pub fn run(split: &SplitCorpus, grid: &ParamGrid) -> Result<ApproachOutcome> {
    if split.train.is_empty() || split.test.is_empty() {
        bail!("{NAME}: train and test partitions must both be non-empty");
    }

    tracing::info!(
        "{NAME}: grid search over {} candidates with {CV_FOLDS}-fold CV",
        grid.candidates().len()
    );
    let outcome = grid_search(&split.train.texts, &split.train.labels, grid, CV_FOLDS)?;
    println!("Best parameters ({NAME}): {} (CV weighted F1 {:.4})", outcome.best, outcome.best_score);

    tracing::info!("{NAME}: refitting the best parameters on {} training texts", split.train.len());
    let y_pred = TfidfSvc::new(outcome.best)
        .fit_predict(&split.train.texts, &split.train.labels, &split.test.texts)?;
    let eval   = Evaluation::new(split.test.labels.clone(), y_pred, split.num_classes());
    Ok(ApproachOutcome::new(NAME, eval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::{Review, Target};
    use crate::ml::svm::KernelKind;

    #[test]
    fn test_bow_on_separable_reviews() {
        let mut reviews = Vec::new();
        for i in 0..12 {
            let (rating, text) = match i % 3 {
                0 => (1.0, "awful broken refund"),
                1 => (3.0, "okay average decent"),
                _ => (5.0, "excellent great love"),
            };
            reviews.push(Review::new(rating, text, text));
        }
        let split = SplitCorpus::new(reviews, Target::Sentiment, 0.25, 42);
        let grid  = ParamGrid { c: vec![10.0], kernels: vec![KernelKind::Linear], ngram_ranges: vec![(1, 1)] };

        let outcome = run(&split, &grid).unwrap();
        assert_eq!(outcome.score.model, NAME);
        assert_eq!(outcome.score.test_samples, 3);
        assert_eq!(outcome.score.accuracy, 1.0);
    }
}
