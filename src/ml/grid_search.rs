// ============================================================
// Layer 5 — TF-IDF + SVC Pipeline and Grid Search
// ============================================================
// TfidfSvc chains the vectorizer and the classifier so both are
// fitted on exactly the same training texts.
//
// grid_search tries every parameter combination with stratified
// k-fold cross-validation, scores each fold by weighted F1 and
// keeps the combination with the best mean score (first one wins
// on a tie). The caller refits the winner on the whole training
// set with TfidfSvc.
//
// Candidate order: C (outer) → kernel → n-gram range (inner)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::splitter::stratified_folds;
use crate::features::tfidf::TfidfVectorizer;
use crate::ml::evaluation::f1_weighted;
use crate::ml::svm::{fit_predict, KernelKind, SvcParams};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BowParams {
    pub c:           f64,
    pub kernel:      KernelKind,
    pub ngram_range: (usize, usize),
}

impl std::fmt::Display for BowParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "C={} kernel={} ngram_range=({}, {})",
            self.c, self.kernel, self.ngram_range.0, self.ngram_range.1
        )
    }
}

#[derive(Debug, Clone)]
pub struct ParamGrid {
    pub c:            Vec<f64>,
    pub kernels:      Vec<KernelKind>,
    pub ngram_ranges: Vec<(usize, usize)>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            c:            vec![0.1, 1.0, 10.0],
            kernels:      vec![KernelKind::Linear, KernelKind::Rbf],
            ngram_ranges: vec![(1, 1), (1, 2)],
        }
    }
}

impl ParamGrid {
    pub fn candidates(&self) -> Vec<BowParams> {
        let mut out = Vec::new();
        for &c in &self.c {
            for &kernel in &self.kernels {
                for &ngram_range in &self.ngram_ranges {
                    out.push(BowParams { c, kernel, ngram_range });
                }
            }
        }
        out
    }
}

/// TF-IDF features followed by a support vector classifier.
pub struct TfidfSvc {
    params: BowParams,
}

impl TfidfSvc {
    pub fn new(params: BowParams) -> Self {
        Self { params }
    }

    /// Fit vectorizer and classifier on `texts`, then predict `queries`.
    pub fn fit_predict(&self, texts: &[String], labels: &[usize], queries: &[String]) -> Result<Vec<usize>> {
        let mut vectorizer = TfidfVectorizer::new(self.params.ngram_range);
        let x = vectorizer.fit_transform(texts)?;
        let q = vectorizer.transform(queries);
        fit_predict(&x, labels, &q, &SvcParams::new(self.params.c, self.params.kernel))
    }
}

pub struct GridSearchOutcome {
    pub best:       BowParams,
    pub best_score: f64,
}

pub fn grid_search(
    texts:  &[String],
    labels: &[usize],
    grid:   &ParamGrid,
    folds:  usize,
) -> Result<GridSearchOutcome> {
    if texts.len() != labels.len() {
        bail!("{} texts but {} labels", texts.len(), labels.len());
    }
    if folds < 2 {
        bail!("cross-validation needs at least 2 folds, got {folds}");
    }

    let candidates = grid.candidates();
    let fold_of = stratified_folds(labels, folds);
    let mut best: Option<(BowParams, f64)> = None;

    for params in candidates {
        let mut fold_scores = Vec::with_capacity(folds);

        for fold in 0..folds {
            let (mut tr_x, mut tr_y, mut va_x, mut va_y) = (Vec::new(), Vec::new(), Vec::new(), Vec::new());
            for (i, text) in texts.iter().enumerate() {
                if fold_of[i] == fold {
                    va_x.push(text.clone());
                    va_y.push(labels[i]);
                } else {
                    tr_x.push(text.clone());
                    tr_y.push(labels[i]);
                }
            }

            let y_pred = TfidfSvc::new(params).fit_predict(&tr_x, &tr_y, &va_x)?;
            fold_scores.push(f1_weighted(&va_y, &y_pred));
        }

        let mean = fold_scores.iter().sum::<f64>() / fold_scores.len() as f64;
        tracing::info!("Grid search: {} → mean weighted F1 {:.4}", params, mean);
        // Strictly greater keeps the earliest candidate on ties
        if best.map_or(true, |(_, score)| mean > score) {
            best = Some((params, mean));
        }
    }

    let (best, best_score) = best.context("parameter grid is empty")?;
    tracing::info!("Best parameters: {} (F1 {:.4})", best, best_score);
    Ok(GridSearchOutcome { best, best_score })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> (Vec<String>, Vec<usize>) {
        let texts = [
            "terrible broken refund", "broken awful refund", "awful terrible junk",
            "okay average fine", "average okay decent", "fine decent average",
            "excellent great love", "love great perfect", "perfect excellent great",
        ];
        let labels = vec![0, 0, 0, 1, 1, 1, 2, 2, 2];
        (texts.iter().map(|s| s.to_string()).collect(), labels)
    }

    #[test]
    fn test_candidate_order() {
        let c = ParamGrid::default().candidates();
        assert_eq!(c.len(), 12);
        assert_eq!(c[0], BowParams { c: 0.1, kernel: KernelKind::Linear, ngram_range: (1, 1) });
        assert_eq!(c[1].ngram_range, (1, 2));
        assert_eq!(c[2].kernel, KernelKind::Rbf);
        assert_eq!(c[4].c, 1.0);
    }

    #[test]
    fn test_pipeline_predicts_unseen_texts() {
        let (texts, labels) = corpus();
        let params = BowParams { c: 10.0, kernel: KernelKind::Linear, ngram_range: (1, 1) };
        let queries = vec!["great love".to_string(), "broken junk".to_string()];
        let y_pred = TfidfSvc::new(params).fit_predict(&texts, &labels, &queries).unwrap();
        assert_eq!(y_pred, vec![2, 0]);
    }

    #[test]
    fn test_grid_search_keeps_first_best_on_tie() {
        let (texts, labels) = corpus();
        let grid = ParamGrid {
            c:            vec![10.0, 100.0],
            kernels:      vec![KernelKind::Linear],
            ngram_ranges: vec![(1, 1)],
        };
        let outcome = grid_search(&texts, &labels, &grid, 3).unwrap();
        // Every fold of this corpus is separable, so both candidates score 1.0
        assert_eq!(outcome.best.c, 10.0);
        assert!((outcome.best_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_search_rejects_one_fold() {
        let (texts, labels) = corpus();
        assert!(grid_search(&texts, &labels, &ParamGrid::default(), 1).is_err());
    }

    #[test]
    fn test_grid_search_rejects_empty_grid() {
        let (texts, labels) = corpus();
        let grid = ParamGrid { c: Vec::new(), ..ParamGrid::default() };
        assert!(grid_search(&texts, &labels, &grid, 3).is_err());
    }
}
