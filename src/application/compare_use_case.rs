// ============================================================
// Layer 2 — CompareUseCase
// ============================================================
// Runs the modelling approaches on one seeded split and collects
// their scores:
//
//   Step 1-3: Load, clean, label                     (corpus.rs)
//   Step 4:   Seeded train/test split                (corpus.rs)
//   Step 5:   Fit + score each selected approach     (approaches/)
//             → one confusion-matrix heatmap each    (Layer 7 - report)
//   Step 6:   Results chart and results.csv          (Layer 7 - report)
//
// Each approach is scored on its own view of the split, so the
// table compares approaches, not identical test sets.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::application::approaches::{bow, embedding, transformer, ApproachOutcome};
use crate::application::approaches::transformer::TransformerSettings;
use crate::application::corpus::{load_reviews, SplitCorpus};
use crate::data::{loader::{CsvReviewLoader, DEFAULT_SOURCE}, preprocessor::Preprocessor};
use crate::domain::review::{Review, Target};
use crate::domain::score::ModelScore;
use crate::features::embedding::WordVectors;
use crate::ml::grid_search::ParamGrid;
use crate::report::{charts, table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Approach {
    Bow,
    Embedding,
    Transformer,
}

impl Approach {
    pub const ALL: [Approach; 3] = [Approach::Bow, Approach::Embedding, Approach::Transformer];

    pub fn display_name(&self) -> &'static str {
        match self {
            Approach::Bow         => bow::NAME,
            Approach::Embedding   => embedding::NAME,
            Approach::Transformer => transformer::NAME,
        }
    }

    fn file_stem(&self) -> &'static str {
        match self {
            Approach::Bow         => "bow",
            Approach::Embedding   => "embedding",
            Approach::Transformer => "transformer",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareConfig {
    pub source:        String,
    pub plots_dir:     PathBuf,
    pub target:        Target,
    pub test_size:     f64,
    pub seed:          u64,
    pub approaches:    Vec<Approach>,
    /// GloVe / word2vec text file; random-indexing vectors when absent
    pub word_vectors:  Option<PathBuf>,
    pub embedding_dim: usize,
    pub transformer:   TransformerSettings,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            source:        DEFAULT_SOURCE.to_string(),
            plots_dir:     PathBuf::from("plots"),
            target:        Target::Sentiment,
            test_size:     0.2,
            seed:          42,
            approaches:    Approach::ALL.to_vec(),
            word_vectors:  None,
            embedding_dim: 96,
            transformer:   TransformerSettings::default(),
        }
    }
}

pub struct CompareUseCase {
    config: CompareConfig,
    grid:   ParamGrid,
}

impl CompareUseCase {
    pub fn new(config: CompareConfig) -> Self {
        Self { config, grid: ParamGrid::default() }
    }

    /// Replace the bag-of-words parameter grid.
    #[cfg(test)]
    pub fn with_grid(mut self, grid: ParamGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn execute(&self) -> Result<Vec<ModelScore>> {
        let loader  = CsvReviewLoader::new(self.config.source.clone());
        let reviews = load_reviews(&loader, &Preprocessor::new())?;
        self.compare(reviews)
    }

    /// Split already-loaded reviews and run every selected approach.
    pub fn compare(&self, reviews: Vec<Review>) -> Result<Vec<ModelScore>> {
        let cfg = &self.config;
        if cfg.approaches.is_empty() {
            bail!("no approaches selected");
        }
        if !(0.0..1.0).contains(&cfg.test_size) || cfg.test_size == 0.0 {
            bail!("test size must be in (0, 1), got {}", cfg.test_size);
        }
        fs::create_dir_all(&cfg.plots_dir)
            .with_context(|| format!("Cannot create plots directory '{}'", cfg.plots_dir.display()))?;

        // ── Step 4: One seeded split for everyone ─────────────────────────────
        let split     = SplitCorpus::new(reviews, cfg.target, cfg.test_size, cfg.seed);
        let non_empty = split.without_empty_texts();

        // ── Step 5: Fit and score each approach ───────────────────────────────
        let mut scores = Vec::with_capacity(cfg.approaches.len());
        for &approach in &cfg.approaches {
            tracing::info!("Running approach: {}", approach.display_name());
            let outcome = match approach {
                Approach::Bow         => bow::run(&split, &self.grid)?,
                Approach::Embedding   => embedding::run(&non_empty, &self.word_vectors()?)?,
                Approach::Transformer => transformer::run(&non_empty, &cfg.transformer)?.0,
            };
            self.plot_confusion(approach, &outcome, &split.class_names())?;
            scores.push(outcome.score);
        }

        // ── Step 6: Results ───────────────────────────────────────────────────
        charts::results_chart(&cfg.plots_dir.join("results.svg"), &scores)?;
        table::write_csv(&cfg.plots_dir.join("results.csv"), &scores)?;
        Ok(scores)
    }

    fn word_vectors(&self) -> Result<WordVectors> {
        match &self.config.word_vectors {
            Some(path) => WordVectors::from_text_file(path),
            None => {
                tracing::info!(
                    "No word vectors file given, using random-indexing vectors (dim={})",
                    self.config.embedding_dim
                );
                Ok(WordVectors::hashed(self.config.embedding_dim, self.config.seed))
            }
        }
    }

    fn plot_confusion(&self, approach: Approach, outcome: &ApproachOutcome, labels: &[String]) -> Result<()> {
        let path  = self.config.plots_dir.join(format!("confusion_{}.svg", approach.file_stem()));
        let title = format!("Confusion matrix - {}", approach.display_name());
        charts::confusion_heatmap(&path, &title, labels, &outcome.evaluation.confusion())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::svm::KernelKind;

    fn reviews() -> Vec<Review> {
        (0..30)
            .map(|i| {
                let (rating, text) = match i % 3 {
                    0 => (1.0, "awful broken refund"),
                    1 => (3.0, "okay average decent"),
                    _ => (5.0, "excellent great love"),
                };
                // a few reviews lose all their text in cleaning
                let text = if i % 10 == 9 { "" } else { text };
                Review::new(rating, text, text)
            })
            .collect()
    }

    fn small_grid() -> ParamGrid {
        ParamGrid { c: vec![10.0], kernels: vec![KernelKind::Linear], ngram_ranges: vec![(1, 1)] }
    }

    #[test]
    fn test_svm_approaches_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = CompareConfig {
            plots_dir:     dir.path().to_path_buf(),
            approaches:    vec![Approach::Bow, Approach::Embedding],
            embedding_dim: 16,
            ..CompareConfig::default()
        };

        let scores = CompareUseCase::new(cfg).with_grid(small_grid()).compare(reviews()).unwrap();

        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].model, bow::NAME);
        assert_eq!(scores[1].model, embedding::NAME);
        // empty texts are dropped only for the embedding approach
        assert_eq!(scores[0].test_samples, 6);
        assert!(scores[1].test_samples <= 6);

        for file in ["confusion_bow.svg", "confusion_embedding.svg", "results.svg", "results.csv"] {
            assert!(dir.path().join(file).is_file(), "missing {file}");
        }
    }

    #[test]
    fn test_rejects_bad_test_size() {
        let cfg = CompareConfig { test_size: 1.5, ..CompareConfig::default() };
        assert!(CompareUseCase::new(cfg).compare(reviews()).is_err());
    }

    #[test]
    fn test_approach_names() {
        let names: Vec<&str> = Approach::ALL.iter().map(|a| a.display_name()).collect();
        assert_eq!(names, vec!["SVM + Bag of Words", "SVM + Embeddings", "Transformer"]);
    }
}
