// ============================================================
// Layer 2 — ExploreUseCase
// ============================================================
// Exploratory analysis of the review dataset:
//
//   Step 1-3: Load, clean, label                (corpus.rs)
//   Step 4:   Word cloud of all reviews         (Layer 7 - report)
//   Step 5:   Sentiment distribution bar chart  (Layer 7 - report)
//   Step 6:   Word cloud of positive reviews    (Layer 7 - report)
//   Step 7:   Word count box plot by sentiment  (Layer 7 - report)
//
// Returns a summary the CLI prints.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::application::corpus::load_reviews;
use crate::data::{loader::{CsvReviewLoader, DEFAULT_SOURCE}, preprocessor::Preprocessor};
use crate::domain::review::{Review, Sentiment};
use crate::report::{charts, wordcloud::{self, CloudLayout}};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExploreConfig {
    pub source:      String,
    pub plots_dir:   PathBuf,
    pub cloud_words: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            source:      DEFAULT_SOURCE.to_string(),
            plots_dir:   PathBuf::from("plots"),
            cloud_words: 150,
        }
    }
}

/// Per-sentiment counts and word-count statistics
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentSummary {
    pub sentiment:       Sentiment,
    pub reviews:         usize,
    pub mean_word_count: f64,
}

#[derive(Debug, Clone)]
pub struct ExploreReport {
    pub total_reviews: usize,
    /// No review text in the source at all
    pub missing_text:  usize,
    /// No text left after cleaning (includes missing_text)
    pub empty_reviews: usize,
    pub by_sentiment:  Vec<SentimentSummary>,
    pub plots:         Vec<PathBuf>,
}

pub fn summarise(reviews: &[Review]) -> Vec<SentimentSummary> {
    Sentiment::ALL
        .iter()
        .map(|&sentiment| {
            let counts: Vec<usize> = reviews
                .iter()
                .filter(|r| r.sentiment == sentiment)
                .map(|r| r.word_count)
                .collect();
            let mean_word_count = if counts.is_empty() {
                0.0
            } else {
                counts.iter().sum::<usize>() as f64 / counts.len() as f64
            };
            SentimentSummary { sentiment, reviews: counts.len(), mean_word_count }
        })
        .collect()
}

pub struct ExploreUseCase {
    config: ExploreConfig,
}

impl ExploreUseCase {
    pub fn new(config: ExploreConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<ExploreReport> {
        let cfg = &self.config;

        // ── Steps 1-3: Load, clean, label ─────────────────────────────────────
        let loader  = CsvReviewLoader::new(cfg.source.clone());
        let reviews = load_reviews(&loader, &Preprocessor::new())?;
        self.report(&reviews)
    }

    /// Draw every exploration plot for already-loaded reviews.
    pub fn report(&self, reviews: &[Review]) -> Result<ExploreReport> {
        let cfg = &self.config;
        fs::create_dir_all(&cfg.plots_dir)
            .with_context(|| format!("Cannot create plots directory '{}'", cfg.plots_dir.display()))?;

        let layout    = CloudLayout::default();
        let mut plots = Vec::new();

        // ── Step 4: Word cloud, all reviews ───────────────────────────────────
        let all_texts: Vec<String> = reviews.iter().map(|r| r.clean_text.clone()).collect();
        let path = cfg.plots_dir.join("wordcloud_all.svg");
        wordcloud::render_word_cloud(&path, "Word cloud - all reviews", &all_texts, cfg.cloud_words, &layout)?;
        plots.push(path);

        // ── Step 5: Sentiment distribution ────────────────────────────────────
        let summary = summarise(reviews);
        let bars: Vec<(String, usize)> = summary
            .iter()
            .map(|s| (s.sentiment.to_string(), s.reviews))
            .collect();
        let path = cfg.plots_dir.join("sentiment_distribution.svg");
        charts::bar_chart(&path, "Sentiment distribution", "Reviews", &bars)?;
        plots.push(path);

        // ── Step 6: Word cloud, positive reviews ──────────────────────────────
        let positive: Vec<String> = reviews
            .iter()
            .filter(|r| r.sentiment == Sentiment::Positive)
            .map(|r| r.clean_text.clone())
            .collect();
        let path = cfg.plots_dir.join("wordcloud_positive.svg");
        wordcloud::render_word_cloud(&path, "Word cloud - positive reviews", &positive, cfg.cloud_words, &layout)?;
        plots.push(path);

        // ── Step 7: Word count by sentiment ───────────────────────────────────
        let groups: Vec<(String, Vec<f64>)> = Sentiment::ALL
            .iter()
            .map(|&s| {
                let counts = reviews
                    .iter()
                    .filter(|r| r.sentiment == s)
                    .map(|r| r.word_count as f64)
                    .collect();
                (s.to_string(), counts)
            })
            .collect();
        let path = cfg.plots_dir.join("word_count_by_sentiment.svg");
        charts::box_plot(&path, "Word count by sentiment", "Words per review", &groups)?;
        plots.push(path);

        Ok(ExploreReport {
            total_reviews: reviews.len(),
            missing_text:  reviews.iter().filter(|r| r.raw_text.trim().is_empty()).count(),
            empty_reviews: reviews.iter().filter(|r| !r.has_text()).count(),
            by_sentiment:  summary,
            plots,
        })
    }
}
