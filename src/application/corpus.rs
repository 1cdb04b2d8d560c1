// ============================================================
// Layer 2 — Review Corpus
// ============================================================
// Shared first steps of both commands:
//
//   Step 1: Load raw rows          (Layer 4 - data)
//   Step 2: Clean the text         (Layer 4 - data)
//   Step 3: Label by rating        (Layer 3 - domain)
//
// plus the single seeded train/test split every approach starts
// from. The bag-of-words approach uses it as-is; the embedding
// and transformer approaches call `without_empty_texts` first.

use anyhow::{bail, Result};

use crate::data::{preprocessor::Preprocessor, splitter::split_train_test};
use crate::domain::review::{Review, Target};
use crate::domain::traits::ReviewSource;

/// Load every row from `source` and turn it into a cleaned, labelled review.
pub fn load_reviews(source: &dyn ReviewSource, preprocessor: &Preprocessor) -> Result<Vec<Review>> {
    let raw = source.load_all()?;
    tracing::info!("Loaded {} raw reviews", raw.len());

    let reviews: Vec<Review> = raw.iter().map(|r| preprocessor.review(r)).collect();
    let empty = reviews.iter().filter(|r| !r.has_text()).count();
    tracing::info!("Cleaned {} reviews ({} with no remaining text)", reviews.len(), empty);

    if reviews.is_empty() {
        bail!("the dataset contains no usable reviews");
    }
    Ok(reviews)
}

/// Texts and class indices for one side of a split
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub texts:  Vec<String>,
    pub labels: Vec<usize>,
}

impl Partition {
    fn from_reviews(reviews: &[Review], target: Target) -> Self {
        Self {
            texts:  reviews.iter().map(|r| r.clean_text.clone()).collect(),
            labels: reviews.iter().map(|r| target.label_of(r)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    fn without_empty_texts(&self) -> Self {
        let (texts, labels) = self
            .texts
            .iter()
            .zip(&self.labels)
            .filter(|(t, _)| !t.is_empty())
            .map(|(t, l)| (t.clone(), *l))
            .unzip();
        Self { texts, labels }
    }
}

#[derive(Debug, Clone)]
pub struct SplitCorpus {
    pub train:  Partition,
    pub test:   Partition,
    pub target: Target,
}

impl SplitCorpus {
    pub fn new(reviews: Vec<Review>, target: Target, test_size: f64, seed: u64) -> Self {
        let (train, test) = split_train_test(reviews, test_size, seed);
        tracing::info!("Split: {} train, {} test (seed {})", train.len(), test.len(), seed);
        Self {
            train: Partition::from_reviews(&train, target),
            test:  Partition::from_reviews(&test, target),
            target,
        }
    }

    /// The same split with empty cleaned texts removed from both sides.
    pub fn without_empty_texts(&self) -> Self {
        let filtered = Self {
            train:  self.train.without_empty_texts(),
            test:   self.test.without_empty_texts(),
            target: self.target,
        };
        tracing::debug!(
            "Dropped {} empty texts from train, {} from test",
            self.train.len() - filtered.train.len(),
            self.test.len() - filtered.test.len(),
        );
        filtered
    }

    pub fn num_classes(&self) -> usize {
        self.target.num_classes()
    }

    pub fn class_names(&self) -> Vec<String> {
        self.target.class_names()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::RawReview;

    struct InMemory(Vec<RawReview>);

    impl ReviewSource for InMemory {
        fn load_all(&self) -> Result<Vec<RawReview>> {
            Ok(self.0.clone())
        }
    }

    fn raw(rating: f64, text: Option<&str>) -> RawReview {
        RawReview { rating, text: text.map(str::to_string) }
    }

    #[test]
    fn test_load_cleans_and_labels() {
        let source  = InMemory(vec![raw(5.0, Some("I LOVE it!")), raw(1.0, None)]);
        let reviews = load_reviews(&source, &Preprocessor::new()).unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].clean_text, "love");
        assert_eq!(reviews[1].clean_text, "");
        assert_eq!(Target::Sentiment.label_of(&reviews[1]), 0);
    }

    #[test]
    fn test_empty_source_is_an_error() {
        assert!(load_reviews(&InMemory(Vec::new()), &Preprocessor::new()).is_err());
    }

    #[test]
    fn test_split_then_filter_keeps_labels_aligned() {
        let reviews: Vec<Review> = (0..10)
            .map(|i| {
                let rating = (i % 5 + 1) as f64;
                let text   = if i % 3 == 0 { String::new() } else { format!("word{i}") };
                Review::new(rating, text.clone(), text)
            })
            .collect();

        let split = SplitCorpus::new(reviews, Target::Rating, 0.2, 42);
        assert_eq!(split.train.len() + split.test.len(), 10);
        assert_eq!(split.test.len(), 2);

        let filtered = split.without_empty_texts();
        assert_eq!(filtered.train.len() + filtered.test.len(), 6);
        for p in [&filtered.train, &filtered.test] {
            for (text, &label) in p.texts.iter().zip(&p.labels) {
                let i: usize = text.trim_start_matches("word").parse().unwrap();
                assert_eq!(label, i % 5);
            }
        }
    }
}
