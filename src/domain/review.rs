// ============================================================
// Layer 3 — Review Domain Types
// ============================================================
// A Review is one row of the dataset after cleaning and labelling.
// It is built once at load time and never mutated afterwards.
//
//   rating      → the star rating as given (1.0 ..= 5.0)
//   raw_text    → reviewText exactly as read (empty if missing)
//   clean_text  → lowercased, punctuation and stopwords removed
//   sentiment   → derived from the rating, see Sentiment::from_rating
//   word_count  → whitespace tokens in clean_text
//
// Reference: Rust Book §5 (Structs), §6 (Enums)

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three sentiment classes a rating maps onto.
/// Declaration order is the class-index order used by the models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl Sentiment {
    /// All classes in index order
    pub const ALL: [Sentiment; 3] = [Sentiment::Negative, Sentiment::Neutral, Sentiment::Positive];

    /// Threshold a rating into a sentiment class.
    ///   rating >= 4 → Positive
    ///   rating <= 2 → Negative
    ///   otherwise   → Neutral
    pub fn from_rating(rating: f64) -> Self {
        if rating >= 4.0 {
            Sentiment::Positive
        } else if rating <= 2.0 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Neutral  => "neutral",
            Sentiment::Positive => "positive",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One cleaned, labelled review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub rating:     f64,
    pub raw_text:   String,
    pub clean_text: String,
    pub sentiment:  Sentiment,
    pub word_count: usize,
}

impl Review {
    /// Build a review from its rating, raw text and already-cleaned text.
    /// Sentiment and word count are derived here and only here.
    pub fn new(rating: f64, raw_text: impl Into<String>, clean_text: impl Into<String>) -> Self {
        let clean_text = clean_text.into();
        let word_count = clean_text.split_whitespace().count();
        Self {
            rating,
            raw_text: raw_text.into(),
            sentiment: Sentiment::from_rating(rating),
            clean_text,
            word_count,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.clean_text.is_empty()
    }
}

/// What the classifiers are asked to predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Three sentiment classes derived from the rating
    Sentiment,
    /// The five raw star ratings
    Rating,
}

impl Target {
    pub fn num_classes(&self) -> usize {
        match self {
            Target::Sentiment => Sentiment::ALL.len(),
            Target::Rating    => 5,
        }
    }

    /// Class index of a review under this target.
    pub fn label_of(&self, review: &Review) -> usize {
        match self {
            Target::Sentiment => review.sentiment.index(),
            Target::Rating    => (review.rating.round() as usize).clamp(1, 5) - 1,
        }
    }

    /// Human-readable names, one per class index.
    pub fn class_names(&self) -> Vec<String> {
        match self {
            Target::Sentiment => Sentiment::ALL.iter().map(|s| s.to_string()).collect(),
            Target::Rating    => (1..=5).map(|r| format!("{r} star")).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_ratings() {
        assert_eq!(Sentiment::from_rating(5.0), Sentiment::Positive);
        assert_eq!(Sentiment::from_rating(3.0), Sentiment::Neutral);
        assert_eq!(Sentiment::from_rating(1.0), Sentiment::Negative);
    }

    #[test]
    fn test_thresholds_over_rating_range() {
        // Walk the whole range in quarter steps, including fractional ratings
        let mut r = 0.0;
        while r <= 6.0 {
            let s = Sentiment::from_rating(r);
            assert_eq!(s == Sentiment::Positive, r >= 4.0, "rating {r}");
            assert_eq!(s == Sentiment::Negative, r <= 2.0, "rating {r}");
            assert_eq!(s == Sentiment::Neutral, r > 2.0 && r < 4.0, "rating {r}");
            r += 0.25;
        }
    }

    #[test]
    fn test_review_derives_fields() {
        let r = Review::new(4.0, "Great cable!", "great cable");
        assert_eq!(r.sentiment, Sentiment::Positive);
        assert_eq!(r.word_count, 2);
        assert!(r.has_text());
        assert!(!Review::new(2.0, "", "").has_text());
    }

    #[test]
    fn test_target_labels() {
        let r = Review::new(2.0, "meh", "meh");
        assert_eq!(Target::Sentiment.label_of(&r), 0);
        assert_eq!(Target::Rating.label_of(&r), 1);
        assert_eq!(Target::Rating.class_names().len(), Target::Rating.num_classes());
        assert_eq!(Target::Sentiment.class_names()[2], "positive");
    }
}
