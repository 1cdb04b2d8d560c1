// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Cleans raw review text before it reaches any model or chart.
//
// Cleaning steps (applied in order):
//   1. Missing text becomes the empty string
//   2. Lowercase everything
//   3. Delete ASCII punctuation  !"#$%&'()*+,-./:;<=>?@[\]^_`{|}~
//   4. Split on whitespace
//   5. Drop stopwords
//   6. Join the surviving tokens with single spaces
//
// The output is a fixed point: cleaning it again changes nothing.
//
// Reference: Rust Book §8 (Strings in Rust)
//            Rust Book §13 (Iterators)

use std::collections::HashSet;

use crate::data::stopwords;
use crate::domain::review::Review;
use crate::domain::traits::RawReview;

pub struct Preprocessor {
    stopwords: HashSet<String>,
}

impl Preprocessor {
    /// Preprocessor with the English stopword list
    pub fn new() -> Self {
        Self { stopwords: stopwords::english_set() }
    }

    /// Preprocessor with a caller-supplied stopword list.
    /// Entries are lowercased so matching stays case-insensitive.
    #[cfg(test)]
    pub fn with_stopwords<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = words
            .into_iter()
            .map(|w| w.as_ref().to_lowercase())
            .collect();
        Self { stopwords }
    }

    #[cfg(test)]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Clean optional text. Non-text input is masked as "".
    pub fn clean_opt(&self, text: Option<&str>) -> String {
        match text {
            Some(t) => self.clean(t),
            None    => String::new(),
        }
    }

    /// Turn a raw dataset row into a cleaned, labelled Review.
    pub fn review(&self, raw: &RawReview) -> Review {
        let raw_text = raw.text.clone().unwrap_or_default();
        let clean    = self.clean_opt(raw.text.as_deref());
        Review::new(raw.rating, raw_text, clean)
    }

    /// Clean a raw text string.
    pub fn clean(&self, text: &str) -> String {
        // ── Steps 2 + 3: lowercase and strip punctuation in one pass ──────────
        let lowered: String = text
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();

        // ── Steps 4–6: tokenise, filter, rejoin ───────────────────────────────
        lowered
            .split_whitespace()
            .filter(|w| !self.stopwords.contains(*w))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::Sentiment;

    const SAMPLES: &[&str] = &[
        "This SD card works GREAT!!! I'd buy it again.",
        "   Not   what I expected... returned it :(",
        "It's fine -- does the job, nothing more.",
        "Five stars. The card is fast; the price was right & shipping quick.",
        "ÉCLAIR-like Über speed?! 10/10",
        "",
        "!!!???",
    ];

    #[test]
    fn test_basic_cleaning() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("This SD card works GREAT!!!"), "sd card works great");
    }

    #[test]
    fn test_missing_text_is_empty() {
        let p = Preprocessor::new();
        assert_eq!(p.clean_opt(None), "");
        assert_eq!(p.clean(""), "");
        assert_eq!(p.clean("!!!???"), "");
    }

    #[test]
    fn test_apostrophes_are_removed_not_split() {
        let p = Preprocessor::new();
        // "don't" loses its apostrophe and becomes "dont", which is not a stopword
        assert_eq!(p.clean("I don't like it"), "dont like");
    }

    #[test]
    fn test_idempotent() {
        let p = Preprocessor::new();
        for s in SAMPLES {
            let once  = p.clean(s);
            let twice = p.clean(&once);
            assert_eq!(once, twice, "input: {s:?}");
        }
    }

    #[test]
    fn test_no_punctuation_or_stopwords_in_output() {
        let p = Preprocessor::new();
        for s in SAMPLES {
            let out = p.clean(s);
            assert!(!out.chars().any(|c| c.is_ascii_punctuation()), "punctuation in {out:?}");
            for word in out.split_whitespace() {
                assert!(!p.is_stopword(word), "stopword {word:?} in {out:?}");
            }
        }
    }

    #[test]
    fn test_review_from_raw_row() {
        let p = Preprocessor::new();
        let r = p.review(&RawReview { rating: 1.0, text: Some("It broke!".into()) });
        assert_eq!(r.raw_text, "It broke!");
        assert_eq!(r.clean_text, "broke");
        assert_eq!(r.sentiment, Sentiment::Negative);
        assert_eq!(r.word_count, 1);

        let empty = p.review(&RawReview { rating: 3.0, text: None });
        assert_eq!(empty.raw_text, "");
        assert_eq!(empty.word_count, 0);
        assert_eq!(empty.sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_custom_stopwords() {
        let p = Preprocessor::with_stopwords(["Card"]);
        assert_eq!(p.clean("the card is good"), "the is good");
    }
}
