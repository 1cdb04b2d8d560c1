// ============================================================
// Feature Extraction — TF-IDF Vectorizer
// ============================================================
// Bag-of-words features with inverse document frequency weighting.
//
//   1. Tokens are runs of two or more word characters
//      (alphanumeric or '_'), lowercased
//   2. n-grams in [min_n, max_n] are built from consecutive tokens
//   3. tf     = raw count of the term in the document
//      idf    = ln((1 + n_docs) / (1 + df)) + 1
//      weight = tf · idf
//   4. Each document row is scaled to unit L2 norm
//
// The vocabulary is sorted alphabetically so feature indices do not
// depend on document order.

use anyhow::{bail, Result};
use std::collections::{BTreeMap, HashMap};

use crate::features::sparse::SparseVector;

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    ngram_range: (usize, usize),
    vocabulary:  HashMap<String, usize>,
    idf:         Vec<f64>,
}

impl TfidfVectorizer {
    pub fn new(ngram_range: (usize, usize)) -> Self {
        let (lo, hi) = ngram_range;
        let lo = lo.max(1);
        Self {
            ngram_range: (lo, hi.max(lo)),
            vocabulary:  HashMap::new(),
            idf:         Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[cfg(test)]
    pub fn idf_of(&self, term: &str) -> Option<f64> {
        self.vocabulary.get(term).map(|&i| self.idf[i])
    }

    /// Learn vocabulary and idf weights from `docs`.
    pub fn fit(&mut self, docs: &[String]) -> Result<()> {
        let mut df: BTreeMap<String, usize> = BTreeMap::new();

        for doc in docs {
            let mut seen: Vec<String> = self.analyze(doc);
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        if df.is_empty() {
            bail!("empty vocabulary; documents contain only stopwords or no word tokens");
        }

        let n = docs.len() as f64;
        self.vocabulary = HashMap::with_capacity(df.len());
        self.idf        = Vec::with_capacity(df.len());

        // BTreeMap iteration is alphabetical
        for (index, (term, count)) in df.into_iter().enumerate() {
            self.idf.push(((1.0 + n) / (1.0 + count as f64)).ln() + 1.0);
            self.vocabulary.insert(term, index);
        }

        tracing::debug!(
            "TF-IDF fitted: {} terms, ngram_range={:?}",
            self.vocabulary.len(),
            self.ngram_range
        );
        Ok(())
    }

    /// Map documents to L2-normalised TF-IDF rows. Unknown terms are ignored.
    pub fn transform(&self, docs: &[String]) -> Vec<SparseVector> {
        let dim = self.vocabulary.len();
        docs.iter()
            .map(|doc| {
                let mut counts: HashMap<usize, f64> = HashMap::new();
                for term in self.analyze(doc) {
                    if let Some(&idx) = self.vocabulary.get(&term) {
                        *counts.entry(idx).or_insert(0.0) += 1.0;
                    }
                }
                let pairs = counts
                    .into_iter()
                    .map(|(idx, tf)| (idx, tf * self.idf[idx]))
                    .collect();
                let mut row = SparseVector::from_pairs(dim, pairs);
                row.l2_normalize();
                row
            })
            .collect()
    }

    pub fn fit_transform(&mut self, docs: &[String]) -> Result<Vec<SparseVector>> {
        self.fit(docs)?;
        Ok(self.transform(docs))
    }

    /// All n-gram terms of a document, in order of appearance.
    fn analyze(&self, doc: &str) -> Vec<String> {
        let tokens = word_tokens(doc);
        let (lo, hi) = self.ngram_range;

        let mut terms = Vec::new();
        for n in lo..=hi {
            if n > tokens.len() {
                break;
            }
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        terms
    }
}

/// Lowercased runs of two or more word characters.
pub fn word_tokens(doc: &str) -> Vec<String> {
    let lowered = doc.to_lowercase();
    lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::svm::KernelInput;

    fn docs() -> Vec<String> {
        vec![
            "great card great price".to_string(),
            "card stopped working".to_string(),
            "a b".to_string(),
        ]
    }

    #[test]
    fn test_word_tokens_drop_single_chars() {
        assert_eq!(word_tokens("A bc, DE_f 1 22"), vec!["bc", "de_f", "22"]);
    }

    #[test]
    fn test_idf_is_smoothed() {
        let mut v = TfidfVectorizer::new((1, 1));
        v.fit(&docs()).unwrap();
        // "card" appears in 2 of 3 docs: ln(4/3) + 1
        let expected = (4.0f64 / 3.0).ln() + 1.0;
        assert!((v.idf_of("card").unwrap() - expected).abs() < 1e-12);
        assert!(v.idf_of("a").is_none());
        assert_eq!(v.vocabulary_size(), 5);
    }

    #[test]
    fn test_rows_are_unit_norm() {
        let mut v = TfidfVectorizer::new((1, 2));
        let rows = v.fit_transform(&docs()).unwrap();
        assert!((rows[0].squared_norm() - 1.0).abs() < 1e-9);
        assert!((rows[1].squared_norm() - 1.0).abs() < 1e-9);
        // No usable tokens → zero row
        assert_eq!(rows[2].nnz(), 0);
    }

    #[test]
    fn test_bigrams_added() {
        let mut v = TfidfVectorizer::new((1, 2));
        v.fit(&docs()).unwrap();
        assert!(v.idf_of("great card").is_some());
        assert!(v.idf_of("stopped working").is_some());
    }

    #[test]
    fn test_empty_vocabulary_errors() {
        let mut v = TfidfVectorizer::new((1, 1));
        assert!(v.fit(&["a b c".to_string()]).is_err());
    }
}
