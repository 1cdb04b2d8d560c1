// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds, saves and reloads the word-level tokenizer used by the
// transformer approach. The tokenizer lives next to the weights
// in the checkpoint directory, so a restored model is always paired
// with the vocabulary it was trained on.
//
// tokenizers 0.15 cannot train a WordLevel model through the
// generic trainer API without a ModelWrapper mismatch, so the
// tokenizer JSON is written directly and loaded back.
//
// The vocabulary is counted on the output of the same normalizer
// and pre-tokenizer that end up in the JSON. Anything the encoder
// will look up ("it’s" → it / ’ / s, "café" → cafe) is therefore a
// candidate word.
//
// Id layout (BERT convention):
//   [PAD] 0, [UNK] 1, [CLS] 101, [SEP] 102, [MASK] 103
//   corpus words from 104 upward, most frequent first
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{anyhow, Context, Result};
use std::{
    collections::HashMap,
    path::PathBuf,
};
use tokenizers::{
    normalizers::BertNormalizer,
    pre_tokenizers::whitespace::Whitespace,
    NormalizedString, Normalizer, OffsetReferential, OffsetType,
    PreTokenizedString, PreTokenizer, Tokenizer,
};

pub const TOKENIZER_FILE: &str = "tokenizer.json";

const SPECIAL_TOKENS: usize = 5;
const FIRST_WORD_ID:  usize = 104;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILE)
    }

    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    /// Load the saved tokenizer, or build one from `texts` and save it.
    pub fn load_or_build(
        &self,
        texts:      &[String],
        vocab_size: usize,
    ) -> Result<Tokenizer> {
        if self.exists() {
            tracing::info!("Loading existing tokenizer from '{}'", self.path().display());
            self.load()
        } else {
            tracing::info!("Building new tokenizer (vocab_size={})", vocab_size);
            self.build_and_save(texts, vocab_size)
        }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.path();
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }

    fn build_and_save(&self, texts: &[String], vocab_size: usize) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let normalizer    = BertNormalizer::default();
        let pre_tokenizer = Whitespace;
        let words = ranked_words(texts, vocab_size.saturating_sub(SPECIAL_TOKENS), &normalizer, &pre_tokenizer)?;

        let mut vocab = serde_json::json!({
            "[PAD]":  0,
            "[UNK]":  1,
            "[CLS]":  101,
            "[SEP]":  102,
            "[MASK]": 103,
        });

        let mut next_id = FIRST_WORD_ID;
        for word in &words {
            if vocab.get(word).is_none() {
                vocab[word] = serde_json::json!(next_id);
                next_id += 1;
            }
        }

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0,   "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 1,   "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 101, "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 102, "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 103, "content": "[MASK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": serde_json::to_value(normalizer)?,
            "pre_tokenizer": serde_json::to_value(pre_tokenizer)?,
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        let tok_path = self.path();
        std::fs::write(
            &tok_path,
            serde_json::to_string_pretty(&tokenizer_json)?
        ).with_context(|| format!("Cannot write tokenizer JSON to '{}'", tok_path.display()))?;

        tracing::info!(
            "Tokenizer built with {} words, saved to '{}'",
            next_id - FIRST_WORD_ID,
            tok_path.display()
        );

        Tokenizer::from_file(&tok_path)
            .map_err(|e| anyhow!("Cannot reload tokenizer: {e}"))
    }
}

/// Number of embedding rows needed to cover every id the tokenizer emits.
pub fn id_space(tokenizer: &Tokenizer) -> usize {
    tokenizer
        .get_vocab(true)
        .values()
        .max()
        .map_or(0, |&id| id as usize + 1)
}

/// Most frequent words first; ties broken alphabetically so the
/// vocabulary is the same on every run.
fn ranked_words(
    texts:         &[String],
    limit:         usize,
    normalizer:    &impl Normalizer,
    pre_tokenizer: &impl PreTokenizer,
) -> Result<Vec<String>> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for text in texts {
        let mut normalized = NormalizedString::from(text.as_str());
        normalizer
            .normalize(&mut normalized)
            .map_err(|e| anyhow!("Cannot normalize review text: {e}"))?;

        let mut pieces = PreTokenizedString::from(normalized);
        pre_tokenizer
            .pre_tokenize(&mut pieces)
            .map_err(|e| anyhow!("Cannot pre-tokenize review text: {e}"))?;

        for (word, _, _) in pieces.get_splits(OffsetReferential::Original, OffsetType::Byte) {
            *freq.entry(word.to_string()).or_insert(0) += 1;
        }
    }

    let mut words: Vec<(String, usize)> = freq.into_iter().collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    words.truncate(limit);
    Ok(words.into_iter().map(|(w, _)| w).collect())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn texts() -> Vec<String> {
        vec!["great phone great battery".into(), "bad battery".into()]
    }

    fn ranked(texts: &[String], limit: usize) -> Vec<String> {
        ranked_words(texts, limit, &BertNormalizer::default(), &Whitespace).unwrap()
    }

    #[test]
    fn test_ranked_words_frequency_then_alpha() {
        assert_eq!(ranked(&texts(), 10), vec!["battery", "great", "bad", "phone"]);
        assert_eq!(ranked(&texts(), 2), vec!["battery", "great"]);
    }

    #[test]
    fn test_ranked_words_split_like_the_encoder() {
        let words = ranked(&["It’s a Café!".to_string()], 10);
        assert_eq!(words, vec!["!", "a", "cafe", "it", "s", "’"]);
    }

    #[test]
    fn test_punctuation_and_accents_are_in_vocabulary() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path().to_string_lossy());
        let text  = "it’s great café really… five stars".to_string();

        let tok = store.load_or_build(&[text.clone()], 100).unwrap();
        let enc = tok.encode(text.as_str(), false).unwrap();
        assert!(!enc.get_ids().is_empty());
        assert!(!enc.get_ids().contains(&1), "unexpected [UNK] in {:?}", enc.get_tokens());
    }

    #[test]
    fn test_build_then_reload() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path().to_string_lossy());
        assert!(!store.exists());

        let tok = store.load_or_build(&texts(), 100).unwrap();
        assert!(store.exists());
        assert_eq!(tok.token_to_id("battery"), Some(104));
        assert_eq!(tok.token_to_id("[CLS]"), Some(101));
        assert_eq!(id_space(&tok), 108);

        // the saved file wins over a different corpus
        let again = store.load_or_build(&["other words".to_string()], 100).unwrap();
        assert_eq!(again.token_to_id("battery"), Some(104));
        assert_eq!(again.token_to_id("other"), None);
    }

    #[test]
    fn test_unknown_words_map_to_unk() {
        let dir   = tempfile::tempdir().unwrap();
        let store = TokenizerStore::new(dir.path().to_string_lossy());
        let tok   = store.load_or_build(&texts(), 100).unwrap();
        let enc   = tok.encode("great zebra", false).unwrap();
        assert_eq!(enc.get_ids(), &[105, 1]);
    }
}
