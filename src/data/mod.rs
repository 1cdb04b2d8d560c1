// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw CSV to tensor batches:
//
//   reviews CSV (file or URL)
//       │
//       ▼
//   CsvReviewLoader   → RawReview rows (rating + optional text)
//       │
//       ▼
//   Preprocessor      → Review (clean text, sentiment, word count)
//       │
//       ▼
//   split_train_test  → seeded train / test partitions
//       │
//       ├──► feature extractors (TF-IDF, word vectors)   [features]
//       │
//       ▼
//   encode_reviews    → ReviewSample (token ids + mask + label)
//       │
//       ▼
//   ReviewBatcher     → tensor batches for the transformer
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the reviews CSV from disk or over HTTP
pub mod loader;

/// Lowercasing, punctuation and stopword removal
pub mod preprocessor;

/// English stopword list
pub mod stopwords;

/// Seeded train/test split and stratified folds
pub mod splitter;

/// Implements Burn's Dataset trait for tokenised reviews
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
