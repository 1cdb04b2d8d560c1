// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the pipeline stages:
//
//   ReviewSource  → anything that yields raw review rows
//   WeightStore   → anything that can hold a model's weights
//   ModelTrainer  → anything that can fit a model from scratch
//
// The application layer only talks to these traits, so the
// checkpoint-or-train decision can be exercised in tests with
// plain in-memory doubles instead of a real network.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

// ─── RawReview ────────────────────────────────────────────────────────────────
/// One dataset row before cleaning.
/// `text` is None when the review text cell was empty or missing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReview {
    pub rating: f64,
    pub text:   Option<String>,
}

// ─── ReviewSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the raw review rows.
///
/// Implementations:
///   - CsvReviewLoader → a local CSV file or a remote http(s) CSV
pub trait ReviewSource {
    fn load_all(&self) -> Result<Vec<RawReview>>;
}

// ─── WeightStore ──────────────────────────────────────────────────────────────
/// A place model weights can be restored from (and optionally saved to).
pub trait WeightStore<M> {
    /// True when a weights file is present. Existence only, no validation.
    fn has_weights(&self) -> bool;

    /// Load the stored weights into `model`.
    fn load_weights(&self, model: M) -> Result<M>;

    /// Persist the weights of `model`.
    fn save_weights(&self, model: &M) -> Result<()>;
}

// ─── ModelTrainer ─────────────────────────────────────────────────────────────
/// Fits a freshly initialised model and hands it back.
pub trait ModelTrainer<M> {
    fn train(&mut self, model: M) -> Result<M>;
}
