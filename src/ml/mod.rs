// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// Every classifier the comparison runs, plus how each is scored.
//
//   svm.rs         — smartcore C-SVC, one-vs-one multi-class, linear / RBF
//   grid_search.rs — TF-IDF + SVC pipeline tuned by stratified k-fold
//   evaluation.rs  — accuracy, weighted F1, confusion matrix
//
//   model.rs       — transformer encoder with a [CLS] classification head
//   trainer.rs     — Adam training loop over Burn DataLoaders
//   inferencer.rs  — batched arg-max prediction with a trained model
//   resolver.rs    — load weights when a checkpoint exists, train otherwise
//
// Burn code stays inside model.rs, trainer.rs and inferencer.rs
// (and the batcher that feeds them).
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)

/// CPU backend used for inference and tests
pub type InferBackend = burn::backend::NdArray;

/// InferBackend with gradient tracking, used for training
pub type TrainBackend = burn::backend::Autodiff<InferBackend>;

pub mod svm;
pub mod grid_search;
pub mod evaluation;

/// Transformer encoder sentiment classifier
pub mod model;

/// Training loop with per-epoch validation metrics
pub mod trainer;

/// Batched prediction over a ReviewDataset
pub mod inferencer;

/// Checkpoint-or-train decision
pub mod resolver;
