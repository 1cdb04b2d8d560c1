// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything the transformer approach persists on disk:
//
//   checkpoint.rs      — weights (best_model.mpk) and the model
//                        architecture (model_config.json); merges an
//                        external checkpoint source into the directory
//
//   tokenizer_store.rs — word-level tokenizer built from training
//                        texts, saved next to the weights
//
//   metrics.rs         — per-epoch training metrics CSV
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving, loading and importing
pub mod checkpoint;

/// Tokenizer building, saving, and loading
pub mod tokenizer_store;

/// Training metrics CSV logger
pub mod metrics;
