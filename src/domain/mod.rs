// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs, enums and traits describing what the
// system works with. No burn types, no file I/O, no ML code.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// A cleaned, labelled review and the classification targets
pub mod review;

// Per-model evaluation result
pub mod score;

// Core abstractions (traits) that other layers implement
pub mod traits;
