// ============================================================
// Feature Extraction Layer
// ============================================================
// Turns cleaned review text into vectors the SVMs can use:
//
//   tfidf.rs     — sparse bag-of-words (TF-IDF) rows
//   embedding.rs — dense mean-of-word-vector rows
//   scaler.rs    — column standardisation for dense rows
//   sparse.rs    — the sparse row type shared by the above

pub mod sparse;
pub mod tfidf;
pub mod embedding;
pub mod scaler;
