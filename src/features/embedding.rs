// ============================================================
// Feature Extraction — Word Vectors
// ============================================================
// Dense document embeddings: the mean of the word vectors of a
// document's tokens, or the zero vector if no token is known.
//
// Two sources of word vectors:
//
//   Table   → loaded from a text vectors file, one word per line:
//               word v1 v2 ... vD
//             An optional word2vec-style "count dim" header line
//             is skipped.
//
//   Hashed  → random indexing: every word gets a fixed random
//             vector in [-1, 1]^D drawn from an RNG seeded by the
//             word's FNV-1a hash. Needs no external file.

use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

pub enum WordVectors {
    Table {
        dim:   usize,
        table: HashMap<String, Vec<f64>>,
    },
    Hashed {
        dim:  usize,
        seed: u64,
    },
}

impl WordVectors {
    /// Random-indexing vectors of dimension `dim`
    pub fn hashed(dim: usize, seed: u64) -> Self {
        WordVectors::Hashed { dim: dim.max(1), seed }
    }

    /// Load a GloVe / word2vec text vectors file.
    pub fn from_text_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Cannot open word vectors '{}'", path.display()))?;
        let vectors = Self::parse(BufReader::new(file))
            .with_context(|| format!("Cannot parse word vectors '{}'", path.display()))?;

        tracing::info!("Loaded {} word vectors (dim={}) from '{}'", vectors.len(), vectors.dim(), path.display());
        Ok(vectors)
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut table: HashMap<String, Vec<f64>> = HashMap::new();
        let mut dim: Option<usize> = None;

        for (n, line) in reader.lines().enumerate() {
            let line  = line?;
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            // word2vec header: "<count> <dim>"
            if n == 0 && parts.len() == 2 && parts.iter().all(|p| p.parse::<usize>().is_ok()) {
                continue;
            }

            let values: Vec<f64> = parts[1..]
                .iter()
                .map(|p| p.parse::<f64>())
                .collect::<std::result::Result<_, _>>()
                .with_context(|| format!("Non-numeric value on line {}", n + 1))?;

            match dim {
                None => dim = Some(values.len()),
                Some(d) if d != values.len() => {
                    bail!("Line {} has {} values, expected {}", n + 1, values.len(), d)
                }
                Some(_) => {}
            }

            table.insert(parts[0].to_string(), values);
        }

        match dim {
            Some(dim) if dim > 0 => Ok(WordVectors::Table { dim, table }),
            _ => bail!("No word vectors found"),
        }
    }

    pub fn dim(&self) -> usize {
        match self {
            WordVectors::Table { dim, .. } | WordVectors::Hashed { dim, .. } => *dim,
        }
    }

    /// Number of stored words (hashed vectors have no fixed vocabulary)
    pub fn len(&self) -> usize {
        match self {
            WordVectors::Table { table, .. } => table.len(),
            WordVectors::Hashed { .. } => 0,
        }
    }

    pub fn word_vector(&self, word: &str) -> Option<Vec<f64>> {
        match self {
            WordVectors::Table { table, .. } => table.get(word).cloned(),
            WordVectors::Hashed { dim, seed } => {
                let mut rng = StdRng::seed_from_u64(fnv1a(word) ^ seed);
                Some((0..*dim).map(|_| rng.gen_range(-1.0..=1.0)).collect())
            }
        }
    }

    /// Mean of the known word vectors; zeros when none are known.
    pub fn document_vector(&self, text: &str) -> Array1<f64> {
        let mut acc   = Array1::<f64>::zeros(self.dim());
        let mut known = 0usize;

        for word in text.split_whitespace() {
            if let Some(v) = self.word_vector(word) {
                acc += &Array1::from(v);
                known += 1;
            }
        }

        if known > 0 {
            acc /= known as f64;
        }
        acc
    }

    /// One row per text.
    pub fn embed_all(&self, texts: &[String]) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((texts.len(), self.dim()));
        for (mut row, text) in out.rows_mut().into_iter().zip(texts) {
            row.assign(&self.document_vector(text));
        }
        out
    }
}

/// 64-bit FNV-1a: stable across runs and platforms.
fn fnv1a(word: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME:  u64 = 0x0000_0100_0000_01b3;
    word.bytes().fold(OFFSET, |h, b| (h ^ b as u64).wrapping_mul(PRIME))
}
