use serde::{Deserialize, Serialize};

use crate::ml::svm::KernelInput;

/// A sparse row: sorted (feature index, value) pairs over `dim` features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    dim:     usize,
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from unsorted pairs. Zero values are dropped, duplicates summed.
    pub fn from_pairs(dim: usize, mut pairs: Vec<(usize, f64)>) -> Self {
        pairs.sort_by_key(|&(i, _)| i);

        let mut entries: Vec<(usize, f64)> = Vec::with_capacity(pairs.len());
        for (i, v) in pairs {
            debug_assert!(i < dim, "feature index {i} out of range {dim}");
            match entries.last_mut() {
                Some(last) if last.0 == i => last.1 += v,
                _ => entries.push((i, v)),
            }
        }
        entries.retain(|&(_, v)| v != 0.0);

        Self { dim, entries }
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    #[cfg(test)]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&index, |&(i, _)| i)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    /// Divide by the L2 norm in place. A zero vector stays zero.
    pub fn l2_normalize(&mut self) {
        let norm = self.squared_norm().sqrt();
        if norm > 0.0 {
            for e in &mut self.entries {
                e.1 /= norm;
            }
        }
    }
}

impl KernelInput for SparseVector {
    fn inner(&self, other: &Self) -> f64 {
        // Merge-join over the two sorted index lists
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j, mut acc) = (0, 0, 0.0);
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less    => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal   => {
                    acc += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        acc
    }

    fn squared_norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum()
    }

    fn dims(&self) -> usize {
        self.dim
    }

    fn value_sum(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v).sum()
    }
}
