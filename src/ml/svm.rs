// ============================================================
// Layer 5 — Support Vector Classifier
// ============================================================
// C-SVC built on smartcore's binary `SVC`.
//
// Multi-class: one-vs-one. One binary machine per class pair;
// each machine votes, the class with most votes wins and ties go
// to the lower class index.
//
// smartcore's optimiser only reads the first n_samples columns of
// a training row, and TF-IDF rows are much wider than that. Every
// sample is therefore handed over as a one-column row holding its
// id, and `RowKernel` evaluates the kernel on the real (sparse or
// dense) rows it keeps in a shared table. Training rows and query
// rows live in the same table.
//
//   linear  K(a, b) = a · b
//   rbf     K(a, b) = exp(-γ (‖a‖² + ‖b‖² − 2 a · b))
//
// γ is chosen from the training rows ("scale" heuristic):
//   γ = 1 / (n_features · Var(X))
// where Var(X) is taken over every entry, zeros included.
//
// Reference: Bordes et al. (2005) Fast Kernel Classifiers with
//            Online and Active Learning (smartcore's LaSVM solver)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use smartcore::{
    error::{Failed, FailedError},
    linalg::basic::matrix::DenseMatrix,
    svm::{
        svc::{SVCParameters, SVC},
        Kernel,
    },
};
use std::{fmt::Debug, sync::Arc};

/// A feature row the SVM can work with.
pub trait KernelInput {
    /// Inner product with another row of the same space
    fn inner(&self, other: &Self) -> f64;

    /// ‖x‖²
    fn squared_norm(&self) -> f64;

    /// Dimensionality of the space
    fn dims(&self) -> usize;

    /// Sum of all entries (zeros contribute nothing)
    fn value_sum(&self) -> f64;
}

impl KernelInput for ndarray::Array1<f64> {
    fn inner(&self, other: &Self) -> f64 {
        self.dot(other)
    }

    fn squared_norm(&self) -> f64 {
        self.dot(self)
    }

    fn dims(&self) -> usize {
        self.len()
    }

    fn value_sum(&self) -> f64 {
        self.sum()
    }
}

/// Kernel family, before γ has been fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KernelKind {
    Linear,
    Rbf,
}

impl std::fmt::Display for KernelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelKind::Linear => f.write_str("linear"),
            KernelKind::Rbf    => f.write_str("rbf"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SvcParams {
    /// Penalty on margin violations
    pub c: f64,

    pub kernel: KernelKind,

    /// Stopping tolerance of the solver
    pub tolerance: f64,

    /// Passes over the training rows per binary machine
    pub epochs: usize,

    /// Seed for the order the solver visits the rows in
    pub seed: u64,
}

impl SvcParams {
    pub fn new(c: f64, kernel: KernelKind) -> Self {
        Self { c, kernel, tolerance: 1e-3, epochs: 2, seed: 42 }
    }
}

impl Default for SvcParams {
    fn default() -> Self {
        Self::new(1.0, KernelKind::Rbf)
    }
}

type Parameters = SVCParameters<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Kernel over rows looked up by id.
#[derive(Debug, Clone)]
struct RowKernel<X> {
    rows:  Arc<Vec<X>>,
    norms: Arc<Vec<f64>>,
    gamma: Option<f64>,
}

impl<X: KernelInput> RowKernel<X> {
    fn new(rows: Vec<X>, gamma: Option<f64>) -> Self {
        let norms = rows.iter().map(|r| r.squared_norm()).collect();
        Self { rows: Arc::new(rows), norms: Arc::new(norms), gamma }
    }

    fn row_id(&self, v: &[f64]) -> Result<usize, Failed> {
        match v.first() {
            Some(&id) if id >= 0.0 && (id as usize) < self.rows.len() => Ok(id as usize),
            _ => Err(Failed::because(FailedError::ParametersError, "row id out of range")),
        }
    }
}

impl<X: KernelInput + Debug> Kernel for RowKernel<X> {
    fn apply(&self, x_i: &Vec<f64>, x_j: &Vec<f64>) -> Result<f64, Failed> {
        let (i, j) = (self.row_id(x_i)?, self.row_id(x_j)?);
        let dot = self.rows[i].inner(&self.rows[j]);
        Ok(match self.gamma {
            None        => dot,
            Some(gamma) => {
                let dist = (self.norms[i] + self.norms[j] - 2.0 * dot).max(0.0);
                (-gamma * dist).exp()
            }
        })
    }
}

fn id_matrix(ids: impl Iterator<Item = usize>) -> Result<DenseMatrix<f64>> {
    let rows: Vec<Vec<f64>> = ids.map(|i| vec![i as f64]).collect();
    DenseMatrix::from_2d_vec(&rows).context("Cannot build SVC input matrix")
}

/// Fit on rows `x` with class indices `y`, then predict a class index
/// for every row of `queries`.
pub fn fit_predict<X>(x: &[X], y: &[usize], queries: &[X], params: &SvcParams) -> Result<Vec<usize>>
where
    X: KernelInput + Clone + Debug + 'static,
{
    if x.len() != y.len() {
        bail!("{} samples but {} labels", x.len(), y.len());
    }
    if params.c <= 0.0 {
        bail!("C must be positive, got {}", params.c);
    }

    let num_classes = y.iter().copied().max().map_or(0, |m| m + 1);
    let present: Vec<usize> = (0..num_classes).filter(|c| y.contains(c)).collect();
    if present.len() < 2 {
        bail!("SVC needs at least two classes in the training data, got {}", present.len());
    }
    if queries.is_empty() {
        return Ok(Vec::new());
    }

    let gamma = match params.kernel {
        KernelKind::Linear => None,
        KernelKind::Rbf    => Some(scale_gamma(x)),
    };
    let table  = x.iter().chain(queries).cloned().collect();
    let kernel = RowKernel::new(table, gamma);
    let query_ids = id_matrix(x.len()..x.len() + queries.len())?;

    let mut votes = vec![vec![0usize; num_classes]; queries.len()];
    for (a, &pos) in present.iter().enumerate() {
        for &neg in &present[a + 1..] {
            let idx: Vec<usize> = (0..x.len())
                .filter(|&i| y[i] == pos || y[i] == neg)
                .collect();
            let signs: Vec<i32> = idx
                .iter()
                .map(|&i| if y[i] == pos { 1 } else { -1 })
                .collect();
            let ids = id_matrix(idx.iter().copied())?;

            let parameters: Parameters = SVCParameters::default()
                .with_c(params.c)
                .with_tol(params.tolerance)
                .with_epoch(params.epochs)
                .with_seed(Some(params.seed))
                .with_kernel(kernel.clone());

            let machine = SVC::fit(&ids, &signs, &parameters)
                .with_context(|| format!("SVC failed on classes {pos} vs {neg}"))?;
            let predicted = machine
                .predict(&query_ids)
                .with_context(|| format!("SVC prediction failed on classes {pos} vs {neg}"))?;

            for (tally, &sign) in votes.iter_mut().zip(&predicted) {
                tally[if sign > 0.0 { pos } else { neg }] += 1;
            }
        }
    }

    tracing::debug!(
        "SVC: {} machines over {} classes, kernel={}",
        present.len() * (present.len() - 1) / 2,
        present.len(),
        params.kernel
    );

    Ok(votes.iter().map(|tally| winner(tally)).collect())
}

/// Most votes; the lower class index wins a tie.
fn winner(tally: &[usize]) -> usize {
    let mut best = 0;
    for (class, &count) in tally.iter().enumerate() {
        if count > tally[best] {
            best = class;
        }
    }
    best
}

/// γ = 1 / (n_features · Var(X)), or 1.0 when the variance is zero.
pub fn scale_gamma<X: KernelInput>(x: &[X]) -> f64 {
    let dims = x.first().map_or(0, |v| v.dims());
    let entries = (x.len() * dims) as f64;
    if entries == 0.0 {
        return 1.0;
    }

    let sum:    f64 = x.iter().map(|v| v.value_sum()).sum();
    let sum_sq: f64 = x.iter().map(|v| v.squared_norm()).sum();
    let mean = sum / entries;
    let var  = sum_sq / entries - mean * mean;

    if var > 0.0 { 1.0 / (dims as f64 * var) } else { 1.0 }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::sparse::SparseVector;
    use ndarray::{array, Array1};

    fn blobs() -> (Vec<Array1<f64>>, Vec<usize>) {
        let x = vec![
            array![0.0, 0.0], array![0.3, -0.2], array![-0.2, 0.1],
            array![5.0, 5.0], array![5.2, 4.9], array![4.8, 5.1],
            array![0.0, 5.0], array![0.2, 5.2], array![-0.1, 4.8],
        ];
        let y = vec![0, 0, 0, 1, 1, 1, 2, 2, 2];
        (x, y)
    }

    #[test]
    fn test_linear_separates_two_classes() {
        let x = vec![array![-2.0], array![-1.5], array![-1.0], array![1.0], array![1.5], array![2.0]];
        let y = vec![0, 0, 0, 1, 1, 1];
        let params = SvcParams::new(10.0, KernelKind::Linear);
        let pred = fit_predict(&x, &y, &[array![-3.0], array![3.0]], &params).unwrap();
        assert_eq!(pred, vec![0, 1]);
    }

    #[test]
    fn test_one_vs_one_three_classes() {
        let (x, y) = blobs();
        let queries = vec![array![0.1, 0.0], array![4.9, 5.3], array![0.0, 4.9]];
        for kind in [KernelKind::Linear, KernelKind::Rbf] {
            let pred = fit_predict(&x, &y, &queries, &SvcParams::new(10.0, kind)).unwrap();
            assert_eq!(pred, vec![0, 1, 2], "kernel {kind}");
        }
    }

    #[test]
    fn test_rows_wider_than_sample_count() {
        // 4 samples over 1000 features; each class owns its own columns
        let row = |cols: &[usize]| SparseVector::from_pairs(1000, cols.iter().map(|&c| (c, 1.0)).collect());
        let x = vec![row(&[3, 700]), row(&[3, 950]), row(&[12, 801]), row(&[12, 999])];
        let y = vec![0, 0, 1, 1];
        let queries = vec![row(&[700, 950]), row(&[801, 999])];
        for kind in [KernelKind::Linear, KernelKind::Rbf] {
            let pred = fit_predict(&x, &y, &queries, &SvcParams::new(10.0, kind)).unwrap();
            assert_eq!(pred, vec![0, 1], "kernel {kind}");
        }
    }

    #[test]
    fn test_row_kernel_values() {
        let k = RowKernel::new(vec![array![1.0, 0.0], array![0.0, 1.0]], None);
        assert_eq!(k.apply(&vec![0.0], &vec![1.0]).unwrap(), 0.0);
        assert_eq!(k.apply(&vec![0.0], &vec![0.0]).unwrap(), 1.0);
        assert!(k.apply(&vec![2.0], &vec![0.0]).is_err());

        // ‖a − b‖² = 2 → exp(-1)
        let rbf = RowKernel::new(vec![array![1.0, 0.0], array![0.0, 1.0]], Some(0.5));
        assert!((rbf.apply(&vec![0.0], &vec![1.0]).unwrap() - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_ties_go_to_lower_class() {
        assert_eq!(winner(&[1, 1, 1]), 0);
        assert_eq!(winner(&[0, 2, 2]), 1);
        assert_eq!(winner(&[0, 1, 2]), 2);
    }

    #[test]
    fn test_scale_gamma() {
        // entries: 1, 0, 0, 1 → mean 0.5, var 0.25, dims 2 → γ = 2
        let x = vec![array![1.0, 0.0], array![0.0, 1.0]];
        assert!((scale_gamma(&x) - 2.0).abs() < 1e-12);

        let flat = vec![array![1.0, 1.0]];
        assert_eq!(scale_gamma(&flat), 1.0);
    }

    #[test]
    fn test_single_class_is_rejected() {
        let x = vec![array![1.0], array![2.0]];
        assert!(fit_predict(&x, &[1, 1], &x, &SvcParams::default()).is_err());
    }

    #[test]
    fn test_label_mismatch_is_rejected() {
        let x = vec![array![1.0]];
        assert!(fit_predict(&x, &[0, 1], &x, &SvcParams::default()).is_err());
    }
}
