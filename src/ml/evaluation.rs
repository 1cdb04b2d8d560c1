// ============================================================
// Layer 5 — Classification Metrics
// ============================================================
//   accuracy     = correct / total
//   F1 (class k) = 2·P·R / (P + R), 0 when P + R = 0
//   weighted F1  = Σ_k support_k · F1_k / Σ_k support_k
//
// Classes with no true samples get weight zero in the weighted F1.

/// Fraction of positions where `y_pred` equals `y_true`.
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// counts[true][pred] over `num_classes` classes.
pub fn confusion_matrix(y_true: &[usize], y_pred: &[usize], num_classes: usize) -> Vec<Vec<usize>> {
    let mut counts = vec![vec![0usize; num_classes]; num_classes];
    for (&t, &p) in y_true.iter().zip(y_pred) {
        if t < num_classes && p < num_classes {
            counts[t][p] += 1;
        }
    }
    counts
}

/// Per-class F1 from a confusion matrix.
pub fn f1_per_class(matrix: &[Vec<usize>]) -> Vec<f64> {
    let n = matrix.len();
    (0..n)
        .map(|k| {
            let tp        = matrix[k][k] as f64;
            let predicted = (0..n).map(|r| matrix[r][k]).sum::<usize>() as f64;
            let actual    = matrix[k].iter().sum::<usize>() as f64;

            let precision = if predicted > 0.0 { tp / predicted } else { 0.0 };
            let recall    = if actual > 0.0 { tp / actual } else { 0.0 };

            if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            }
        })
        .collect()
}

/// Support-weighted mean of per-class F1.
pub fn f1_weighted(y_true: &[usize], y_pred: &[usize]) -> f64 {
    let num_classes = y_true
        .iter()
        .chain(y_pred)
        .copied()
        .max()
        .map_or(0, |m| m + 1);
    let matrix = confusion_matrix(y_true, y_pred, num_classes);
    let f1     = f1_per_class(&matrix);

    let total: usize = matrix.iter().map(|row| row.iter().sum::<usize>()).sum();
    if total == 0 {
        return 0.0;
    }

    matrix
        .iter()
        .zip(&f1)
        .map(|(row, f)| row.iter().sum::<usize>() as f64 * f)
        .sum::<f64>()
        / total as f64
}

/// Predictions of one approach together with the truth they are scored against.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub y_true:      Vec<usize>,
    pub y_pred:      Vec<usize>,
    pub num_classes: usize,
}

impl Evaluation {
    pub fn new(y_true: Vec<usize>, y_pred: Vec<usize>, num_classes: usize) -> Self {
        Self { y_true, y_pred, num_classes }
    }

    pub fn accuracy(&self) -> f64 {
        accuracy(&self.y_true, &self.y_pred)
    }

    pub fn f1_weighted(&self) -> f64 {
        f1_weighted(&self.y_true, &self.y_pred)
    }

    pub fn confusion(&self) -> Vec<Vec<usize>> {
        confusion_matrix(&self.y_true, &self.y_pred, self.num_classes)
    }

    pub fn len(&self) -> usize {
        self.y_true.len()
    }
}
