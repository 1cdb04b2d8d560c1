// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Two ways of partitioning data:
//
//   split_train_test  → seeded shuffle, then cut off a test tail
//                       (n_test = ceil(n * test_fraction))
//   stratified_folds  → assign each sample to one of k folds so
//                       every class is spread evenly over folds
//                       (used by cross-validated grid search)
//
// The shuffle is Fisher-Yates via rand::seq::SliceRandom over a
// StdRng seeded from the caller, so a given seed always gives the
// same partition.
//
// Reference: Rust Book §8 (Vectors)
//            rand crate documentation

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Seeded shuffle of `samples`, split into (train, test).
///
/// # Arguments
/// * `samples`       - All available samples (consumed by this function)
/// * `test_fraction` - Proportion held out for testing, e.g. 0.2 = 20%
/// * `seed`          - RNG seed; equal seeds give equal splits
pub fn split_train_test<T>(mut samples: Vec<T>, test_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = StdRng::seed_from_u64(seed);
    samples.shuffle(&mut rng);

    let total  = samples.len();
    let n_test = ((total as f64) * test_fraction.clamp(0.0, 1.0)).ceil() as usize;
    let n_test = n_test.min(total);

    // split_off(n) keeps [0..n) in `samples` and returns [n..total)
    let test = samples.split_off(total - n_test);

    tracing::debug!(
        "Dataset split: {} train, {} test (seed {})",
        samples.len(),
        test.len(),
        seed,
    );

    (samples, test)
}

/// Fold index (0..k) for each label, stratified by class.
///
/// Samples of each class are taken in their original order and
/// dealt into k contiguous blocks whose sizes differ by at most one,
/// so every fold sees roughly the same class proportions.
pub fn stratified_folds(labels: &[usize], k: usize) -> Vec<usize> {
    let k = k.max(1);
    let mut folds = vec![0usize; labels.len()];

    let num_classes = labels.iter().copied().max().map_or(0, |m| m + 1);
    for class in 0..num_classes {
        let members: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == class)
            .map(|(i, _)| i)
            .collect();

        let n = members.len();
        let mut start = 0;
        for fold in 0..k {
            // The first n % k folds take one extra sample
            let size = n / k + usize::from(fold < n % k);
            for &idx in &members[start..start + size] {
                folds[idx] = fold;
            }
            start += size;
        }
    }

    folds
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_correct_split_sizes() {
        let items: Vec<usize> = (0..100).collect();
        let (train, test) = split_train_test(items, 0.2, 42);
        assert_eq!(train.len(), 80);
        assert_eq!(test.len(), 20);
    }

    #[test]
    fn test_test_size_rounds_up() {
        let items: Vec<usize> = (0..11).collect();
        let (train, test) = split_train_test(items, 0.2, 42);
        assert_eq!(test.len(), 3);
        assert_eq!(train.len(), 8);
    }

    #[test]
    fn test_disjoint_and_complete() {
        let items: Vec<usize> = (0..50).collect();
        let (train, test) = split_train_test(items, 0.3, 7);
        let a: HashSet<_> = train.iter().collect();
        let b: HashSet<_> = test.iter().collect();
        assert!(a.is_disjoint(&b));
        assert_eq!(a.len() + b.len(), 50);
    }

    #[test]
    fn test_same_seed_same_split() {
        let (a, _) = split_train_test((0..40).collect::<Vec<_>>(), 0.2, 42);
        let (b, _) = split_train_test((0..40).collect::<Vec<_>>(), 0.2, 42);
        let (c, _) = split_train_test((0..40).collect::<Vec<_>>(), 0.2, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_dataset() {
        let (train, test) = split_train_test(Vec::<usize>::new(), 0.2, 42);
        assert!(train.is_empty());
        assert!(test.is_empty());
    }

    #[test]
    fn test_stratified_folds_balance_classes() {
        // 9 of class 0, 6 of class 1, interleaved
        let labels: Vec<usize> = (0..15).map(|i| if i % 5 < 3 { 0 } else { 1 }).collect();
        let folds = stratified_folds(&labels, 3);

        for fold in 0..3 {
            let c0 = (0..15).filter(|&i| folds[i] == fold && labels[i] == 0).count();
            let c1 = (0..15).filter(|&i| folds[i] == fold && labels[i] == 1).count();
            assert_eq!(c0, 3);
            assert_eq!(c1, 2);
        }
    }

    #[test]
    fn test_stratified_folds_uneven_class() {
        let labels = vec![0, 0, 0, 0, 1];
        let folds  = stratified_folds(&labels, 3);
        // Class 0 gets sizes 2,1,1; the single class-1 sample lands in fold 0
        assert_eq!(folds, vec![0, 0, 1, 2, 0]);
    }
}
