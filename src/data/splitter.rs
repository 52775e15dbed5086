// ============================================================
// Layer 4 — Stratified Train/Test Splitter
// ============================================================
// Splits row indices into train and test partitions so that
// every label keeps (approximately) its share in both.
//
// The recipe (fraction, seed, stratify-by-category) is a
// contract between training and evaluation: evaluation calls
// this function with the same recipe and must get the exact
// same test partition back.
//
// Algorithm:
//   1. Group indices by label (ascending label order)
//   2. n_test = ceil(test_fraction * n)
//   3. Give each label floor(count * n_test / n) test slots,
//      then hand leftover slots to the largest remainders
//   4. Shuffle each label's indices with one ChaCha8 RNG seeded
//      from the recipe; the first k go to test
//   5. Return both partitions in ascending index order

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::error::PipelineError;

/// Fraction and seed shared by training and evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitRecipe {
    pub test_fraction: f64,
    pub seed:          u64,
}

impl Default for SplitRecipe {
    fn default() -> Self {
        Self { test_fraction: 0.2, seed: 42 }
    }
}

/// Row indices of each partition, ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test:  Vec<usize>,
}

/// Stratified split of `labels` by `recipe`.
///
/// Fails with `InsufficientData` instead of falling back to an
/// unstratified split.
pub fn stratified_split(labels: &[i64], recipe: &SplitRecipe) -> Result<SplitIndices, PipelineError> {
    let n = labels.len();
    if n == 0 {
        return Err(PipelineError::InsufficientData("dataset is empty".to_string()));
    }

    let mut classes: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        classes.entry(label).or_default().push(i);
    }

    if let Some((label, members)) = classes.iter().find(|(_, m)| m.len() < 2) {
        return Err(PipelineError::InsufficientData(format!(
            "the least populated class ({label}) has only {} member; \
             every class needs at least 2 for a stratified split",
            members.len()
        )));
    }

    let n_test    = ((recipe.test_fraction * n as f64).ceil() as usize).min(n);
    let n_train   = n - n_test;
    let n_classes = classes.len();
    if n_test < n_classes {
        return Err(PipelineError::InsufficientData(format!(
            "test size {n_test} is smaller than the number of classes {n_classes}"
        )));
    }
    if n_train < n_classes {
        return Err(PipelineError::InsufficientData(format!(
            "train size {n_train} is smaller than the number of classes {n_classes}"
        )));
    }

    let allocation = allocate_test_slots(&classes, n, n_test);

    let mut rng   = ChaCha8Rng::seed_from_u64(recipe.seed);
    let mut train = Vec::with_capacity(n_train);
    let mut test  = Vec::with_capacity(n_test);

    for ((_, members), k) in classes.into_iter().zip(allocation) {
        let mut members = members;
        members.shuffle(&mut rng);
        test.extend_from_slice(&members[..k]);
        train.extend_from_slice(&members[k..]);
    }

    train.sort_unstable();
    test.sort_unstable();

    tracing::debug!(
        "Stratified split: {} train, {} test across {} classes (seed={})",
        train.len(),
        test.len(),
        n_classes,
        recipe.seed,
    );

    Ok(SplitIndices { train, test })
}

/// Test slots per class, in the map's (ascending label) order.
/// Sums to exactly `n_test`.
fn allocate_test_slots(classes: &BTreeMap<i64, Vec<usize>>, n: usize, n_test: usize) -> Vec<usize> {
    let shares: Vec<f64> = classes
        .values()
        .map(|m| m.len() as f64 * n_test as f64 / n as f64)
        .collect();

    let mut slots: Vec<usize> = shares.iter().map(|s| s.floor() as usize).collect();
    let assigned: usize = slots.iter().sum();

    // Leftover slots go to the largest fractional remainders;
    // ties prefer the bigger class, then the smaller label.
    let mut order: Vec<(usize, f64, usize)> = classes
        .values()
        .zip(&shares)
        .enumerate()
        .map(|(i, (m, s))| (i, s - s.floor(), m.len()))
        .collect();
    order.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then(b.2.cmp(&a.2))
            .then(a.0.cmp(&b.0))
    });

    for &(i, _, _) in order.iter().take(n_test.saturating_sub(assigned)) {
        slots[i] += 1;
    }
    slots
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    const TEN: [i64; 10] = [1, 0, 1, 1, 0, 1, 0, 1, 0, 1];

    #[test]
    fn test_ten_rows_gives_two_test_rows_one_per_class() {
        let split = stratified_split(&TEN, &SplitRecipe::default()).unwrap();
        assert_eq!(split.test.len(), 2);
        assert_eq!(split.train.len(), 8);

        let mut test_labels: Vec<i64> = split.test.iter().map(|&i| TEN[i]).collect();
        test_labels.sort();
        assert_eq!(test_labels, vec![0, 1]);
    }

    #[test]
    fn test_same_recipe_same_partition() {
        let labels: Vec<i64> = (0..200).map(|i| (i % 3) as i64).collect();
        let a = stratified_split(&labels, &SplitRecipe::default()).unwrap();
        let b = stratified_split(&labels, &SplitRecipe::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_changes_partition() {
        let labels: Vec<i64> = (0..200).map(|i| (i % 2) as i64).collect();
        let a = stratified_split(&labels, &SplitRecipe::default()).unwrap();
        let b = stratified_split(&labels, &SplitRecipe { seed: 7, ..SplitRecipe::default() }).unwrap();
        assert_eq!(a.test.len(), b.test.len());
        assert_ne!(a.test, b.test);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let labels: Vec<i64> = (0..97).map(|i| (i % 4) as i64).collect();
        let split = stratified_split(&labels, &SplitRecipe::default()).unwrap();

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..97).collect::<Vec<_>>());
        assert_eq!(split.test.len(), 20); // ceil(0.2 * 97)
    }

    #[test]
    fn test_class_proportions_preserved() {
        // 80 of label 0, 20 of label 1 → 16 + 4 in test
        let labels: Vec<i64> = (0..100).map(|i| if i < 80 { 0 } else { 1 }).collect();
        let split = stratified_split(&labels, &SplitRecipe::default()).unwrap();
        let ones  = split.test.iter().filter(|&&i| labels[i] == 1).count();
        assert_eq!(split.test.len(), 20);
        assert_eq!(ones, 4);
    }

    #[test]
    fn test_singleton_class_is_insufficient() {
        let labels = [0, 0, 0, 0, 1];
        let err = stratified_split(&labels, &SplitRecipe::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientData(_)));
    }

    #[test]
    fn test_too_few_rows_for_classes_is_insufficient() {
        // n_test = ceil(0.2 * 4) = 1 < 2 classes
        let labels = [0, 0, 1, 1];
        let err = stratified_split(&labels, &SplitRecipe::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientData(_)));
    }

    #[test]
    fn test_empty_is_insufficient() {
        assert!(stratified_split(&[], &SplitRecipe::default()).is_err());
    }
}
