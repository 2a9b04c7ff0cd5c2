//! Train/test index splitting

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

fn shuffle(indices: &mut [usize], rng: &mut StdRng) {
    for i in (1..indices.len()).rev() {
        let j = rng.random_range(0..=i);
        indices.swap(i, j);
    }
}

/// Plain shuffled split: `test_ratio` of the samples go to the test set
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffle(&mut indices, &mut rng);

    let n_test = ((n as f64) * test_ratio).round() as usize;
    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    (train, test)
}

/// Stratified split: each class contributes `test_ratio` of its members to
/// the test set, with at least one member kept on each side when the class
/// has two or more.
pub fn stratified_split(y: &[usize], test_ratio: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &label) in y.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for (_, mut members) in by_class {
        shuffle(&mut members, &mut rng);
        let n_class = members.len();
        let n_test = if n_class < 2 {
            0
        } else {
            (((n_class as f64) * test_ratio).round() as usize).clamp(1, n_class - 1)
        };
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }

    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_split_sizes_and_coverage() {
        let (train, test) = train_test_split(100, 0.2, 42);
        assert_eq!(test.len(), 20);
        assert_eq!(train.len(), 80);

        let mut all: Vec<usize> = train.iter().chain(test.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_plain_split_deterministic() {
        assert_eq!(train_test_split(50, 0.2, 7), train_test_split(50, 0.2, 7));
        assert_ne!(train_test_split(50, 0.2, 7), train_test_split(50, 0.2, 8));
    }

    #[test]
    fn test_stratified_split_preserves_class_shares() {
        // 40 of class 0, 40 of class 1, 20 of class 2
        let mut y = vec![0usize; 40];
        y.extend(vec![1usize; 40]);
        y.extend(vec![2usize; 20]);

        let (train, test) = stratified_split(&y, 0.2, 42);
        assert_eq!(train.len() + test.len(), 100);

        for class in 0..3 {
            let in_test = test.iter().filter(|&&i| y[i] == class).count();
            let total = y.iter().filter(|&&l| l == class).count();
            assert_eq!(in_test, total / 5, "class {class} share off");
        }
    }

    #[test]
    fn test_stratified_split_singleton_class_stays_in_train() {
        let y = vec![0, 0, 0, 0, 1];
        let (train, test) = stratified_split(&y, 0.2, 42);
        assert!(train.contains(&4));
        assert!(!test.contains(&4));
    }

    #[test]
    fn test_stratified_split_keeps_one_test_member_for_small_classes() {
        let y = vec![0, 0, 1, 1];
        let (_, test) = stratified_split(&y, 0.2, 42);
        // Rounding would give zero; the floor of one applies per class
        assert_eq!(test.len(), 2);
    }
}
