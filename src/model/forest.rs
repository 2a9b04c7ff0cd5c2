//! Bagged tree ensembles
//!
//! Bootstrap-sampled CART forests. The classifier subsamples sqrt(d)
//! features per split; the regressor considers every feature. All
//! randomness flows from one seeded generator, so a fit is reproducible
//! for a given configuration and corpus.

use super::tree::{argmax, ClassificationTree, RegressionTree, TreeConfig};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Forest fitting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            seed: 42,
        }
    }
}

/// Bagging-of-trees area classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<ClassificationTree>,
    n_classes: usize,
    feature_importances: Vec<f64>,
}

impl RandomForestClassifier {
    pub fn fit(x: &Array2<f64>, y: &[usize], n_classes: usize, config: &ForestConfig) -> Self {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        let m_try = ((n_features as f64).sqrt().floor() as usize).max(1);
        let tree_config = TreeConfig::new(config.max_depth).with_m_try(m_try);

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut trees = Vec::with_capacity(config.n_trees);
        let mut importances = vec![0.0; n_features];

        for _ in 0..config.n_trees {
            let sample = bootstrap_indices(&mut rng, n_samples);
            let (tree, tree_importance) =
                ClassificationTree::fit(x, y, &sample, n_classes, &tree_config, &mut rng);

            // Average of per-tree normalized importances
            let total: f64 = tree_importance.iter().sum();
            if total > 0.0 {
                for (acc, v) in importances.iter_mut().zip(tree_importance.iter()) {
                    *acc += v / total;
                }
            }
            trees.push(tree);
        }

        let n_trees = trees.len().max(1) as f64;
        for v in &mut importances {
            *v /= n_trees;
        }

        Self {
            trees,
            n_classes,
            feature_importances: importances,
        }
    }

    /// Majority vote; ties resolve to the lowest class code
    pub fn predict(&self, features: &[f64]) -> usize {
        argmax(&self.predict_proba(features))
    }

    /// Fraction of trees voting for each class
    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        let mut votes = vec![0.0; self.n_classes];
        for tree in &self.trees {
            votes[tree.predict(features)] += 1.0;
        }
        let n = self.trees.len().max(1) as f64;
        for v in &mut votes {
            *v /= n;
        }
        votes
    }

    /// Normalized mean impurity-decrease per feature
    pub fn feature_importances(&self) -> &[f64] {
        &self.feature_importances
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

/// Bagging-of-trees adequacy regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    pub fn fit(x: &Array2<f64>, y: &[f64], config: &ForestConfig) -> Self {
        let n_samples = x.nrows();
        let tree_config = TreeConfig::new(config.max_depth);

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut trees = Vec::with_capacity(config.n_trees);

        for _ in 0..config.n_trees {
            let sample = bootstrap_indices(&mut rng, n_samples);
            trees.push(RegressionTree::fit(x, y, &sample, &tree_config, &mut rng));
        }

        Self { trees }
    }

    /// Mean of per-tree predictions
    pub fn predict(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        self.trees.iter().map(|t| t.predict(features)).sum::<f64>() / self.trees.len() as f64
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn bootstrap_indices(rng: &mut StdRng, n: usize) -> Vec<usize> {
    (0..n).map(|_| rng.random_range(0..n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn separable_classification() -> (Array2<f64>, Vec<usize>) {
        // Two clusters along the first feature
        let mut flat = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            flat.extend_from_slice(&[i as f64 * 0.01, 1.0]);
            y.push(0);
        }
        for i in 0..20 {
            flat.extend_from_slice(&[5.0 + i as f64 * 0.01, 1.0]);
            y.push(1);
        }
        (Array2::from_shape_vec((40, 2), flat).unwrap(), y)
    }

    #[test]
    fn test_forest_classifier_learns_separable_data() {
        let (x, y) = separable_classification();
        let config = ForestConfig {
            n_trees: 12,
            max_depth: 4,
            seed: 42,
        };
        let forest = RandomForestClassifier::fit(&x, &y, 2, &config);

        assert_eq!(forest.predict(&[0.05, 1.0]), 0);
        assert_eq!(forest.predict(&[5.05, 1.0]), 1);
        assert_eq!(forest.n_trees(), 12);

        let probs = forest.predict_proba(&[0.05, 1.0]);
        assert_eq!(probs.len(), 2);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(probs[0] > 0.9);
    }

    #[test]
    fn test_forest_fit_is_deterministic() {
        let (x, y) = separable_classification();
        let config = ForestConfig {
            n_trees: 8,
            max_depth: 4,
            seed: 7,
        };
        let a = RandomForestClassifier::fit(&x, &y, 2, &config);
        let b = RandomForestClassifier::fit(&x, &y, 2, &config);
        assert_eq!(a, b);
    }

    #[test]
    fn test_feature_importance_favors_informative_feature() {
        let (x, y) = separable_classification();
        let config = ForestConfig {
            n_trees: 20,
            max_depth: 4,
            seed: 42,
        };
        let forest = RandomForestClassifier::fit(&x, &y, 2, &config);
        let importances = forest.feature_importances();

        // Feature 0 separates the classes, feature 1 is constant
        assert!(importances[0] > importances[1]);
        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_forest_regressor_recovers_step() {
        let mut flat = Vec::new();
        let mut y = Vec::new();
        for i in 0..25 {
            flat.push(i as f64 * 0.1);
            y.push(10.0);
        }
        for i in 0..25 {
            flat.push(8.0 + i as f64 * 0.1);
            y.push(90.0);
        }
        let x = Array2::from_shape_vec((50, 1), flat).unwrap();

        let config = ForestConfig {
            n_trees: 15,
            max_depth: 4,
            seed: 42,
        };
        let forest = RandomForestRegressor::fit(&x, &y, &config);

        assert!((forest.predict(&[1.0]) - 10.0).abs() < 5.0);
        assert!((forest.predict(&[9.0]) - 90.0).abs() < 5.0);
    }

    #[test]
    fn test_bootstrap_indices_in_range() {
        let mut rng = StdRng::seed_from_u64(1);
        let sample = bootstrap_indices(&mut rng, 30);
        assert_eq!(sample.len(), 30);
        assert!(sample.iter().all(|&i| i < 30));
    }
}
