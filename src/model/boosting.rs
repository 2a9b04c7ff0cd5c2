//! Gradient-boosted classification
//!
//! Multiclass boosting over shallow regression trees: each round fits one
//! tree per class to the negative gradient of the softmax cross-entropy
//! (observed one-hot minus current probability), and the per-class score
//! accumulates shrinkage-weighted tree outputs. Class scores start at the
//! log prior. The fit is fully deterministic: trees consider every feature
//! and split greedily.

use super::tree::{argmax, RegressionTree, TreeConfig};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Boosting fit parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostingConfig {
    pub n_rounds: usize,
    pub max_depth: usize,
    pub shrinkage: f64,
    pub seed: u64,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            n_rounds: 100,
            max_depth: 5,
            shrinkage: 0.1,
            seed: 42,
        }
    }
}

/// Boosted-trees area classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingClassifier {
    n_classes: usize,
    shrinkage: f64,
    /// Log-prior starting score per class
    init_scores: Vec<f64>,
    /// rounds[m][k] is the round-m tree for class k
    rounds: Vec<Vec<RegressionTree>>,
}

impl GradientBoostingClassifier {
    pub fn fit(x: &Array2<f64>, y: &[usize], n_classes: usize, config: &BoostingConfig) -> Self {
        let n = x.nrows();
        let indices: Vec<usize> = (0..n).collect();
        let tree_config = TreeConfig::new(config.max_depth);
        let mut rng = StdRng::seed_from_u64(config.seed);

        let init_scores = log_priors(y, n_classes);

        // Running per-sample, per-class scores
        let mut scores: Vec<Vec<f64>> = (0..n).map(|_| init_scores.clone()).collect();
        let mut rounds = Vec::with_capacity(config.n_rounds);
        let mut residuals = vec![0.0; n];

        for _ in 0..config.n_rounds {
            let mut round_trees = Vec::with_capacity(n_classes);

            let probs: Vec<Vec<f64>> = scores.iter().map(|s| softmax(s)).collect();

            for class in 0..n_classes {
                for i in 0..n {
                    let target = if y[i] == class { 1.0 } else { 0.0 };
                    residuals[i] = target - probs[i][class];
                }
                let tree = RegressionTree::fit(x, &residuals, &indices, &tree_config, &mut rng);
                for (i, score_row) in scores.iter_mut().enumerate() {
                    score_row[class] += config.shrinkage * tree.predict(&row(x, i));
                }
                round_trees.push(tree);
            }

            rounds.push(round_trees);
        }

        Self {
            n_classes,
            shrinkage: config.shrinkage,
            init_scores,
            rounds,
        }
    }

    /// Accumulated per-class scores for one feature vector
    fn decision_function(&self, features: &[f64]) -> Vec<f64> {
        let mut scores = self.init_scores.clone();
        for round in &self.rounds {
            for (class, tree) in round.iter().enumerate() {
                scores[class] += self.shrinkage * tree.predict(features);
            }
        }
        scores
    }

    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        softmax(&self.decision_function(features))
    }

    /// Ties resolve to the lowest class code
    pub fn predict(&self, features: &[f64]) -> usize {
        argmax(&self.decision_function(features))
    }

    pub fn n_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

fn row(x: &Array2<f64>, i: usize) -> Vec<f64> {
    x.row(i).to_vec()
}

fn log_priors(y: &[usize], n_classes: usize) -> Vec<f64> {
    let n = y.len().max(1) as f64;
    let mut counts = vec![0usize; n_classes];
    for &label in y {
        counts[label] += 1;
    }
    counts
        .iter()
        .map(|&c| ((c as f64 / n).max(1e-12)).ln())
        .collect()
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|&s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|&e| e / total).collect()
}
