//! CART decision trees
//!
//! Axis-aligned binary trees grown greedily: gini impurity for
//! classification, variance reduction for regression. These are the
//! building blocks of the bagged forests and the boosted ensemble; they
//! are not registered as standalone ensemble members.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Gain below this threshold does not justify a split
const MIN_GAIN: f64 = 1e-12;

/// Growth limits shared by both tree kinds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features considered per split; `None` means all
    pub m_try: Option<usize>,
}

impl TreeConfig {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            min_samples_split: 2,
            m_try: None,
        }
    }

    pub fn with_m_try(mut self, m_try: usize) -> Self {
        self.m_try = Some(m_try);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum ClassNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<ClassNode>,
        right: Box<ClassNode>,
    },
    Leaf {
        /// Class probability distribution at this leaf
        probs: Vec<f64>,
    },
}

/// A single gini-split classification tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationTree {
    root: ClassNode,
    n_classes: usize,
}

impl ClassificationTree {
    /// Grow a tree on the rows named by `indices`. Returns the tree and
    /// its per-feature impurity-decrease importances (unnormalized).
    pub fn fit(
        x: &Array2<f64>,
        y: &[usize],
        indices: &[usize],
        n_classes: usize,
        config: &TreeConfig,
        rng: &mut StdRng,
    ) -> (Self, Vec<f64>) {
        let n_features = x.ncols();
        let mut builder = ClassTreeBuilder {
            x,
            y,
            n_classes,
            config,
            rng,
            importance: vec![0.0; n_features],
            n_total: indices.len().max(1) as f64,
        };
        let root = builder.grow(indices, 0);
        let importance = builder.importance;
        (Self { root, n_classes }, importance)
    }

    pub fn predict_proba(&self, features: &[f64]) -> &[f64] {
        let mut node = &self.root;
        loop {
            match node {
                ClassNode::Leaf { probs } => return probs,
                ClassNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn predict(&self, features: &[f64]) -> usize {
        argmax(self.predict_proba(features))
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }
}

struct ClassTreeBuilder<'a> {
    x: &'a Array2<f64>,
    y: &'a [usize],
    n_classes: usize,
    config: &'a TreeConfig,
    rng: &'a mut StdRng,
    importance: Vec<f64>,
    n_total: f64,
}

impl ClassTreeBuilder<'_> {
    fn grow(&mut self, indices: &[usize], depth: usize) -> ClassNode {
        let counts = self.class_counts(indices);
        let impurity = gini(&counts, indices.len());

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || impurity <= 0.0
        {
            return self.leaf(&counts, indices.len());
        }

        let features = candidate_features(self.x.ncols(), self.config.m_try, self.rng);
        let Some(split) = self.best_split(indices, &features, &counts, impurity) else {
            return self.leaf(&counts, indices.len());
        };

        self.importance[split.feature] +=
            (indices.len() as f64 / self.n_total) * split.gain;

        let (left_idx, right_idx) = partition(self.x, indices, split.feature, split.threshold);
        ClassNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(self.grow(&left_idx, depth + 1)),
            right: Box::new(self.grow(&right_idx, depth + 1)),
        }
    }

    fn leaf(&self, counts: &[usize], n: usize) -> ClassNode {
        let n = n.max(1) as f64;
        ClassNode::Leaf {
            probs: counts.iter().map(|&c| c as f64 / n).collect(),
        }
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &i in indices {
            counts[self.y[i]] += 1;
        }
        counts
    }

    fn best_split(
        &mut self,
        indices: &[usize],
        features: &[usize],
        counts: &[usize],
        parent_impurity: f64,
    ) -> Option<SplitChoice> {
        let n = indices.len() as f64;
        let mut best: Option<SplitChoice> = None;

        for &feature in features {
            let mut pairs: Vec<(f64, usize)> = indices
                .iter()
                .map(|&i| (self.x[[i, feature]], self.y[i]))
                .collect();
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let mut left = vec![0usize; self.n_classes];
            let mut right = counts.to_vec();

            for i in 0..pairs.len() - 1 {
                left[pairs[i].1] += 1;
                right[pairs[i].1] -= 1;
                if pairs[i].0 == pairs[i + 1].0 {
                    continue;
                }

                let n_left = (i + 1) as f64;
                let n_right = n - n_left;
                let weighted = (n_left * gini(&left, i + 1)
                    + n_right * gini(&right, pairs.len() - i - 1))
                    / n;
                let gain = parent_impurity - weighted;

                if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitChoice {
                        feature,
                        threshold: (pairs[i].0 + pairs[i + 1].0) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum RegNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<RegNode>,
        right: Box<RegNode>,
    },
    Leaf {
        value: f64,
    },
}

/// A single variance-split regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    root: RegNode,
}

impl RegressionTree {
    pub fn fit(
        x: &Array2<f64>,
        y: &[f64],
        indices: &[usize],
        config: &TreeConfig,
        rng: &mut StdRng,
    ) -> Self {
        let mut builder = RegTreeBuilder { x, y, config, rng };
        Self {
            root: builder.grow(indices, 0),
        }
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                RegNode::Leaf { value } => return *value,
                RegNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

struct RegTreeBuilder<'a> {
    x: &'a Array2<f64>,
    y: &'a [f64],
    config: &'a TreeConfig,
    rng: &'a mut StdRng,
}

impl RegTreeBuilder<'_> {
    fn grow(&mut self, indices: &[usize], depth: usize) -> RegNode {
        let (sum, sumsq) = self.moments(indices);
        let n = indices.len() as f64;
        let variance = variance_from_moments(sum, sumsq, n);

        if depth >= self.config.max_depth
            || indices.len() < self.config.min_samples_split
            || variance <= 0.0
        {
            return RegNode::Leaf {
                value: if indices.is_empty() { 0.0 } else { sum / n },
            };
        }

        let features = candidate_features(self.x.ncols(), self.config.m_try, self.rng);
        let Some(split) = self.best_split(indices, &features, sum, sumsq, variance) else {
            return RegNode::Leaf { value: sum / n };
        };

        let (left_idx, right_idx) = partition(self.x, indices, split.feature, split.threshold);
        RegNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(self.grow(&left_idx, depth + 1)),
            right: Box::new(self.grow(&right_idx, depth + 1)),
        }
    }

    fn moments(&self, indices: &[usize]) -> (f64, f64) {
        let mut sum = 0.0;
        let mut sumsq = 0.0;
        for &i in indices {
            sum += self.y[i];
            sumsq += self.y[i] * self.y[i];
        }
        (sum, sumsq)
    }

    fn best_split(
        &mut self,
        indices: &[usize],
        features: &[usize],
        total_sum: f64,
        total_sumsq: f64,
        parent_variance: f64,
    ) -> Option<SplitChoice> {
        let n = indices.len() as f64;
        let mut best: Option<SplitChoice> = None;

        for &feature in features {
            let mut pairs: Vec<(f64, f64)> = indices
                .iter()
                .map(|&i| (self.x[[i, feature]], self.y[i]))
                .collect();
            pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let mut left_sum = 0.0;
            let mut left_sumsq = 0.0;

            for i in 0..pairs.len() - 1 {
                left_sum += pairs[i].1;
                left_sumsq += pairs[i].1 * pairs[i].1;
                if pairs[i].0 == pairs[i + 1].0 {
                    continue;
                }

                let n_left = (i + 1) as f64;
                let n_right = n - n_left;
                let var_left = variance_from_moments(left_sum, left_sumsq, n_left);
                let var_right =
                    variance_from_moments(total_sum - left_sum, total_sumsq - left_sumsq, n_right);
                let weighted = (n_left * var_left + n_right * var_right) / n;
                let gain = parent_variance - weighted;

                if gain > MIN_GAIN && best.as_ref().map_or(true, |b| gain > b.gain) {
                    best = Some(SplitChoice {
                        feature,
                        threshold: (pairs[i].0 + pairs[i + 1].0) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

struct SplitChoice {
    feature: usize,
    threshold: f64,
    gain: f64,
}

fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}

fn variance_from_moments(sum: f64, sumsq: f64, n: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    let mean = sum / n;
    (sumsq / n - mean * mean).max(0.0)
}

fn partition(
    x: &Array2<f64>,
    indices: &[usize],
    feature: usize,
    threshold: f64,
) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for &i in indices {
        if x[[i, feature]] <= threshold {
            left.push(i);
        } else {
            right.push(i);
        }
    }
    (left, right)
}

/// Feature subset considered at one split: all features, or `m_try`
/// drawn without replacement.
fn candidate_features(n_features: usize, m_try: Option<usize>, rng: &mut StdRng) -> Vec<usize> {
    match m_try {
        None => (0..n_features).collect(),
        Some(m) => {
            let m = m.clamp(1, n_features);
            let mut features: Vec<usize> = (0..n_features).collect();
            for i in 0..m {
                let j = rng.random_range(i..n_features);
                features.swap(i, j);
            }
            features.truncate(m);
            features
        }
    }
}

/// Index of the maximum value; the first maximum wins ties, so lower
/// codes win by construction.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
