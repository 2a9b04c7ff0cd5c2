//! Feature standardization for the linear regressor
//!
//! Per-column mean/std statistics fitted once on the regression training
//! split. Tree-based models never see scaled input; only the linear model
//! consumes standardized vectors.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Fitted per-column standardizer (population statistics, ddof = 0)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit column means and standard deviations on a training matrix.
    /// Zero-variance columns keep std 1 so they pass through centered.
    pub fn fit(x: &Array2<f64>) -> Self {
        let (rows, cols) = x.dim();
        let n = rows.max(1) as f64;

        let mut means = vec![0.0; cols];
        let mut stds = vec![1.0; cols];

        for c in 0..cols {
            let mut sum = 0.0;
            for r in 0..rows {
                sum += x[[r, c]];
            }
            let mean = sum / n;

            let mut sq = 0.0;
            for r in 0..rows {
                let d = x[[r, c]] - mean;
                sq += d * d;
            }
            let std = (sq / n).sqrt();

            means[c] = mean;
            stds[c] = if std > 0.0 { std } else { 1.0 };
        }

        Self { means, stds }
    }

    /// Standardize a single feature vector
    pub fn transform_row(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .zip(self.means.iter().zip(self.stds.iter()))
            .map(|(&v, (&m, &s))| (v - m) / s)
            .collect()
    }

    /// Standardize a whole matrix
    pub fn transform_matrix(&self, x: &Array2<f64>) -> Array2<f64> {
        let (rows, cols) = x.dim();
        Array2::from_shape_fn((rows, cols), |(r, c)| {
            (x[[r, c]] - self.means[c]) / self.stds[c]
        })
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }
}
