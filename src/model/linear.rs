//! Ordinary least squares regression
//!
//! Solved in closed form via the normal equations on the intercept-augmented
//! design matrix. Expects standardized input; the trainer feeds it the
//! scaler's output at both fit and predict time.

use crate::error::{Error, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Tiny diagonal ridge that keeps the normal equations solvable when a
/// column is constant
const RIDGE: f64 = 1e-9;

/// Fitted linear model over standardized features
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    intercept: f64,
    coefficients: Vec<f64>,
}

impl LinearRegression {
    pub fn fit(x: &Array2<f64>, y: &[f64]) -> Result<Self> {
        let (n, d) = x.dim();
        if n == 0 || n != y.len() {
            return Err(Error::Internal(format!(
                "linear fit: {n} rows vs {} targets",
                y.len()
            )));
        }

        // Normal equations on [1 | X]: (AᵀA) w = Aᵀy
        let cols = d + 1;
        let mut ata = vec![vec![0.0; cols]; cols];
        let mut aty = vec![0.0; cols];

        for i in 0..n {
            let mut row = Vec::with_capacity(cols);
            row.push(1.0);
            for j in 0..d {
                row.push(x[[i, j]]);
            }
            for a in 0..cols {
                aty[a] += row[a] * y[i];
                for b in 0..cols {
                    ata[a][b] += row[a] * row[b];
                }
            }
        }
        for (j, row) in ata.iter_mut().enumerate() {
            row[j] += RIDGE;
        }

        let weights = solve(ata, aty)?;
        Ok(Self {
            intercept: weights[0],
            coefficients: weights[1..].to_vec(),
        })
    }

    pub fn predict(&self, features: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.iter())
                .map(|(&c, &f)| c * f)
                .sum::<f64>()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&r1, &r2| {
                a[r1][col]
                    .abs()
                    .partial_cmp(&a[r2][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        if a[pivot_row][col].abs() < 1e-12 {
            return Err(Error::Internal("singular design matrix".to_string()));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in row + 1..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }
    Ok(x)
}
