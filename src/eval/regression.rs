//! Regression metrics: RMSE, MAE, R²

/// Root mean squared error
pub fn rmse(y_pred: &[f64], y_true: &[f64]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len());
    if y_pred.is_empty() {
        return 0.0;
    }
    let mse: f64 = y_pred
        .iter()
        .zip(y_true.iter())
        .map(|(&p, &t)| (t - p).powi(2))
        .sum::<f64>()
        / y_pred.len() as f64;
    mse.sqrt()
}

/// Mean absolute error
pub fn mae(y_pred: &[f64], y_true: &[f64]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len());
    if y_pred.is_empty() {
        return 0.0;
    }
    y_pred
        .iter()
        .zip(y_true.iter())
        .map(|(&p, &t)| (t - p).abs())
        .sum::<f64>()
        / y_pred.len() as f64
}

/// R², the coefficient of determination.
///
/// 1.0 is a perfect fit, 0.0 is no better than predicting the mean.
/// Constant targets with a perfect prediction score 1.0; constant targets
/// with any residual score 0.0.
pub fn r_squared(y_pred: &[f64], y_true: &[f64]) -> f64 {
    assert_eq!(y_pred.len(), y_true.len());
    if y_pred.is_empty() {
        return 0.0;
    }

    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_res: f64 = y_pred
        .iter()
        .zip(y_true.iter())
        .map(|(&p, &t)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|&t| (t - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_prediction() {
        let y = vec![1.0, 2.0, 3.0];
        assert_relative_eq!(rmse(&y, &y), 0.0);
        assert_relative_eq!(mae(&y, &y), 0.0);
        assert_relative_eq!(r_squared(&y, &y), 1.0);
    }

    #[test]
    fn test_constant_offset() {
        let y_pred = vec![1.5, 2.5, 3.5];
        let y_true = vec![1.0, 2.0, 3.0];
        assert_relative_eq!(mae(&y_pred, &y_true), 0.5);
        assert_relative_eq!(rmse(&y_pred, &y_true), 0.5);
    }

    #[test]
    fn test_r_squared_mean_prediction_is_zero() {
        let y_true = vec![1.0, 2.0, 3.0];
        let y_pred = vec![2.0, 2.0, 2.0];
        assert_relative_eq!(r_squared(&y_pred, &y_true), 0.0);
    }

    #[test]
    fn test_r_squared_constant_targets() {
        let y_true = vec![4.0, 4.0, 4.0];
        assert_relative_eq!(r_squared(&[4.0, 4.0, 4.0], &y_true), 1.0);
        assert_relative_eq!(r_squared(&[4.0, 4.0, 5.0], &y_true), 0.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(rmse(&[], &[]), 0.0);
        assert_eq!(mae(&[], &[]), 0.0);
        assert_eq!(r_squared(&[], &[]), 0.0);
    }

    #[test]
    fn test_rmse_reference_value() {
        // Residuals (1, -1): MSE = 1, RMSE = 1
        let y_pred = vec![2.0, 1.0];
        let y_true = vec![1.0, 2.0];
        assert_relative_eq!(rmse(&y_pred, &y_true), 1.0);
    }
}
