//! Model evaluation: classification and regression metrics, K-fold CV

mod classification;
mod kfold;
mod regression;

pub use classification::{classification_report, Average, ClassMetrics, ConfusionMatrix};
pub use kfold::{mean_std, KFold};
pub use regression::{mae, r_squared, rmse};
