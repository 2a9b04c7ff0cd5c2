//! Ensemble model types
//!
//! The ensemble holds an ordered collection of named model entries, each
//! exposing a uniform capability (`predict`, and `predict_proba` for
//! classifiers). Adding another algorithm means adding an enum variant;
//! the consolidation logic never changes.

mod boosting;
mod forest;
mod linear;
mod tree;

pub use boosting::{BoostingConfig, GradientBoostingClassifier};
pub use forest::{ForestConfig, RandomForestClassifier, RandomForestRegressor};
pub use linear::LinearRegression;
pub use tree::{ClassificationTree, RegressionTree, TreeConfig};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which task a trained model serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    Classification,
    Regression,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Classification => write!(f, "classification"),
            ModelKind::Regression => write!(f, "regression"),
        }
    }
}

/// Any trained area classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassifierModel {
    RandomForest(RandomForestClassifier),
    GradientBoosting(GradientBoostingClassifier),
}

impl ClassifierModel {
    pub fn predict(&self, features: &[f64]) -> usize {
        match self {
            ClassifierModel::RandomForest(m) => m.predict(features),
            ClassifierModel::GradientBoosting(m) => m.predict(features),
        }
    }

    pub fn predict_proba(&self, features: &[f64]) -> Vec<f64> {
        match self {
            ClassifierModel::RandomForest(m) => m.predict_proba(features),
            ClassifierModel::GradientBoosting(m) => m.predict_proba(features),
        }
    }

    pub fn n_classes(&self) -> usize {
        match self {
            ClassifierModel::RandomForest(m) => m.n_classes(),
            ClassifierModel::GradientBoosting(m) => m.n_classes(),
        }
    }
}

/// Any trained adequacy regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegressorModel {
    RandomForest(RandomForestRegressor),
    Linear(LinearRegression),
}

impl RegressorModel {
    pub fn predict(&self, features: &[f64]) -> f64 {
        match self {
            RegressorModel::RandomForest(m) => m.predict(features),
            RegressorModel::Linear(m) => m.predict(features),
        }
    }

    /// Whether this model expects the scaler's output. Tree models always
    /// take the raw feature vector.
    pub fn needs_scaled_input(&self) -> bool {
        matches!(self, RegressorModel::Linear(_))
    }
}

/// A named, registered classifier. Registration order is the consolidation
/// tie-break order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierEntry {
    pub name: String,
    pub kind: ModelKind,
    pub model: ClassifierModel,
}

impl ClassifierEntry {
    pub fn new(name: impl Into<String>, model: ClassifierModel) -> Self {
        Self {
            name: name.into(),
            kind: ModelKind::Classification,
            model,
        }
    }
}

/// A named, registered regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressorEntry {
    pub name: String,
    pub kind: ModelKind,
    pub model: RegressorModel,
}

impl RegressorEntry {
    pub fn new(name: impl Into<String>, model: RegressorModel) -> Self {
        Self {
            name: name.into(),
            kind: ModelKind::Regression,
            model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_classifier_enum_dispatch() {
        let x = array![[0.0], [0.1], [5.0], [5.1]];
        let y = vec![0, 0, 1, 1];
        let config = ForestConfig {
            n_trees: 5,
            max_depth: 3,
            seed: 42,
        };
        let model =
            ClassifierModel::RandomForest(RandomForestClassifier::fit(&x, &y, 2, &config));

        assert_eq!(model.predict(&[0.05]), 0);
        assert_eq!(model.predict_proba(&[0.05]).len(), 2);
        assert_eq!(model.n_classes(), 2);
    }

    #[test]
    fn test_regressor_scaling_requirement() {
        let x = array![[1.0], [2.0], [3.0]];
        let linear = RegressorModel::Linear(LinearRegression::fit(&x, &[1.0, 2.0, 3.0]).unwrap());
        let forest = RegressorModel::RandomForest(RandomForestRegressor::fit(
            &x,
            &[1.0, 2.0, 3.0],
            &ForestConfig {
                n_trees: 3,
                max_depth: 2,
                seed: 1,
            },
        ));

        assert!(linear.needs_scaled_input());
        assert!(!forest.needs_scaled_input());
    }

    #[test]
    fn test_entry_kind_and_serde() {
        let x = array![[1.0], [2.0], [3.0]];
        let entry = RegressorEntry::new(
            "LinearRegression",
            RegressorModel::Linear(LinearRegression::fit(&x, &[2.0, 4.0, 6.0]).unwrap()),
        );
        assert_eq!(entry.kind, ModelKind::Regression);

        let json = serde_json::to_string(&entry).unwrap();
        let back: RegressorEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, back);
    }

    #[test]
    fn test_model_kind_display() {
        assert_eq!(ModelKind::Classification.to_string(), "classification");
        assert_eq!(ModelKind::Regression.to_string(), "regression");
    }
}
