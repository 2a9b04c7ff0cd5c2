//! Ensemble training
//!
//! Fits the full four-model ensemble on an encoded corpus: two area
//! classifiers on the stratified split, two adequacy regressors on the
//! plain split, with hold-out metrics and 5-fold cross-validation on the
//! training portion only. Every randomized step derives from the one
//! trainer seed, so repeated runs over the same corpus are identical.

mod split;

pub use split::{stratified_split, train_test_split};

use crate::encode::{FeatureEncoder, StandardScaler, FEATURE_NAMES};
use crate::error::{Error, Result};
use crate::eval::{mean_std, Average, ClassMetrics, ConfusionMatrix, KFold};
use crate::eval::{mae, r_squared, rmse};
use crate::model::{
    BoostingConfig, ClassifierEntry, ClassifierModel, ForestConfig, GradientBoostingClassifier,
    LinearRegression, RandomForestClassifier, RandomForestRegressor, RegressorEntry,
    RegressorModel,
};
use crate::synth::TrainingCorpus;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hyperparameters for one training pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    pub seed: u64,
    pub test_ratio: f64,
    pub cv_folds: usize,
    pub forest_trees: usize,
    pub forest_depth: usize,
    pub boosting_rounds: usize,
    pub boosting_depth: usize,
    pub shrinkage: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_ratio: 0.2,
            cv_folds: 5,
            forest_trees: 100,
            forest_depth: 10,
            boosting_rounds: 100,
            boosting_depth: 5,
            shrinkage: 0.1,
        }
    }
}

impl TrainerConfig {
    /// Reduced profile for tests and smoke runs
    pub fn fast() -> Self {
        Self {
            cv_folds: 3,
            forest_trees: 12,
            forest_depth: 6,
            boosting_rounds: 12,
            boosting_depth: 3,
            ..Self::default()
        }
    }

    fn forest(&self) -> ForestConfig {
        ForestConfig {
            n_trees: self.forest_trees,
            max_depth: self.forest_depth,
            seed: self.seed,
        }
    }

    fn boosting(&self) -> BoostingConfig {
        BoostingConfig {
            n_rounds: self.boosting_rounds,
            max_depth: self.boosting_depth,
            shrinkage: self.shrinkage,
            seed: self.seed,
        }
    }
}

/// Hold-out and cross-validated metrics for one classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub cv_scores: Vec<f64>,
    pub cv_mean: f64,
    pub cv_std: f64,
    pub confusion_matrix: Vec<Vec<usize>>,
}

/// Hold-out and cross-validated metrics for one regressor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressorReport {
    pub rmse: f64,
    pub mae: f64,
    pub r2_score: f64,
    pub cv_scores: Vec<f64>,
    pub cv_mean: f64,
    pub cv_std: f64,
}

/// One feature's share of the bagging classifier's impurity decrease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Classification metrics keyed by model name, plus the feature-importance
/// ranking, all under the `classification` key of the metrics document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub feature_importance: Vec<FeatureImportance>,
    #[serde(flatten)]
    pub models: BTreeMap<String, ClassifierReport>,
}

/// The persisted metrics document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsBundle {
    pub classification: ClassificationMetrics,
    pub regression: BTreeMap<String, RegressorReport>,
}

impl MetricsBundle {
    pub fn is_empty(&self) -> bool {
        self.classification.models.is_empty() && self.regression.is_empty()
    }
}

/// Everything one successful training pass produces
#[derive(Debug, Clone)]
pub struct TrainedEnsemble {
    pub encoder: FeatureEncoder,
    pub scaler: StandardScaler,
    pub classifiers: Vec<ClassifierEntry>,
    pub regressors: Vec<RegressorEntry>,
    pub metrics: MetricsBundle,
}

/// Fits the ensemble and computes its evaluation metrics
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Train all four models on the corpus. Fails on an empty corpus;
    /// nothing is persisted here.
    pub fn train(&self, corpus: &TrainingCorpus) -> Result<TrainedEnsemble> {
        if corpus.is_empty() {
            return Err(Error::CorpusEmpty);
        }

        let encoder = FeatureEncoder::fit(corpus.records());
        let (x, y_area, y_score) = encoder.feature_matrix(corpus.records())?;
        let n_areas = encoder.n_areas();

        let (clf_train, clf_test) = stratified_split(&y_area, self.config.test_ratio, self.config.seed);
        let (reg_train, reg_test) =
            train_test_split(x.nrows(), self.config.test_ratio, self.config.seed);

        // Scaler statistics come from the regression training split only
        let x_reg_train = subset(&x, &reg_train);
        let scaler = StandardScaler::fit(&x_reg_train);

        let mut metrics = MetricsBundle::default();

        // --- classifiers, unscaled stratified split ---
        let x_clf_train = subset(&x, &clf_train);
        let y_clf_train = subset_labels(&y_area, &clf_train);

        let forest_clf =
            RandomForestClassifier::fit(&x_clf_train, &y_clf_train, n_areas, &self.config.forest());
        metrics.classification.feature_importance =
            importance_ranking(forest_clf.feature_importances());
        let forest_model = ClassifierModel::RandomForest(forest_clf);
        metrics.classification.models.insert(
            "RandomForest".to_string(),
            self.classifier_report(&forest_model, &x, &y_area, &clf_train, &clf_test, n_areas),
        );

        let boosted = ClassifierModel::GradientBoosting(GradientBoostingClassifier::fit(
            &x_clf_train,
            &y_clf_train,
            n_areas,
            &self.config.boosting(),
        ));
        metrics.classification.models.insert(
            "GradientBoosting".to_string(),
            self.classifier_report(&boosted, &x, &y_area, &clf_train, &clf_test, n_areas),
        );

        // --- regressors, plain split ---
        let y_reg_train = subset_scores(&y_score, &reg_train);

        let forest_reg = RegressorModel::RandomForest(RandomForestRegressor::fit(
            &subset(&x, &reg_train),
            &y_reg_train,
            &self.config.forest(),
        ));
        metrics.regression.insert(
            "RandomForest".to_string(),
            self.regressor_report(&forest_reg, &x, &y_score, &reg_train, &reg_test, &scaler)?,
        );

        let x_reg_train_scaled = scaler.transform_matrix(&x_reg_train);
        let linear = RegressorModel::Linear(LinearRegression::fit(
            &x_reg_train_scaled,
            &y_reg_train,
        )?);
        metrics.regression.insert(
            "LinearRegression".to_string(),
            self.regressor_report(&linear, &x, &y_score, &reg_train, &reg_test, &scaler)?,
        );

        // Registration order fixes the consolidation tie-break
        let classifiers = vec![
            ClassifierEntry::new("RandomForest", forest_model),
            ClassifierEntry::new("GradientBoosting", boosted),
        ];
        let regressors = vec![
            RegressorEntry::new("RandomForest", forest_reg),
            RegressorEntry::new("LinearRegression", linear),
        ];

        Ok(TrainedEnsemble {
            encoder,
            scaler,
            classifiers,
            regressors,
            metrics,
        })
    }

    fn classifier_report(
        &self,
        model: &ClassifierModel,
        x: &Array2<f64>,
        y: &[usize],
        train: &[usize],
        test: &[usize],
        n_areas: usize,
    ) -> ClassifierReport {
        let y_pred: Vec<usize> = test.iter().map(|&i| model.predict(&row(x, i))).collect();
        let y_test = subset_labels(y, test);

        let cm = ConfusionMatrix::from_predictions(&y_pred, &y_test, n_areas);
        let class_metrics = ClassMetrics::from_confusion_matrix(&cm);

        let cv_scores = self.cv_classifier(model, x, y, train, n_areas);
        let (cv_mean, cv_std) = mean_std(&cv_scores);

        ClassifierReport {
            accuracy: cm.accuracy(),
            precision: class_metrics.precision_avg(Average::Weighted),
            recall: class_metrics.recall_avg(Average::Weighted),
            f1_score: class_metrics.f1_avg(Average::Weighted),
            cv_scores,
            cv_mean,
            cv_std,
            confusion_matrix: cm.rows().to_vec(),
        }
    }

    /// Cross-validated accuracy on the training split: each fold refits a
    /// fresh model of the same kind and configuration.
    fn cv_classifier(
        &self,
        model: &ClassifierModel,
        x: &Array2<f64>,
        y: &[usize],
        train: &[usize],
        n_areas: usize,
    ) -> Vec<f64> {
        let kfold = KFold::new(self.config.cv_folds).with_seed(self.config.seed);
        let mut scores = Vec::with_capacity(self.config.cv_folds);

        for (fold_train, fold_test) in kfold.split(train.len()) {
            let train_idx: Vec<usize> = fold_train.iter().map(|&p| train[p]).collect();
            let test_idx: Vec<usize> = fold_test.iter().map(|&p| train[p]).collect();

            let fold_x = subset(x, &train_idx);
            let fold_y = subset_labels(y, &train_idx);

            let fitted = match model {
                ClassifierModel::RandomForest(_) => ClassifierModel::RandomForest(
                    RandomForestClassifier::fit(&fold_x, &fold_y, n_areas, &self.config.forest()),
                ),
                ClassifierModel::GradientBoosting(_) => {
                    ClassifierModel::GradientBoosting(GradientBoostingClassifier::fit(
                        &fold_x,
                        &fold_y,
                        n_areas,
                        &self.config.boosting(),
                    ))
                }
            };

            let correct = test_idx
                .iter()
                .filter(|&&i| fitted.predict(&row(x, i)) == y[i])
                .count();
            scores.push(if test_idx.is_empty() {
                0.0
            } else {
                correct as f64 / test_idx.len() as f64
            });
        }

        scores
    }

    fn regressor_report(
        &self,
        model: &RegressorModel,
        x: &Array2<f64>,
        y: &[f64],
        train: &[usize],
        test: &[usize],
        scaler: &StandardScaler,
    ) -> Result<RegressorReport> {
        let y_pred: Vec<f64> = test
            .iter()
            .map(|&i| model.predict(&self.regressor_features(model, x, i, scaler)))
            .collect();
        let y_test = subset_scores(y, test);

        let cv_scores = self.cv_regressor(model, x, y, train, scaler)?;
        let (cv_mean, cv_std) = mean_std(&cv_scores);

        Ok(RegressorReport {
            rmse: rmse(&y_pred, &y_test),
            mae: mae(&y_pred, &y_test),
            r2_score: r_squared(&y_pred, &y_test),
            cv_scores,
            cv_mean,
            cv_std,
        })
    }

    /// Cross-validated R² on the training split. The scaler fitted on the
    /// full regression training split is reused across folds, matching the
    /// production training flow.
    fn cv_regressor(
        &self,
        model: &RegressorModel,
        x: &Array2<f64>,
        y: &[f64],
        train: &[usize],
        scaler: &StandardScaler,
    ) -> Result<Vec<f64>> {
        let kfold = KFold::new(self.config.cv_folds).with_seed(self.config.seed);
        let mut scores = Vec::with_capacity(self.config.cv_folds);

        for (fold_train, fold_test) in kfold.split(train.len()) {
            let train_idx: Vec<usize> = fold_train.iter().map(|&p| train[p]).collect();
            let test_idx: Vec<usize> = fold_test.iter().map(|&p| train[p]).collect();

            let fold_y = subset_scores(y, &train_idx);

            let fitted = match model {
                RegressorModel::RandomForest(_) => RegressorModel::RandomForest(
                    RandomForestRegressor::fit(&subset(x, &train_idx), &fold_y, &self.config.forest()),
                ),
                RegressorModel::Linear(_) => {
                    let scaled = scaler.transform_matrix(&subset(x, &train_idx));
                    RegressorModel::Linear(LinearRegression::fit(&scaled, &fold_y)?)
                }
            };

            let y_pred: Vec<f64> = test_idx
                .iter()
                .map(|&i| fitted.predict(&self.regressor_features(&fitted, x, i, scaler)))
                .collect();
            let y_test = subset_scores(y, &test_idx);
            scores.push(r_squared(&y_pred, &y_test));
        }

        Ok(scores)
    }

    fn regressor_features(
        &self,
        model: &RegressorModel,
        x: &Array2<f64>,
        i: usize,
        scaler: &StandardScaler,
    ) -> Vec<f64> {
        let features = row(x, i);
        if model.needs_scaled_input() {
            scaler.transform_row(&features)
        } else {
            features
        }
    }
}

/// Feature importances zipped with their names, ranked descending
fn importance_ranking(importances: &[f64]) -> Vec<FeatureImportance> {
    let mut ranking: Vec<FeatureImportance> = FEATURE_NAMES
        .iter()
        .zip(importances.iter())
        .map(|(&feature, &importance)| FeatureImportance {
            feature: feature.to_string(),
            importance,
        })
        .collect();
    ranking.sort_by(|a, b| {
        b.importance
            .partial_cmp(&a.importance)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranking
}

fn subset(x: &Array2<f64>, indices: &[usize]) -> Array2<f64> {
    x.select(Axis(0), indices)
}

fn subset_labels(y: &[usize], indices: &[usize]) -> Vec<usize> {
    indices.iter().map(|&i| y[i]).collect()
}

fn subset_scores(y: &[f64], indices: &[usize]) -> Vec<f64> {
    indices.iter().map(|&i| y[i]).collect()
}

fn row(x: &Array2<f64>, i: usize) -> Vec<f64> {
    x.row(i).to_vec()
}
