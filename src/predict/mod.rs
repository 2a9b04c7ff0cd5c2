//! Ensemble inference and consolidation
//!
//! Runs every loaded model over one encoded profile and folds the
//! disagreeing outputs into a single recommendation. All tie-breaks are
//! deterministic: probability ranks break ties by ascending area code, the
//! area vote breaks ties in favor of the first-registered classifier.

use crate::error::{Error, Result};
use crate::profile::ProfileInput;
use crate::registry::InferenceContext;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Number of ranked areas reported per classifier
const TOP_AREAS: usize = 3;

/// Discretization of the 0-100 adequacy score. Boundary scores take the
/// higher band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreBand {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Regular,
    Low,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 65.0 {
            ScoreBand::VeryGood
        } else if score >= 50.0 {
            ScoreBand::Good
        } else if score >= 35.0 {
            ScoreBand::Regular
        } else {
            ScoreBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::VeryGood => "Very Good",
            ScoreBand::Good => "Good",
            ScoreBand::Regular => "Regular",
            ScoreBand::Low => "Low",
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of a classifier's top-3 ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaProbability {
    pub area: String,
    pub probability: f64,
    /// Human-facing percentage, e.g. `"62.5%"`
    pub percent: String,
}

/// One classifier's full output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierVote {
    pub model: String,
    pub area: String,
    /// Probability of the predicted area
    pub confidence: f64,
    pub top_areas: Vec<AreaProbability>,
}

/// One regressor's clipped score and band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressorEstimate {
    pub model: String,
    pub score: f64,
    pub band: ScoreBand,
}

/// The consolidated, ensemble-level recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedRecommendation {
    pub area: String,
    pub score: f64,
    pub band: ScoreBand,
    /// Number of classifiers that voted for the final area
    pub consensus: usize,
}

/// Full inference output: per-model detail plus the consolidation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub classification: Vec<ClassifierVote>,
    pub regression: Vec<RegressorEstimate>,
    pub recommendation: ConsolidatedRecommendation,
}

/// Stateless ensemble predictor over a loaded context
#[derive(Debug, Clone)]
pub struct Predictor {
    ctx: Arc<InferenceContext>,
}

impl Predictor {
    /// Requires a usable context: at least one classifier, at least one
    /// regressor, and the fitted encoder.
    pub fn new(ctx: Arc<InferenceContext>) -> Result<Self> {
        if ctx.encoder.is_none() {
            return Err(Error::NotReady("codebooks not loaded".to_string()));
        }
        if ctx.classifiers.is_empty() {
            return Err(Error::NotReady("no classifiers loaded".to_string()));
        }
        if ctx.regressors.is_empty() {
            return Err(Error::NotReady("no regressors loaded".to_string()));
        }
        if ctx.scaler.is_none()
            && ctx.regressors.iter().any(|e| e.model.needs_scaled_input())
        {
            return Err(Error::NotReady(
                "scaler not loaded but a regressor requires scaled input".to_string(),
            ));
        }
        Ok(Self { ctx })
    }

    pub fn context(&self) -> &InferenceContext {
        &self.ctx
    }

    /// Run the full ensemble over one profile
    pub fn predict(&self, input: &ProfileInput) -> Result<PredictionResult> {
        let encoder = self
            .ctx
            .encoder
            .as_ref()
            .ok_or_else(|| Error::NotReady("codebooks not loaded".to_string()))?;

        let features = encoder.transform_input(input)?.as_features();

        let mut classification = Vec::with_capacity(self.ctx.classifiers.len());
        for entry in &self.ctx.classifiers {
            let probs = entry.model.predict_proba(&features);
            let code = entry.model.predict(&features);
            let area = encoder.decode_label(code)?.to_string();

            let mut ranked: Vec<(usize, f64)> = probs.iter().copied().enumerate().collect();
            // Descending probability; equal probabilities keep ascending
            // area-code order
            ranked.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.0.cmp(&b.0))
            });

            let top_areas = ranked
                .iter()
                .take(TOP_AREAS)
                .map(|&(code, probability)| {
                    Ok(AreaProbability {
                        area: encoder.decode_label(code)?.to_string(),
                        probability,
                        percent: format!("{:.1}%", probability * 100.0),
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            classification.push(ClassifierVote {
                model: entry.name.clone(),
                confidence: probs.get(code).copied().unwrap_or(0.0),
                area,
                top_areas,
            });
        }

        let mut regression = Vec::with_capacity(self.ctx.regressors.len());
        for entry in &self.ctx.regressors {
            let model_input = if entry.model.needs_scaled_input() {
                let scaler = self
                    .ctx
                    .scaler
                    .as_ref()
                    .ok_or_else(|| Error::NotReady("scaler not loaded".to_string()))?;
                scaler.transform_row(&features)
            } else {
                features.to_vec()
            };

            let score = entry.model.predict(&model_input).clamp(0.0, 100.0);
            regression.push(RegressorEstimate {
                model: entry.name.clone(),
                score,
                band: ScoreBand::from_score(score),
            });
        }

        let recommendation = consolidate(&classification, &regression);

        Ok(PredictionResult {
            classification,
            regression,
            recommendation,
        })
    }
}

/// Fold per-model outputs into the final recommendation.
///
/// Final area: plurality of classifier votes, ties resolved in favor of
/// the first-registered classifier. Final score: arithmetic mean of the
/// clipped regressor scores.
fn consolidate(
    votes: &[ClassifierVote],
    estimates: &[RegressorEstimate],
) -> ConsolidatedRecommendation {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for vote in votes {
        *counts.entry(vote.area.as_str()).or_insert(0) += 1;
    }
    let max_count = counts.values().copied().max().unwrap_or(0);
    let area = votes
        .iter()
        .find(|v| counts[v.area.as_str()] == max_count)
        .map_or_else(String::new, |v| v.area.clone());
    let consensus = counts.get(area.as_str()).copied().unwrap_or(0);

    let score = if estimates.is_empty() {
        0.0
    } else {
        estimates.iter().map(|e| e.score).sum::<f64>() / estimates.len() as f64
    };

    ConsolidatedRecommendation {
        band: ScoreBand::from_score(score),
        area,
        score,
        consensus,
    }
}
