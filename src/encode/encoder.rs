//! Profile feature encoding
//!
//! Converts profiles into the fixed-order numeric feature vector the models
//! consume. Categorical fields go through per-field codebooks fitted once at
//! training time; the vector layout is identical between training and
//! inference.

use super::codebook::LabelCodebook;
use crate::error::{Error, Result};
use crate::profile::{ProfileInput, TrainingRecord};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Feature names in vector order
pub const FEATURE_NAMES: [&str; 7] = [
    "profession_code",
    "years_experience",
    "tier_code",
    "objective_code",
    "study_hours",
    "skill_count",
    "motivation",
];

/// Number of features in the encoded vector
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// One profile encoded into the fixed feature order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedProfile {
    pub profession_code: f64,
    pub years_experience: f64,
    pub tier_code: f64,
    pub objective_code: f64,
    pub study_hours: f64,
    pub skill_count: f64,
    pub motivation: f64,
}

impl EncodedProfile {
    /// The vector in feature order; matches [`FEATURE_NAMES`]
    pub fn as_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.profession_code,
            self.years_experience,
            self.tier_code,
            self.objective_code,
            self.study_hours,
            self.skill_count,
            self.motivation,
        ]
    }
}

/// Fitted feature encoder: one codebook per categorical field plus the
/// dedicated area-label codebook. Built once during training, persisted,
/// loaded read-only at inference; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    profession: LabelCodebook,
    tier: LabelCodebook,
    objective: LabelCodebook,
    area: LabelCodebook,
}

impl FeatureEncoder {
    /// Fit all codebooks from a training corpus
    pub fn fit(records: &[TrainingRecord]) -> Self {
        Self {
            profession: LabelCodebook::fit(records.iter().map(|r| r.profile.profession.as_str())),
            tier: LabelCodebook::fit(records.iter().map(|r| r.profile.tier().as_str())),
            objective: LabelCodebook::fit(records.iter().map(|r| r.profile.objective.as_str())),
            area: LabelCodebook::fit(records.iter().map(|r| r.area_label.as_str())),
        }
    }

    /// Encode one training record. Record values were observed during
    /// fitting, so exact encoding cannot fail; the fallback path still
    /// applies for robustness.
    pub fn transform_record(&self, record: &TrainingRecord) -> EncodedProfile {
        let profile = &record.profile;
        EncodedProfile {
            profession_code: self.profession.encode_or_fallback(&profile.profession) as f64,
            years_experience: f64::from(profile.years_experience),
            tier_code: self.tier.encode_or_fallback(profile.tier().as_str()) as f64,
            objective_code: self.objective.encode_or_fallback(profile.objective.as_str()) as f64,
            study_hours: f64::from(profile.study_hours),
            skill_count: profile.skill_count() as f64,
            motivation: f64::from(profile.motivation),
        }
    }

    /// Encode one inference input. Unseen categorical values fall back to
    /// code 0; the tier is recomputed from years of experience.
    pub fn transform_input(&self, input: &ProfileInput) -> Result<EncodedProfile> {
        Ok(EncodedProfile {
            profession_code: self.profession.encode_or_fallback(&input.profession) as f64,
            years_experience: f64::from(input.years_experience),
            tier_code: self.tier.encode_or_fallback(input.tier().as_str()) as f64,
            objective_code: self.objective.encode_or_fallback(&input.objective) as f64,
            study_hours: f64::from(input.resolved_study_hours()?),
            skill_count: input.resolved_skills().len() as f64,
            motivation: f64::from(input.motivation),
        })
    }

    /// Encode an area label through its dedicated codebook
    pub fn encode_label(&self, area: &str) -> usize {
        self.area.encode_or_fallback(area)
    }

    /// Decode an area code back to its label
    pub fn decode_label(&self, code: usize) -> Result<&str> {
        self.area
            .decode(code)
            .ok_or_else(|| Error::Internal(format!("area code {code} outside codebook")))
    }

    /// Number of distinct area labels
    pub fn n_areas(&self) -> usize {
        self.area.len()
    }

    /// The area codebook itself, for ranked-output iteration
    pub fn area_codebook(&self) -> &LabelCodebook {
        &self.area
    }

    /// Encode a whole corpus into the design matrix plus both target
    /// vectors (area codes for classification, adequacy for regression).
    pub fn feature_matrix(
        &self,
        records: &[TrainingRecord],
    ) -> Result<(Array2<f64>, Vec<usize>, Vec<f64>)> {
        let mut flat = Vec::with_capacity(records.len() * FEATURE_COUNT);
        let mut areas = Vec::with_capacity(records.len());
        let mut scores = Vec::with_capacity(records.len());

        for record in records {
            flat.extend_from_slice(&self.transform_record(record).as_features());
            areas.push(self.encode_label(&record.area_label));
            scores.push(record.adequacy_score);
        }

        let x = Array2::from_shape_vec((records.len(), FEATURE_COUNT), flat)
            .map_err(|e| Error::Internal(format!("feature matrix shape: {e}")))?;
        Ok((x, areas, scores))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Objective;
    use crate::profile::ProfessionalProfile;

    fn record(profession: &str, years: u32, area: &str) -> TrainingRecord {
        TrainingRecord {
            profile: ProfessionalProfile {
                profession: profession.to_string(),
                years_experience: years,
                objective: Objective::UpdateCareer,
                study_hours: 15,
                skills: vec!["Python".to_string(), "SQL".to_string()],
                motivation: 8,
            },
            area_label: area.to_string(),
            adequacy_score: 72.5,
        }
    }

    fn fitted() -> FeatureEncoder {
        FeatureEncoder::fit(&[
            record("Developer", 1, "Web Development"),
            record("Data Analyst", 5, "Data Science"),
            record("DBA", 10, "Data Science"),
        ])
    }

    #[test]
    fn test_label_round_trip() {
        let enc = fitted();
        for area in ["Web Development", "Data Science"] {
            let code = enc.encode_label(area);
            assert_eq!(enc.decode_label(code).unwrap(), area);
        }
    }

    #[test]
    fn test_vector_order_matches_feature_names() {
        let enc = fitted();
        let encoded = enc.transform_record(&record("Developer", 1, "Web Development"));
        let features = encoded.as_features();
        assert_eq!(features.len(), FEATURE_NAMES.len());
        assert_eq!(features[1], 1.0); // years_experience
        assert_eq!(features[4], 15.0); // study_hours
        assert_eq!(features[5], 2.0); // skill_count
        assert_eq!(features[6], 8.0); // motivation
    }

    #[test]
    fn test_unseen_profession_never_fails() {
        let enc = fitted();
        let input: ProfileInput = serde_json::from_str(
            r#"{"profession": "Astronaut", "years_experience": 4,
                "objective": "Update Career", "study_hours": 10,
                "skills": ["Orbital Mechanics"]}"#,
        )
        .unwrap();
        let encoded = enc.transform_input(&input).unwrap();
        assert_eq!(encoded.profession_code, 0.0);
    }

    #[test]
    fn test_input_tier_recomputed_from_years() {
        let enc = fitted();
        let input: ProfileInput = serde_json::from_str(
            r#"{"profession": "DBA", "years_experience": 10,
                "objective": "Update Career", "study_hours": 10}"#,
        )
        .unwrap();
        let encoded = enc.transform_input(&input).unwrap();
        // Senior was observed during fitting; its code is deterministic
        let expected = enc.tier.encode("Senior").unwrap() as f64;
        assert_eq!(encoded.tier_code, expected);
    }

    #[test]
    fn test_feature_matrix_shape_and_targets() {
        let enc = fitted();
        let records = [
            record("Developer", 1, "Web Development"),
            record("DBA", 10, "Data Science"),
        ];
        let (x, areas, scores) = enc.feature_matrix(&records).unwrap();
        assert_eq!(x.shape(), &[2, FEATURE_COUNT]);
        assert_eq!(areas.len(), 2);
        assert_eq!(scores, vec![72.5, 72.5]);
        assert_ne!(areas[0], areas[1]);
    }
}
