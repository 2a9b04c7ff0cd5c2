//! Profile and training-record types
//!
//! `ProfessionalProfile` is the internal, fully-typed profile used by the
//! generator and trainer. `ProfileInput` is the lenient shape accepted from
//! the request layer at inference time: study hours may arrive as an integer
//! or a string that starts with one, skills as a list or a comma-joined
//! string, and motivation may be absent.

use crate::catalog::{ExperienceTier, Objective};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A professional profile as synthesized and trained on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalProfile {
    pub profession: String,
    pub years_experience: u32,
    pub objective: Objective,
    /// Weekly hours available for study
    pub study_hours: u32,
    pub skills: Vec<String>,
    /// Self-reported motivation, 0-10
    pub motivation: u8,
}

impl ProfessionalProfile {
    /// Seniority tier, always derived from years of experience
    pub fn tier(&self) -> ExperienceTier {
        ExperienceTier::from_years(self.years_experience)
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }
}

/// A labeled corpus row: a profile plus its ground-truth outcome.
///
/// Produced only by the dataset synthesizer; immutable once generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub profile: ProfessionalProfile,
    /// Ground-truth recommended area
    pub area_label: String,
    /// Ground-truth adequacy score, 0-100
    pub adequacy_score: f64,
}

/// Study hours as received from the request layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudyHoursField {
    Number(u32),
    Text(String),
}

impl Default for StudyHoursField {
    fn default() -> Self {
        StudyHoursField::Number(10)
    }
}

/// Skills as received from the request layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillsField {
    List(Vec<String>),
    Text(String),
}

impl Default for SkillsField {
    fn default() -> Self {
        SkillsField::List(Vec::new())
    }
}

fn default_motivation() -> u8 {
    8
}

/// Inference input as deserialized from the request layer.
///
/// Unknown categorical values are not rejected here; they fall back to
/// code 0 during encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub profession: String,
    pub years_experience: u32,
    pub objective: String,
    /// Informational; not part of the encoded feature vector
    #[serde(default)]
    pub area_of_interest: Option<String>,
    #[serde(default)]
    pub study_hours: StudyHoursField,
    #[serde(default)]
    pub skills: SkillsField,
    #[serde(default = "default_motivation")]
    pub motivation: u8,
}

impl ProfileInput {
    /// Tier recomputed from years of experience, never trusted from input
    pub fn tier(&self) -> ExperienceTier {
        ExperienceTier::from_years(self.years_experience)
    }

    /// Resolve study hours: either the integer itself or the leading
    /// integer of a string such as `"10 hours"`.
    pub fn resolved_study_hours(&self) -> Result<u32> {
        match &self.study_hours {
            StudyHoursField::Number(n) => Ok(*n),
            StudyHoursField::Text(s) => s
                .split_whitespace()
                .next()
                .and_then(|tok| tok.parse::<u32>().ok())
                .ok_or_else(|| Error::InvalidInput {
                    field: "study_hours".to_string(),
                    reason: format!("no leading integer in {s:?}"),
                }),
        }
    }

    /// Resolve the skill list: a list passes through, a string is split on
    /// commas with surrounding whitespace trimmed.
    pub fn resolved_skills(&self) -> Vec<String> {
        match &self.skills {
            SkillsField::List(list) => list.clone(),
            SkillsField::Text(s) => s
                .split(',')
                .map(str::trim)
                .filter(|tok| !tok.is_empty())
                .map(ToString::to_string)
                .collect(),
        }
    }
}
