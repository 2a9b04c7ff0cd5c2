//! Fixed feature catalogs
//!
//! The value domains of every categorical profile attribute: career areas,
//! current professions, the profession→area affinity table, per-area skill
//! lists, and the weighted study-hour choices. These tables are frozen;
//! the corpus generator and the encoder both depend on their exact contents
//! and ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The eight career areas a profile can be steered towards
pub const CAREER_AREAS: [&str; 8] = [
    "Web Development",
    "Data Science",
    "DevOps",
    "Mobile",
    "UX/UI Design",
    "Information Security",
    "Cloud Computing",
    "Artificial Intelligence",
];

/// The nine professions the generator draws from
pub const PROFESSIONS: [&str; 9] = [
    "Developer",
    "Systems Analyst",
    "QA Tester",
    "Technical Support",
    "Designer",
    "Project Manager",
    "Data Analyst",
    "DBA",
    "Network Administrator",
];

/// Weekly study-hour choices and their sampling weights
pub const STUDY_HOUR_CHOICES: [(u32, f64); 6] = [
    (5, 0.10),
    (10, 0.20),
    (15, 0.30),
    (20, 0.25),
    (25, 0.10),
    (30, 0.05),
];

/// Areas a profession has natural affinity with.
///
/// Used when the objective is to update (rather than relocate) a career:
/// the area of interest is drawn from this subset. Unmapped professions
/// fall back to the full catalog.
pub fn affinity_areas(profession: &str) -> &'static [&'static str] {
    match profession {
        "Developer" => &["Web Development", "Mobile", "DevOps"],
        "Systems Analyst" => &["Web Development", "Data Science", "Cloud Computing"],
        "QA Tester" => &["DevOps", "Web Development", "Information Security"],
        "Technical Support" => &["DevOps", "Cloud Computing", "Information Security"],
        "Designer" => &["UX/UI Design", "Web Development", "Mobile"],
        "Project Manager" => &["DevOps", "Cloud Computing", "Data Science"],
        "Data Analyst" => &["Data Science", "Artificial Intelligence", "Cloud Computing"],
        "DBA" => &["Data Science", "Cloud Computing", "DevOps"],
        "Network Administrator" => &["DevOps", "Cloud Computing", "Information Security"],
        _ => &CAREER_AREAS,
    }
}

/// Hard skills associated with each career area
pub fn area_skills(area: &str) -> &'static [&'static str] {
    match area {
        "Web Development" => &["HTML", "CSS", "JavaScript", "React", "Node.js", "Python", "Java"],
        "Data Science" => &[
            "Python",
            "R",
            "SQL",
            "Machine Learning",
            "Statistics",
            "Pandas",
            "NumPy",
        ],
        "DevOps" => &["Docker", "Kubernetes", "CI/CD", "Linux", "AWS", "Terraform", "Git"],
        "Mobile" => &["React Native", "Flutter", "Swift", "Kotlin", "Android", "iOS"],
        "UX/UI Design" => &["Figma", "Adobe XD", "Sketch", "Design Thinking", "Prototyping"],
        "Information Security" => &["Pentest", "OWASP", "Cryptography", "Firewall", "SIEM"],
        "Cloud Computing" => &["AWS", "Azure", "GCP", "Serverless", "Containers"],
        "Artificial Intelligence" => &["Python", "TensorFlow", "PyTorch", "NLP", "Computer Vision"],
        _ => &["Python", "SQL"],
    }
}

/// Seniority bucket derived from years of experience.
///
/// The tier is always a pure function of `years_experience`; it is never
/// supplied independently at inference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceTier {
    /// Fewer than 3 years
    Junior,
    /// 3 to 6 years
    Mid,
    /// 7 years or more
    Senior,
}

impl ExperienceTier {
    /// Derive the tier from years of experience
    pub fn from_years(years: u32) -> Self {
        if years < 3 {
            ExperienceTier::Junior
        } else if years < 7 {
            ExperienceTier::Mid
        } else {
            ExperienceTier::Senior
        }
    }

    /// Bonus the adequacy formula grants this tier
    pub fn adequacy_bonus(&self) -> f64 {
        match self {
            ExperienceTier::Junior => 5.0,
            ExperienceTier::Mid => 15.0,
            ExperienceTier::Senior => 20.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceTier::Junior => "Junior",
            ExperienceTier::Mid => "Mid",
            ExperienceTier::Senior => "Senior",
        }
    }
}

impl fmt::Display for ExperienceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Primary career objective of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Objective {
    /// Deepen the current career track
    UpdateCareer,
    /// Move to a different career track
    RelocateCareer,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::UpdateCareer => "Update Career",
            Objective::RelocateCareer => "Relocate Career",
        }
    }

    /// Parse the canonical display string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Update Career" => Some(Objective::UpdateCareer),
            "Relocate Career" => Some(Objective::RelocateCareer),
            _ => None,
        }
    }

    /// Bonus the adequacy formula grants this objective
    pub fn adequacy_bonus(&self) -> f64 {
        match self {
            // Updating an existing track is easier than relocating
            Objective::UpdateCareer => 15.0,
            Objective::RelocateCareer => 5.0,
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
