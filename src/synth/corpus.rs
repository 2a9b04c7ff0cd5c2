//! Training corpus container and tabular persistence
//!
//! One row per training record. The skills column is a comma-joined list,
//! so it is always written quoted; the reader understands double-quoted
//! fields generally.

use crate::catalog::Objective;
use crate::error::{Error, Result};
use crate::profile::{ProfessionalProfile, TrainingRecord};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

const HEADER: &str = "profession,years_experience,tier,objective,area_label,\
study_hours,skill_count,skills,motivation,adequacy_score";

const COLUMNS: usize = 10;

/// An immutable set of labeled training records
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingCorpus {
    records: Vec<TrainingRecord>,
}

impl TrainingCorpus {
    pub fn new(records: Vec<TrainingRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[TrainingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render the corpus as CSV text
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(self.records.len() * 96);
        out.push_str(HEADER);
        out.push('\n');

        for record in &self.records {
            let profile = &record.profile;
            out.push_str(&format!(
                "{},{},{},{},{},{},{},\"{}\",{},{:.2}\n",
                profile.profession,
                profile.years_experience,
                profile.tier(),
                profile.objective,
                record.area_label,
                profile.study_hours,
                profile.skill_count(),
                profile.skills.join(","),
                profile.motivation,
                record.adequacy_score,
            ));
        }

        out
    }

    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_csv())?;
        Ok(())
    }

    /// Parse a corpus from CSV text. Any unparseable row aborts with a
    /// `MalformedRecord` naming the line.
    pub fn from_csv(text: &str) -> Result<Self> {
        let mut lines = text.lines().enumerate();

        match lines.next() {
            Some((_, header)) if header == HEADER => {}
            Some((_, header)) => {
                return Err(Error::MalformedRecord {
                    line: 1,
                    reason: format!("unexpected header {header:?}"),
                })
            }
            None => return Err(Error::CorpusEmpty),
        }

        let mut records = Vec::new();
        for (idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            records.push(parse_row(line, idx + 1)?);
        }

        Ok(Self::new(records))
    }

    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_csv(&text)
    }

    /// Distribution summary, mirroring what the generator reports
    pub fn summary(&self) -> CorpusSummary {
        let mut by_area = BTreeMap::new();
        let mut by_objective = BTreeMap::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;

        for record in &self.records {
            *by_area.entry(record.area_label.clone()).or_insert(0) += 1;
            *by_objective
                .entry(record.profile.objective.as_str().to_string())
                .or_insert(0) += 1;
            min = min.min(record.adequacy_score);
            max = max.max(record.adequacy_score);
            sum += record.adequacy_score;
        }

        let score_mean = if self.records.is_empty() {
            0.0
        } else {
            sum / self.records.len() as f64
        };

        CorpusSummary {
            total: self.records.len(),
            by_area,
            by_objective,
            score_mean,
            score_min: if min.is_finite() { min } else { 0.0 },
            score_max: if max.is_finite() { max } else { 0.0 },
        }
    }
}

/// Per-area and per-objective counts plus score statistics
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusSummary {
    pub total: usize,
    pub by_area: BTreeMap<String, usize>,
    pub by_objective: BTreeMap<String, usize>,
    pub score_mean: f64,
    pub score_min: f64,
    pub score_max: f64,
}

impl fmt::Display for CorpusSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Records: {}", self.total)?;
        writeln!(
            f,
            "Adequacy score: mean {:.2}, min {:.2}, max {:.2}",
            self.score_mean, self.score_min, self.score_max
        )?;
        writeln!(f, "By area:")?;
        for (area, count) in &self.by_area {
            writeln!(f, "  {area:<24} {count}")?;
        }
        writeln!(f, "By objective:")?;
        for (objective, count) in &self.by_objective {
            writeln!(f, "  {objective:<24} {count}")?;
        }
        Ok(())
    }
}

fn parse_row(line: &str, line_no: usize) -> Result<TrainingRecord> {
    let fields = split_csv_line(line);
    if fields.len() != COLUMNS {
        return Err(Error::MalformedRecord {
            line: line_no,
            reason: format!("expected {COLUMNS} columns, found {}", fields.len()),
        });
    }

    let malformed = |field: &str, value: &str| Error::MalformedRecord {
        line: line_no,
        reason: format!("bad {field}: {value:?}"),
    };

    let years_experience: u32 = fields[1]
        .parse()
        .map_err(|_| malformed("years_experience", &fields[1]))?;
    let objective =
        Objective::parse(&fields[3]).ok_or_else(|| malformed("objective", &fields[3]))?;
    let study_hours: u32 = fields[5]
        .parse()
        .map_err(|_| malformed("study_hours", &fields[5]))?;
    let skill_count: usize = fields[6]
        .parse()
        .map_err(|_| malformed("skill_count", &fields[6]))?;
    let skills: Vec<String> = if fields[7].is_empty() {
        Vec::new()
    } else {
        fields[7].split(',').map(ToString::to_string).collect()
    };
    let motivation: u8 = fields[8]
        .parse()
        .map_err(|_| malformed("motivation", &fields[8]))?;
    let adequacy_score: f64 = fields[9]
        .parse()
        .map_err(|_| malformed("adequacy_score", &fields[9]))?;

    let derived_tier = crate::catalog::ExperienceTier::from_years(years_experience);
    if fields[2] != derived_tier.as_str() {
        return Err(Error::MalformedRecord {
            line: line_no,
            reason: format!(
                "tier {:?} inconsistent with {years_experience} years (expected {})",
                fields[2],
                derived_tier.as_str()
            ),
        });
    }
    if skills.len() != skill_count {
        return Err(Error::MalformedRecord {
            line: line_no,
            reason: format!(
                "skill_count {skill_count} disagrees with {} listed skills",
                skills.len()
            ),
        });
    }
    if !(0.0..=100.0).contains(&adequacy_score) {
        return Err(Error::MalformedRecord {
            line: line_no,
            reason: format!("adequacy_score {adequacy_score} outside [0,100]"),
        });
    }

    Ok(TrainingRecord {
        profile: ProfessionalProfile {
            profession: fields[0].clone(),
            years_experience,
            objective,
            study_hours,
            skills,
            motivation,
        },
        area_label: fields[4].clone(),
        adequacy_score,
    })
}

/// Split one CSV line, honoring double-quoted fields
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
