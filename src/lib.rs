pub mod error;
pub mod logging;
pub mod matching;
pub mod normalize;
pub mod semantic;
pub mod taxonomy;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use error::SubscoreError;

// Commonly used data models for the scoring functions. All of them are
// read-only value objects: the engine never mutates an input after
// construction, scored output is always a new value.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    /// Identifier assigned by the ingestion side (board name + listing id).
    pub source_id: String,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub location: String,
    pub salary_range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub location: String,
    /// Derived from `experience`; see [`CandidateProfile::derive_years_of_experience`].
    pub years_of_experience: u32,
    pub current_position: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub start_year: i32,
    /// `None` means the position is held at present.
    pub end_year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub level: Option<DegreeLevel>,
    pub field: String,
    pub institution: String,
    pub year: Option<i32>,
}

/// Ordered so that "required level attained or exceeded" is a plain `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DegreeLevel {
    Bachelor,
    Master,
    Doctorate,
}

impl CandidateProfile {
    /// Sum of entry durations in whole years, overlapping entries counted as
    /// stated. An entry whose end year precedes its start year is malformed
    /// input from the resume collaborator and is reported, not clamped.
    pub fn derive_years_of_experience(entries: &[ExperienceEntry]) -> Result<u32, SubscoreError> {
        let current_year = Utc::now().year();
        let mut total = 0i32;
        for entry in entries {
            let end = entry.end_year.unwrap_or(current_year);
            if end < entry.start_year {
                return Err(SubscoreError::MalformedField {
                    field: "experience",
                    detail: format!(
                        "entry '{}' ends {} before start {}",
                        entry.title, end, entry.start_year
                    ),
                });
            }
            total += end - entry.start_year;
        }
        Ok(total.max(0) as u32)
    }

    /// Highest degree level across education entries, if any entry carries one.
    pub fn highest_degree(&self) -> Option<DegreeLevel> {
        self.education.iter().filter_map(|e| e.level).max()
    }
}
