use serde::Serialize;
use tracing::warn;

use super::location::evaluate_location;
use super::skills::match_required_skills;
use super::weights::ScoringWeights;
use crate::error::SubscoreError;
use crate::normalize::{normalize_text, token_set};
use crate::taxonomy::SkillTaxonomy;
use crate::{CandidateProfile, DegreeLevel, JobPosting};

/// Substituted whenever a dimension cannot be judged from the data at hand.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Keyword tables driving the rule-based calculators. Loaded once at engine
/// construction so the scoring rules stay testable and swappable without
/// touching calculator logic.
#[derive(Debug, Clone)]
pub struct KeywordTables {
    pub junior_keywords: Vec<String>,
    pub senior_keywords: Vec<String>,
    pub doctorate_keywords: Vec<String>,
    pub master_keywords: Vec<String>,
    pub bachelor_keywords: Vec<String>,
    pub countries: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeywordTables {
    fn default() -> Self {
        Self {
            junior_keywords: owned(&[
                "junior",
                "entry level",
                "0-2 years",
                "1-2 years",
                "recent graduate",
                "new grad",
            ]),
            senior_keywords: owned(&[
                "senior", "lead", "principal", "5+ years", "7+ years", "expert", "advanced",
            ]),
            doctorate_keywords: owned(&["phd", "doctorate", "doctoral"]),
            master_keywords: owned(&["master"]),
            bachelor_keywords: owned(&["bachelor", "degree"]),
            countries: owned(&[
                "canada",
                "usa",
                "united states",
                "india",
                "uk",
                "united kingdom",
            ]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub weights: ScoringWeights,
    pub tables: KeywordTables,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            tables: KeywordTables::default(),
        }
    }
}

/// One dimension of the compatibility breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscoreResult {
    pub score: f64,
    pub status: &'static str,
    pub details: String,
}

impl SubscoreResult {
    fn scored(score: f64, details: String) -> Self {
        Self {
            score,
            status: status_from_score(score),
            details,
        }
    }

    fn unknown(details: impl Into<String>) -> Self {
        Self {
            score: NEUTRAL_SCORE,
            status: "UNKNOWN",
            details: details.into(),
        }
    }
}

/// Full scoring breakdown for one posting. `total` is 0-100, one decimal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchScore {
    pub total: f64,
    pub skills: SubscoreResult,
    pub experience: SubscoreResult,
    pub education: SubscoreResult,
    pub location: SubscoreResult,
    pub title: SubscoreResult,
    pub salary: SubscoreResult,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
}

pub struct ScoringEngine {
    config: MatchingConfig,
    taxonomy: SkillTaxonomy,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(MatchingConfig::default(), SkillTaxonomy::default())
    }
}

impl ScoringEngine {
    pub fn new(config: MatchingConfig, taxonomy: SkillTaxonomy) -> Self {
        Self { config, taxonomy }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.config.weights
    }

    /// Weighted compatibility score for one posting against one profile.
    /// Never fails: a calculator error is substituted with the neutral score
    /// and logged with the posting identifier.
    pub fn score(&self, posting: &JobPosting, profile: &CandidateProfile) -> MatchScore {
        let skills = self.recover(posting, "skills", self.score_skills(posting, profile));
        let experience =
            self.recover(posting, "experience", self.score_experience(posting, profile));
        let education = self.recover(posting, "education", self.score_education(posting, profile));
        let location = self.recover(posting, "location", self.score_location(posting, profile));
        let title = self.recover(posting, "title", self.score_title(posting, profile));
        let salary = self.recover(posting, "salary", self.score_salary(posting, profile));

        let weights = self.config.weights;
        let weighted = skills.score * weights.skills
            + experience.score * weights.experience
            + education.score * weights.education
            + location.score * weights.location
            + title.score * weights.title
            + salary.score * weights.salary;
        let total = round_one_decimal(weighted * 100.0).clamp(0.0, 100.0);

        MatchScore {
            total,
            skills,
            experience,
            education,
            location,
            title,
            salary,
        }
    }

    fn recover(
        &self,
        posting: &JobPosting,
        dimension: &'static str,
        result: Result<SubscoreResult, SubscoreError>,
    ) -> SubscoreResult {
        result.unwrap_or_else(|err| {
            warn!(
                posting_id = %posting.source_id,
                dimension,
                error = %err,
                "subscore computation failed; substituting neutral score"
            );
            SubscoreResult::unknown(format!("{dimension} could not be computed: {err}"))
        })
    }

    fn score_skills(
        &self,
        posting: &JobPosting,
        profile: &CandidateProfile,
    ) -> Result<SubscoreResult, SubscoreError> {
        let result =
            match_required_skills(&posting.required_skills, &profile.skills, &self.taxonomy);
        Ok(SubscoreResult::scored(result.match_ratio, result.details))
    }

    fn score_experience(
        &self,
        posting: &JobPosting,
        profile: &CandidateProfile,
    ) -> Result<SubscoreResult, SubscoreError> {
        // Reject inconsistent history before trusting the derived years.
        CandidateProfile::derive_years_of_experience(&profile.experience)?;

        // Level keywords carry punctuation ("5+ years", "0-2 years"), so the
        // scan runs over the lowercased raw description, not the normalized
        // form that strips punctuation.
        let description = posting.description.trim().to_lowercase();
        if description.is_empty() {
            return Ok(SubscoreResult::unknown(
                "posting has no description - neutral score",
            ));
        }

        let level = self.classify_level(&description);
        let years = profile.years_of_experience;
        let score = match level {
            ExperienceLevel::Junior => match years {
                0..=2 => 1.0,
                3..=4 => 0.7,
                _ => 0.4,
            },
            ExperienceLevel::Mid => match years {
                2..=6 => 1.0,
                0..=1 => 0.6,
                _ => 0.8,
            },
            ExperienceLevel::Senior => match years {
                5.. => 1.0,
                3..=4 => 0.7,
                _ => 0.3,
            },
        };

        Ok(SubscoreResult::scored(
            score,
            format!("{level:?} posting vs {years} years of experience"),
        ))
    }

    /// First matching tier wins; junior keywords are checked before senior so
    /// ambiguous postings lean junior, and mid is the default.
    fn classify_level(&self, lower_description: &str) -> ExperienceLevel {
        let tables = &self.config.tables;
        if contains_any(lower_description, &tables.junior_keywords) {
            ExperienceLevel::Junior
        } else if contains_any(lower_description, &tables.senior_keywords) {
            ExperienceLevel::Senior
        } else {
            ExperienceLevel::Mid
        }
    }

    fn score_education(
        &self,
        posting: &JobPosting,
        profile: &CandidateProfile,
    ) -> Result<SubscoreResult, SubscoreError> {
        let description = posting.description.trim().to_lowercase();
        if description.is_empty() || profile.education.is_empty() {
            return Ok(SubscoreResult::unknown(
                "no description or no education records - neutral score",
            ));
        }

        let tables = &self.config.tables;
        let required = if contains_any(&description, &tables.doctorate_keywords) {
            Some(DegreeLevel::Doctorate)
        } else if contains_any(&description, &tables.master_keywords) {
            Some(DegreeLevel::Master)
        } else if contains_any(&description, &tables.bachelor_keywords) {
            Some(DegreeLevel::Bachelor)
        } else {
            None
        };

        let Some(required) = required else {
            return Ok(SubscoreResult::scored(
                0.8,
                "no explicit degree requirement detected".into(),
            ));
        };

        let attained = profile.highest_degree();
        let (score, details) = match attained {
            Some(level) if level >= required => (
                1.0,
                format!("requires {required:?}, candidate holds {level:?}"),
            ),
            Some(level) => (
                0.3,
                format!("requires {required:?}, candidate holds only {level:?}"),
            ),
            None => (0.3, format!("requires {required:?}, candidate holds none")),
        };
        Ok(SubscoreResult::scored(score, details))
    }

    fn score_location(
        &self,
        posting: &JobPosting,
        profile: &CandidateProfile,
    ) -> Result<SubscoreResult, SubscoreError> {
        let evaluation = evaluate_location(
            &posting.location,
            &profile.location,
            &self.config.tables.countries,
        );
        if evaluation.score == NEUTRAL_SCORE {
            return Ok(SubscoreResult::unknown(evaluation.details));
        }
        Ok(SubscoreResult::scored(evaluation.score, evaluation.details))
    }

    fn score_title(
        &self,
        posting: &JobPosting,
        profile: &CandidateProfile,
    ) -> Result<SubscoreResult, SubscoreError> {
        let title_tokens = token_set(&posting.title);
        if title_tokens.is_empty() {
            return Ok(SubscoreResult::unknown(
                "posting has no title - neutral score",
            ));
        }

        let held_titles = profile
            .experience
            .iter()
            .map(|entry| entry.title.as_str())
            .chain(std::iter::once(profile.current_position.as_str()));
        for held in held_titles {
            let held_tokens = token_set(held);
            if !held_tokens.is_disjoint(&title_tokens) {
                return Ok(SubscoreResult::scored(
                    1.0,
                    format!("held position overlaps posting title: {held}"),
                ));
            }
        }

        let relevant_skills = profile
            .skills
            .iter()
            .filter(|skill| {
                let normalized = normalize_text(skill);
                title_tokens.iter().any(|token| normalized.contains(token))
            })
            .count();

        if relevant_skills == 0 {
            return Ok(SubscoreResult::scored(
                0.3,
                "no title or skill alignment with posting title".into(),
            ));
        }

        let score = (relevant_skills as f64 / title_tokens.len() as f64).min(1.0);
        Ok(SubscoreResult::scored(
            score,
            format!(
                "{relevant_skills} candidate skills align with {} title tokens",
                title_tokens.len()
            ),
        ))
    }

    /// Coarse placeholder: salary fit by experience band only. A real
    /// compensation model would parse the range and compare expectations.
    fn score_salary(
        &self,
        posting: &JobPosting,
        profile: &CandidateProfile,
    ) -> Result<SubscoreResult, SubscoreError> {
        let Some(salary) = posting
            .salary_range
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            return Ok(SubscoreResult::unknown(
                "posting has no salary range - neutral score",
            ));
        };

        let score = match profile.years_of_experience {
            0..=2 => 0.8,
            3..=5 => 0.7,
            _ => 0.6,
        };
        Ok(SubscoreResult::scored(
            score,
            format!("experience-band salary heuristic for range '{salary}'"),
        ))
    }
}

fn contains_any(lower_text: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|keyword| lower_text.contains(keyword.to_lowercase().as_str()))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn status_from_score(score: f64) -> &'static str {
    if score >= 0.9 {
        "PERFECT_MATCH"
    } else if score >= 0.7 {
        "MATCH"
    } else if score >= 0.4 {
        "PARTIAL_MATCH"
    } else {
        "MISS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EducationEntry, ExperienceEntry};

    fn full_posting() -> JobPosting {
        JobPosting {
            source_id: "board:1001".into(),
            title: "Senior Python Developer".into(),
            description: "Senior engineer, 5+ years with Python and SQL. Bachelor degree required."
                .into(),
            required_skills: vec!["python".into(), "sql".into()],
            location: "Toronto, Canada".into(),
            salary_range: Some("$120k-$150k".into()),
        }
    }

    fn full_profile() -> CandidateProfile {
        CandidateProfile {
            skills: vec!["Python".into(), "PostgreSQL".into(), "Docker".into()],
            experience: vec![ExperienceEntry {
                title: "Python Developer".into(),
                company: "Acme".into(),
                start_year: 2018,
                end_year: None,
            }],
            education: vec![EducationEntry {
                level: Some(DegreeLevel::Bachelor),
                field: "Computer Science".into(),
                institution: "State".into(),
                year: Some(2016),
            }],
            location: "Toronto, Canada".into(),
            years_of_experience: 6,
            current_position: "Python Developer".into(),
        }
    }

    #[test]
    fn scores_a_strong_match_high() {
        let engine = ScoringEngine::default();
        let score = engine.score(&full_posting(), &full_profile());

        assert!(score.total > 85.0);
        assert!(score.total <= 100.0);
        assert_eq!(score.skills.status, "PERFECT_MATCH");
        assert_eq!(score.location.score, 1.0);
        assert_eq!(score.title.score, 1.0);
    }

    #[test]
    fn total_is_rounded_to_one_decimal() {
        let engine = ScoringEngine::default();
        let score = engine.score(&full_posting(), &full_profile());
        assert!((score.total * 10.0 - (score.total * 10.0).round()).abs() < 1e-9);
    }

    #[test]
    fn missing_description_neutralizes_experience_and_education() {
        let engine = ScoringEngine::default();
        let mut posting = full_posting();
        posting.description = String::new();

        let score = engine.score(&posting, &full_profile());
        assert_eq!(score.experience.status, "UNKNOWN");
        assert_eq!(score.experience.score, NEUTRAL_SCORE);
        assert_eq!(score.education.status, "UNKNOWN");
    }

    #[test]
    fn junior_keywords_win_over_senior_keywords() {
        let engine = ScoringEngine::default();
        let mut posting = full_posting();
        posting.description = "Entry level role on a team of senior engineers".into();

        let mut profile = full_profile();
        profile.years_of_experience = 1;

        let score = engine.score(&posting, &profile);
        // Junior classification: 1 year scores 1.0, not the senior 0.3.
        assert_eq!(score.experience.score, 1.0);
    }

    #[test]
    fn senior_posting_penalizes_short_experience() {
        let engine = ScoringEngine::default();
        let mut profile = full_profile();
        profile.years_of_experience = 1;
        profile.experience.clear();

        let score = engine.score(&full_posting(), &profile);
        assert_eq!(score.experience.score, 0.3);
        assert_eq!(score.experience.status, "MISS");
    }

    #[test]
    fn unmet_degree_requirement_scores_low() {
        let engine = ScoringEngine::default();
        let mut posting = full_posting();
        posting.description = "PhD in computer science required".into();

        let score = engine.score(&posting, &full_profile());
        assert_eq!(score.education.score, 0.3);
        assert!(score.education.details.contains("Doctorate"));
    }

    #[test]
    fn higher_attainment_satisfies_lower_requirement() {
        let engine = ScoringEngine::default();
        let mut profile = full_profile();
        profile.education[0].level = Some(DegreeLevel::Doctorate);

        let score = engine.score(&full_posting(), &profile);
        assert_eq!(score.education.score, 1.0);
    }

    #[test]
    fn no_degree_requirement_scores_point_eight() {
        let engine = ScoringEngine::default();
        let mut posting = full_posting();
        posting.description = "Ship code with a friendly team, 5+ years".into();

        let score = engine.score(&posting, &full_profile());
        assert_eq!(score.education.score, 0.8);
    }

    #[test]
    fn title_falls_back_to_skill_alignment() {
        let engine = ScoringEngine::default();
        let mut profile = full_profile();
        profile.experience.clear();
        profile.current_position = "Data Analyst".into();
        profile.skills = vec!["python".into()];

        let score = engine.score(&full_posting(), &profile);
        // "python" matches one of the three title tokens.
        assert!((score.title.score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn absent_salary_is_neutral() {
        let engine = ScoringEngine::default();
        let mut posting = full_posting();
        posting.salary_range = None;

        let score = engine.score(&posting, &full_profile());
        assert_eq!(score.salary.score, NEUTRAL_SCORE);

        posting.salary_range = Some("   ".into());
        let score = engine.score(&posting, &full_profile());
        assert_eq!(score.salary.score, NEUTRAL_SCORE);
    }

    #[test]
    fn malformed_experience_entries_recover_to_neutral() {
        let engine = ScoringEngine::default();
        let mut profile = full_profile();
        profile.experience = vec![ExperienceEntry {
            title: "Engineer".into(),
            company: "Acme".into(),
            start_year: 2022,
            end_year: Some(2019),
        }];

        let score = engine.score(&full_posting(), &profile);
        assert_eq!(score.experience.score, NEUTRAL_SCORE);
        assert_eq!(score.experience.status, "UNKNOWN");
        assert!(score.experience.details.contains("could not be computed"));
        // The failure stays local to the dimension.
        assert!(score.total > 0.0);
    }

    #[test]
    fn empty_required_skills_score_zero_for_skills_dimension() {
        let engine = ScoringEngine::default();
        let mut posting = full_posting();
        posting.required_skills.clear();

        let score = engine.score(&posting, &full_profile());
        assert_eq!(score.skills.score, 0.0);
        assert_eq!(score.skills.status, "MISS");
    }

    #[test]
    fn total_stays_in_bounds_for_empty_inputs() {
        let engine = ScoringEngine::default();
        let score = engine.score(&JobPosting::default(), &CandidateProfile::default());
        assert!(score.total >= 0.0 && score.total <= 100.0);
    }
}
