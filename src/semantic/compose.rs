use crate::{CandidateProfile, DegreeLevel, JobPosting};

/// Composite resume text fed to the similarity engine: skills, positions,
/// education and the current role folded into one document.
pub fn profile_text(profile: &CandidateProfile) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !profile.skills.is_empty() {
        parts.push(format!("Skills: {}", profile.skills.join(", ")));
    }

    for entry in &profile.experience {
        if entry.title.is_empty() && entry.company.is_empty() {
            continue;
        }
        parts.push(format!("Experience: {} at {}.", entry.title, entry.company));
    }

    for entry in &profile.education {
        let degree = entry.level.map(degree_name).unwrap_or("Studies");
        parts.push(format!(
            "Education: {} in {} from {}.",
            degree, entry.field, entry.institution
        ));
    }

    if !profile.current_position.is_empty() {
        parts.push(format!("Current position: {}.", profile.current_position));
    }

    parts.join(" ")
}

/// Composite posting text: title, description, requirements and location.
pub fn posting_text(posting: &JobPosting) -> String {
    let mut parts: Vec<String> = Vec::new();

    if !posting.title.is_empty() {
        parts.push(format!("Job Title: {}.", posting.title));
    }
    if !posting.description.is_empty() {
        parts.push(format!("Job Description: {}", posting.description));
    }
    if !posting.required_skills.is_empty() {
        parts.push(format!(
            "Required Skills: {}.",
            posting.required_skills.join(", ")
        ));
    }
    if !posting.location.is_empty() {
        parts.push(format!("Location: {}.", posting.location));
    }

    parts.join(" ")
}

fn degree_name(level: DegreeLevel) -> &'static str {
    match level {
        DegreeLevel::Bachelor => "Bachelor's degree",
        DegreeLevel::Master => "Master's degree",
        DegreeLevel::Doctorate => "Doctorate",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EducationEntry, ExperienceEntry};

    #[test]
    fn profile_text_folds_all_sections() {
        let profile = CandidateProfile {
            skills: vec!["Python".into(), "SQL".into()],
            experience: vec![ExperienceEntry {
                title: "Data Engineer".into(),
                company: "Acme".into(),
                start_year: 2019,
                end_year: None,
            }],
            education: vec![EducationEntry {
                level: Some(DegreeLevel::Master),
                field: "Statistics".into(),
                institution: "State".into(),
                year: Some(2018),
            }],
            location: "Toronto".into(),
            years_of_experience: 6,
            current_position: "Data Engineer".into(),
        };

        let text = profile_text(&profile);
        assert!(text.contains("Skills: Python, SQL"));
        assert!(text.contains("Data Engineer at Acme"));
        assert!(text.contains("Master's degree in Statistics"));
        assert!(text.contains("Current position: Data Engineer"));
    }

    #[test]
    fn posting_text_skips_empty_fields() {
        let posting = JobPosting {
            source_id: "board:1".into(),
            title: "Data Engineer".into(),
            description: String::new(),
            required_skills: vec!["python".into()],
            location: String::new(),
            salary_range: None,
        };

        let text = posting_text(&posting);
        assert!(text.contains("Job Title: Data Engineer"));
        assert!(text.contains("Required Skills: python"));
        assert!(!text.contains("Job Description"));
        assert!(!text.contains("Location:"));
    }

    #[test]
    fn empty_inputs_compose_to_empty_text() {
        assert!(profile_text(&CandidateProfile::default()).is_empty());
        assert!(posting_text(&JobPosting::default()).is_empty());
    }
}
