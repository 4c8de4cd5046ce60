use std::collections::HashSet;

use crate::normalize::normalize_text;
use crate::taxonomy::SkillTaxonomy;

#[derive(Debug, Clone, PartialEq)]
pub struct SkillMatchResult {
    pub match_ratio: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub details: String,
}

/// Required-skill coverage: direct normalized-string matches unioned with
/// taxonomy-category matches. A required skill counts as matched when any
/// candidate skill shares a category with it, even without literal equality
/// (category co-membership is deliberately generous; see the tests).
///
/// An empty requirement list scores 0.0: a posting that states no
/// requirements cannot be matched, which is distinct from the neutral 0.5
/// used for genuinely missing data elsewhere.
pub fn match_required_skills(
    required: &[String],
    possessed: &[String],
    taxonomy: &SkillTaxonomy,
) -> SkillMatchResult {
    let required_set: HashSet<String> = required
        .iter()
        .map(|s| normalize_text(s))
        .filter(|s| !s.is_empty())
        .collect();

    if required_set.is_empty() {
        return SkillMatchResult {
            match_ratio: 0.0,
            matched: vec![],
            missing: vec![],
            details: "posting lists no required skills".into(),
        };
    }

    let possessed_set: HashSet<String> = possessed
        .iter()
        .map(|s| normalize_text(s))
        .filter(|s| !s.is_empty())
        .collect();

    let candidate_categories: HashSet<String> = possessed_set
        .iter()
        .flat_map(|skill| taxonomy.categories(skill))
        .collect();

    let mut matched: Vec<String> = Vec::new();
    let mut missing: Vec<String> = Vec::new();
    for skill in &required_set {
        let direct = possessed_set.contains(skill);
        let mapped =
            !direct && !taxonomy.categories(skill).is_disjoint(&candidate_categories);
        if direct || mapped {
            matched.push(skill.clone());
        } else {
            missing.push(skill.clone());
        }
    }
    matched.sort();
    missing.sort();

    let match_ratio = (matched.len() as f64 / required_set.len() as f64).min(1.0);

    SkillMatchResult {
        match_ratio,
        details: format!(
            "{}/{} required skills covered ({:.0}%) (matched: {} / missing: {})",
            matched.len(),
            required_set.len(),
            match_ratio * 100.0,
            join_or_none(&matched),
            join_or_none(&missing),
        ),
        matched,
        missing,
    }
}

fn join_or_none(skills: &[String]) -> String {
    if skills.is_empty() {
        "none".into()
    } else {
        skills.join(", ")
    }
}
