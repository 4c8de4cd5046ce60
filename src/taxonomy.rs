use std::collections::{HashMap, HashSet};

use strsim::damerau_levenshtein;

use crate::normalize::normalize_text;

/// Category table shipped with the crate. Callers with their own taxonomy
/// pass a different table to [`SkillTaxonomy::new`]; the scoring rules never
/// reach into this constant directly.
pub const DEFAULT_TAXONOMY: &[(&str, &[&str])] = &[
    (
        "python",
        &[
            "python",
            "django",
            "flask",
            "fastapi",
            "pandas",
            "numpy",
            "scikit-learn",
            "tensorflow",
            "pytorch",
        ],
    ),
    (
        "javascript",
        &[
            "javascript",
            "js",
            "node.js",
            "react",
            "vue",
            "angular",
            "typescript",
        ],
    ),
    ("java", &["java", "spring", "android", "kotlin"]),
    (
        "sql",
        &["sql", "mysql", "postgresql", "oracle", "mongodb", "database"],
    ),
    (
        "aws",
        &["aws", "amazon web services", "ec2", "s3", "lambda", "cloud"],
    ),
    ("docker", &["docker", "kubernetes", "containerization"]),
    ("git", &["git", "github", "gitlab", "version control"]),
    (
        "machine learning",
        &[
            "machine learning",
            "ml",
            "ai",
            "artificial intelligence",
            "deep learning",
            "neural networks",
        ],
    ),
    (
        "data science",
        &["data science", "data analysis", "statistics", "analytics"],
    ),
    (
        "devops",
        &["devops", "ci/cd", "jenkins", "terraform", "ansible"],
    ),
];

/// Static mapping from skill synonyms to the categories they belong to.
/// Pure lookup over a table supplied at construction; no mutation, no I/O.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    synonym_to_categories: HashMap<String, HashSet<String>>,
    compact_to_categories: HashMap<String, HashSet<String>>,
}

fn compact_key(normalized: &str) -> String {
    normalized.chars().filter(|c| !c.is_whitespace()).collect()
}

impl SkillTaxonomy {
    pub fn new(table: &[(&str, &[&str])]) -> Self {
        let mut synonym_to_categories: HashMap<String, HashSet<String>> = HashMap::new();
        let mut compact_to_categories: HashMap<String, HashSet<String>> = HashMap::new();

        for (category, synonyms) in table {
            let category = normalize_text(category);
            for synonym in synonyms.iter().copied().chain(std::iter::once(category.as_str())) {
                let normalized = normalize_text(synonym);
                if normalized.is_empty() {
                    continue;
                }
                synonym_to_categories
                    .entry(normalized.clone())
                    .or_default()
                    .insert(category.clone());
                compact_to_categories
                    .entry(compact_key(&normalized))
                    .or_default()
                    .insert(category.clone());
            }
        }

        Self {
            synonym_to_categories,
            compact_to_categories,
        }
    }

    /// Every category the skill belongs to; empty set when the taxonomy does
    /// not know the skill. A skill may belong to more than one category.
    pub fn categories(&self, skill: &str) -> HashSet<String> {
        let normalized = normalize_text(skill);
        if normalized.is_empty() {
            return HashSet::new();
        }

        if let Some(categories) = self.synonym_to_categories.get(&normalized) {
            return categories.clone();
        }

        let compact = compact_key(&normalized);
        if let Some(categories) = self.compact_to_categories.get(&compact) {
            return categories.clone();
        }

        self.fuzzy_categories(&compact)
    }

    /// Damerau-Levenshtein tolerance for minor typos. Short tokens are only
    /// matched exactly: fuzzing brief inputs (js, go, ml) produces false
    /// positives faster than it fixes typos.
    fn fuzzy_categories(&self, compact: &str) -> HashSet<String> {
        if compact.len() < 5 {
            return HashSet::new();
        }

        let mut best: Option<(&HashSet<String>, usize)> = None;
        for (alias, categories) in &self.compact_to_categories {
            if alias.len() < 5 {
                continue;
            }

            let distance = damerau_levenshtein(compact, alias);
            let len = compact.len().max(alias.len());
            let acceptable = distance == 1 || (len >= 8 && distance == 2);
            if !acceptable {
                continue;
            }

            match best {
                None => best = Some((categories, distance)),
                Some((_, best_dist)) if distance < best_dist => {
                    best = Some((categories, distance))
                }
                _ => {}
            }
        }

        best.map(|(categories, _)| categories.clone())
            .unwrap_or_default()
    }

    /// Whether two skills share at least one category.
    pub fn share_category(&self, a: &str, b: &str) -> bool {
        let categories_a = self.categories(a);
        if categories_a.is_empty() {
            return false;
        }
        !categories_a.is_disjoint(&self.categories(b))
    }
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        Self::new(DEFAULT_TAXONOMY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_map_into_their_category() {
        let taxonomy = SkillTaxonomy::default();
        assert!(taxonomy.categories("django").contains("python"));
        assert!(taxonomy.categories("React").contains("javascript"));
        assert!(taxonomy.categories("kubernetes").contains("docker"));
        // Not an alias in the default table, and too short to fuzz.
        assert!(taxonomy.categories("K8s").is_empty());
    }

    #[test]
    fn a_skill_may_belong_to_multiple_categories() {
        let taxonomy = SkillTaxonomy::new(&[
            ("python", &["python", "pandas"]),
            ("data science", &["pandas", "statistics"]),
        ]);

        let categories = taxonomy.categories("pandas");
        assert!(categories.contains("python"));
        assert!(categories.contains("data science"));
    }

    #[test]
    fn unknown_skill_has_no_categories() {
        let taxonomy = SkillTaxonomy::default();
        assert!(taxonomy.categories("cobol").is_empty());
        assert!(taxonomy.categories("").is_empty());
    }

    #[test]
    fn separator_noise_is_tolerated() {
        let taxonomy = SkillTaxonomy::default();
        assert!(taxonomy.categories("Node.JS").contains("javascript"));
        assert!(taxonomy.categories("amazon  web  services").contains("aws"));
    }

    #[test]
    fn small_typos_match_longer_aliases_only() {
        let taxonomy = SkillTaxonomy::default();
        assert!(taxonomy.categories("kuberntes").contains("docker"));
        assert!(taxonomy.categories("tensorflw").contains("python"));
        // Short tokens never fuzz.
        assert!(taxonomy.categories("jss").is_empty());
        assert!(taxonomy.categories("sqll").is_empty());
    }

    #[test]
    fn share_category_links_sibling_skills() {
        let taxonomy = SkillTaxonomy::default();
        assert!(taxonomy.share_category("django", "flask"));
        assert!(!taxonomy.share_category("django", "kubernetes"));
        assert!(!taxonomy.share_category("cobol", "fortran"));
    }
}
