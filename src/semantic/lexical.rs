use std::collections::HashSet;

/// High-signal terms whose co-occurrence on both sides earns a bonus on top
/// of the Jaccard base.
pub const DEFAULT_DOMAIN_KEYWORDS: &[&str] = &[
    "python",
    "machine learning",
    "data science",
    "aws",
    "sql",
    "docker",
    "git",
];

/// Deterministic similarity used whenever the embedding backend is out of
/// play: Jaccard over lowercased word sets plus a capped bonus for shared
/// domain keywords. Needs no external resource.
///
/// Words are whitespace-separated, punctuation kept, so any non-empty text
/// has at least one word and is fully similar to itself.
pub fn lexical_similarity(a: &str, b: &str, domain_keywords: &[String]) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();

    let a_words: HashSet<&str> = a_lower.split_whitespace().collect();
    let b_words: HashSet<&str> = b_lower.split_whitespace().collect();

    if a_words.is_empty() && b_words.is_empty() {
        return 0.0;
    }

    let intersection = a_words.intersection(&b_words).count();
    let union = a_words.union(&b_words).count();
    let jaccard = if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    };

    let shared_keywords = domain_keywords
        .iter()
        .filter(|keyword| {
            let keyword = keyword.to_lowercase();
            !keyword.is_empty() && a_lower.contains(&keyword) && b_lower.contains(&keyword)
        })
        .count();
    let bonus = (0.05 * shared_keywords as f64).min(0.2);

    (jaccard + bonus).min(1.0)
}
