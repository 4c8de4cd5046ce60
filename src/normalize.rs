use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static RE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s]+").unwrap());

/// Canonical text form used by every rule-based comparison: NFKC, lowercase,
/// punctuation to whitespace, runs of whitespace collapsed, trimmed.
pub fn normalize_text(text: &str) -> String {
    let folded: String = text.nfkc().collect::<String>().to_lowercase();
    let stripped = RE_PUNCT.replace_all(&folded, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized tokens, in input order.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize_text(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Normalized tokens as a set, for overlap checks.
pub fn token_set(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize_text("Node.js / React!"), "node js react");
        assert_eq!(normalize_text("C++, C#"), "c c");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize_text("  senior\t\tengineer \n"), "senior engineer");
    }

    #[test]
    fn folds_fullwidth_via_nfkc() {
        assert_eq!(normalize_text("ＡＷＳ"), "aws");
    }

    #[test]
    fn empty_and_symbol_only_inputs_normalize_to_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("!!! ***"), "");
        assert!(tokenize("??").is_empty());
    }

    #[test]
    fn token_set_deduplicates() {
        let set = token_set("python, Python; PYTHON sql");
        assert_eq!(set.len(), 2);
        assert!(set.contains("python"));
        assert!(set.contains("sql"));
    }
}
