use crate::normalize::{normalize_text, token_set};

#[derive(Debug, Clone, PartialEq)]
pub struct LocationEvaluation {
    pub score: f64,
    pub details: String,
}

/// Location compatibility ladder, most specific rung first:
/// exact normalized match 1.0, remote posting 0.9, token overlap 0.8, same
/// country 0.6, otherwise 0.3. Either side missing is neutral 0.5.
pub fn evaluate_location(
    posting_location: &str,
    candidate_location: &str,
    countries: &[String],
) -> LocationEvaluation {
    let posting = normalize_text(posting_location);
    let candidate = normalize_text(candidate_location);

    if posting.is_empty() || candidate.is_empty() {
        return LocationEvaluation {
            score: 0.5,
            details: "location missing on one side - neutral score".into(),
        };
    }

    if posting == candidate {
        return LocationEvaluation {
            score: 1.0,
            details: format!("exact location match: {posting}"),
        };
    }

    if posting.contains("remote") || posting.contains("anywhere") {
        return LocationEvaluation {
            score: 0.9,
            details: format!("posting is location-independent: {posting}"),
        };
    }

    let posting_tokens = token_set(&posting);
    let candidate_tokens = token_set(&candidate);
    let mut shared: Vec<&String> = posting_tokens.intersection(&candidate_tokens).collect();
    if !shared.is_empty() {
        shared.sort();
        return LocationEvaluation {
            score: 0.8,
            details: format!(
                "locations overlap on: {}",
                shared
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
    }

    let posting_country = detect_country(&posting, countries);
    let candidate_country = detect_country(&candidate, countries);
    if let (Some(pc), Some(cc)) = (posting_country, candidate_country) {
        if pc == cc {
            return LocationEvaluation {
                score: 0.6,
                details: format!("same country: {pc}"),
            };
        }
    }

    LocationEvaluation {
        score: 0.3,
        details: format!("no location affinity: {posting} vs {candidate}"),
    }
}

/// First table entry contained in the normalized location, mirroring the
/// coarse country resolution of the keyword table.
fn detect_country<'a>(normalized_location: &str, countries: &'a [String]) -> Option<&'a str> {
    countries
        .iter()
        .map(String::as_str)
        .find(|country| normalized_location.contains(&normalize_text(country)))
}
