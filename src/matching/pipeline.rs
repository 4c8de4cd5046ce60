use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::scoring::{MatchScore, ScoringEngine};
use crate::semantic::{posting_text, profile_text, SemanticSimilarityEngine};
use crate::{CandidateProfile, JobPosting};

/// A posting with its compatibility score attached. Always a new value; the
/// input posting is never written to.
///
/// `semantic_score` is a complementary text-similarity signal, not part of
/// the weighted total; it is populated only by
/// [`BatchScorer::score_all_with_semantic`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPosting {
    pub posting: JobPosting,
    pub overall_score: f64,
    pub subscores: MatchScore,
    pub semantic_score: Option<f64>,
}

/// Summary statistics over one scored batch. `min`/`max`/`mean` are absent
/// for an empty batch rather than raising a division error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStats {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl BatchStats {
    fn from_scored(scored: &[ScoredPosting]) -> Self {
        if scored.is_empty() {
            return Self {
                count: 0,
                min: None,
                max: None,
                mean: None,
            };
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for item in scored {
            min = min.min(item.overall_score);
            max = max.max(item.overall_score);
            sum += item.overall_score;
        }

        Self {
            count: scored.len(),
            min: Some(min),
            max: Some(max),
            mean: Some(round_one_decimal(sum / scored.len() as f64)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredBatch {
    /// Sorted descending by score; equal scores keep their input order.
    pub postings: Vec<ScoredPosting>,
    pub stats: BatchStats,
    pub scored_at: DateTime<Utc>,
}

/// Scores a profile against a collection of postings and ranks the results.
/// Each posting is scored independently; scoring one alone through
/// [`ScoringEngine::score`] gives the identical number.
#[derive(Default)]
pub struct BatchScorer {
    engine: ScoringEngine,
}

impl BatchScorer {
    pub fn new(engine: ScoringEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn score_all(&self, profile: &CandidateProfile, postings: &[JobPosting]) -> ScoredBatch {
        self.score_all_cancellable(profile, postings, &AtomicBool::new(false))
    }

    /// Like [`Self::score_all`], but stops between postings once `cancel` is
    /// set. Cancellation is advisory: postings scored before the flag was
    /// observed remain valid and are returned, sorted, with statistics over
    /// the partial set.
    pub fn score_all_cancellable(
        &self,
        profile: &CandidateProfile,
        postings: &[JobPosting],
        cancel: &AtomicBool,
    ) -> ScoredBatch {
        let mut scored = Vec::with_capacity(postings.len());
        for posting in postings {
            if cancel.load(AtomicOrdering::Relaxed) {
                info!(
                    scored = scored.len(),
                    remaining = postings.len() - scored.len(),
                    "batch scoring cancelled; returning partial results"
                );
                break;
            }

            let subscores = self.engine.score(posting, profile);
            debug!(
                posting_id = %posting.source_id,
                score = subscores.total,
                "posting scored"
            );
            scored.push(ScoredPosting {
                posting: posting.clone(),
                overall_score: subscores.total,
                subscores,
                semantic_score: None,
            });
        }

        // Stable sort: equal scores preserve original relative order.
        scored.sort_by(|a, b| {
            b.overall_score
                .partial_cmp(&a.overall_score)
                .unwrap_or(Ordering::Equal)
        });

        ScoredBatch {
            stats: BatchStats::from_scored(&scored),
            postings: scored,
            scored_at: Utc::now(),
        }
    }

    /// [`Self::score_all`] plus the complementary semantic signal: composite
    /// profile and posting texts are compared through `semantic`, and each
    /// result carries its similarity next to the rule-based total. Ranking
    /// is still by `overall_score` alone. Postings that compose to empty
    /// text keep `semantic_score` absent.
    pub fn score_all_with_semantic(
        &self,
        profile: &CandidateProfile,
        postings: &[JobPosting],
        semantic: &SemanticSimilarityEngine,
    ) -> ScoredBatch {
        let mut batch = self.score_all(profile, postings);

        let query = profile_text(profile);
        if query.trim().is_empty() {
            debug!("profile composes to empty text; skipping semantic scores");
            return batch;
        }

        let mut indices = Vec::new();
        let mut documents = Vec::new();
        for (index, scored) in batch.postings.iter().enumerate() {
            let text = posting_text(&scored.posting);
            if !text.trim().is_empty() {
                indices.push(index);
                documents.push(text);
            }
        }

        let document_refs: Vec<&str> = documents.iter().map(String::as_str).collect();
        match semantic.similarity_batch(&query, &document_refs) {
            Ok(scores) => {
                for (index, score) in indices.into_iter().zip(scores) {
                    batch.postings[index].semantic_score = Some(score);
                }
            }
            Err(err) => {
                warn!(error = %err, "semantic batch scoring failed; leaving semantic scores absent");
            }
        }

        batch
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
