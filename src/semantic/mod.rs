pub mod backend;
pub mod compose;
pub mod config;
pub mod lexical;
pub mod similarity;

pub use backend::{EmbeddingBackend, HashEmbeddingBackend};
pub use compose::{posting_text, profile_text};
pub use config::{load_config_from_env, SemanticConfig};

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::OnceCell;
use tracing::{info, warn};

use crate::error::{BackendError, InputValidationError};
use lexical::lexical_similarity;
use similarity::cosine_similarity;

pub type BackendFactory =
    Box<dyn Fn() -> Result<Box<dyn EmbeddingBackend>, BackendError> + Send + Sync>;

/// Topical similarity between two arbitrary texts, independent of the
/// rule-based subscores. Owns a lazily-initialized backend handle: the
/// backend is constructed at most once per engine, on first use, and both an
/// initialization failure and a runtime encode failure permanently switch
/// the engine to the deterministic lexical fallback.
pub struct SemanticSimilarityEngine {
    config: SemanticConfig,
    factory: BackendFactory,
    // Written exactly once at lazy init; read thereafter. `None` caches an
    // initialization failure so it is never re-attempted.
    backend: OnceCell<Option<Box<dyn EmbeddingBackend>>>,
    lexical_only: AtomicBool,
}

impl SemanticSimilarityEngine {
    pub fn new(config: SemanticConfig, factory: BackendFactory) -> Self {
        Self {
            config,
            factory,
            backend: OnceCell::new(),
            lexical_only: AtomicBool::new(false),
        }
    }

    /// Engine over the built-in deterministic feature-hashing backend.
    pub fn with_default_backend(config: SemanticConfig) -> Self {
        let dimension = config.dimension;
        Self::new(
            config,
            Box::new(move || {
                Ok(Box::new(HashEmbeddingBackend::new(dimension)) as Box<dyn EmbeddingBackend>)
            }),
        )
    }

    /// Similarity of two texts in [0.0, 1.0]. Empty or whitespace-only input
    /// on either side is the caller's error, never a silent zero.
    pub fn similarity(&self, a: &str, b: &str) -> Result<f64, InputValidationError> {
        validate_text("first", a)?;
        validate_text("second", b)?;

        if let Some(backend) = self.backend() {
            match backend.encode_many(&[a, b]) {
                Ok(vectors) if vectors.len() == 2 => {
                    return Ok(f64::from(cosine_similarity(&vectors[0], &vectors[1])));
                }
                Ok(vectors) => self.switch_to_lexical(&BackendError::EncodeFailed(format!(
                    "expected 2 vectors, got {}",
                    vectors.len()
                ))),
                Err(err) => self.switch_to_lexical(&err),
            }
        }

        Ok(lexical_similarity(a, b, &self.config.domain_keywords))
    }

    /// One similarity per document, in input order. The query is encoded
    /// once and the documents in a single batched call. An empty document
    /// list is an empty result with no backend call.
    pub fn similarity_batch(
        &self,
        query: &str,
        documents: &[&str],
    ) -> Result<Vec<f64>, InputValidationError> {
        validate_text("query", query)?;
        for (index, document) in documents.iter().enumerate() {
            if document.trim().is_empty() {
                return Err(InputValidationError::EmptyDocument { index });
            }
        }
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(backend) = self.backend() {
            let encoded = backend
                .encode_one(query)
                .and_then(|q| backend.encode_many(documents).map(|docs| (q, docs)));
            match encoded {
                Ok((query_vec, doc_vecs)) if doc_vecs.len() == documents.len() => {
                    return Ok(doc_vecs
                        .iter()
                        .map(|doc| f64::from(cosine_similarity(&query_vec, doc)))
                        .collect());
                }
                Ok((_, doc_vecs)) => {
                    self.switch_to_lexical(&BackendError::EncodeFailed(format!(
                        "expected {} vectors, got {}",
                        documents.len(),
                        doc_vecs.len()
                    )))
                }
                Err(err) => self.switch_to_lexical(&err),
            }
        }

        Ok(documents
            .iter()
            .map(|document| lexical_similarity(query, document, &self.config.domain_keywords))
            .collect())
    }

    /// Whether calls are currently served by the lexical fallback.
    pub fn using_lexical_fallback(&self) -> bool {
        self.lexical_only.load(Ordering::Relaxed)
            || matches!(self.backend.get(), Some(None))
    }

    fn backend(&self) -> Option<&dyn EmbeddingBackend> {
        if self.lexical_only.load(Ordering::Relaxed) {
            return None;
        }

        self.backend
            .get_or_init(|| match (self.factory)() {
                Ok(backend) => {
                    info!(
                        backend = backend.name(),
                        version = backend.version(),
                        dimension = backend.dimension(),
                        "embedding backend initialized"
                    );
                    Some(backend)
                }
                Err(err) => {
                    warn!(
                        error = %err,
                        "embedding backend unavailable; serving lexical fallback for the process lifetime"
                    );
                    None
                }
            })
            .as_deref()
    }

    fn switch_to_lexical(&self, err: &BackendError) {
        // Log only the first transition; later calls go straight to lexical.
        if !self.lexical_only.swap(true, Ordering::Relaxed) {
            warn!(
                error = %err,
                "embedding backend call failed; switching to lexical fallback permanently"
            );
        }
    }
}

fn validate_text(side: &'static str, text: &str) -> Result<(), InputValidationError> {
    if text.trim().is_empty() {
        return Err(InputValidationError::EmptyText { side });
    }
    Ok(())
}
