use std::hash::{Hash, Hasher};

use rayon::prelude::*;
use siphasher::sip::SipHasher13;

use crate::error::BackendError;
use crate::normalize::tokenize;

/// The narrow capability the engine needs from any embedding provider:
/// map text to a fixed-length vector, one at a time or batched. `name` and
/// `version` identify the implementation in audit logs.
pub trait EmbeddingBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Bump when the token design or model generation changes.
    fn version(&self) -> &str;

    fn dimension(&self) -> usize;

    fn encode_one(&self, text: &str) -> Result<Vec<f32>, BackendError>;

    /// Encode a batch in one call. The default loops over `encode_one`;
    /// implementations with real batch inference should override.
    fn encode_many(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BackendError> {
        texts.iter().map(|text| self.encode_one(text)).collect()
    }
}

// Fixed seeds keep the hash deterministic across processes and Rust
// versions. Changing them changes every embedding; bump version() with them.
const HASH_SEED_K0: u64 = 0x6a6f_6266_6974_2d6b;
const HASH_SEED_K1: u64 = 0x3045_98f1_c2d7_ab31;

/// Deterministic feature-hashing encoder: no model artifact, no training,
/// O(tokens) per text. SipHash-1-3 with fixed keys buckets each token, sign
/// hashing spreads collisions, and the result is L2-normalized.
pub struct HashEmbeddingBackend {
    dimension: usize,
}

impl HashEmbeddingBackend {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash_token(&self, token: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimension
    }

    fn sign(&self, token: &str) -> f32 {
        if self.hash_token(&format!("{token}_sign")) % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }
}

impl EmbeddingBackend for HashEmbeddingBackend {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn version(&self) -> &str {
        "v1"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode_one(&self, text: &str) -> Result<Vec<f32>, BackendError> {
        let mut tokens = tokenize(text);
        if tokens.is_empty() {
            // Symbol-only input still gets a stable non-zero vector, so any
            // non-empty text remains fully similar to itself.
            tokens = vec![text.trim().to_lowercase()];
        }

        let mut vector = vec![0.0f32; self.dimension];
        for token in &tokens {
            let idx = self.hash_token(token);
            vector[idx] += self.sign(token);
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }

    /// Encoding dominates batch latency, so the batch fans out over the
    /// bounded worker pool. Result order matches input order.
    fn encode_many(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BackendError> {
        texts
            .par_iter()
            .map(|text| self.encode_one(text))
            .collect()
    }
}
