/// Cosine similarity clamped to [0.0, 1.0]. Floating-point drift can push a
/// normalized dot product slightly outside the range, so the clamp is part of
/// the contract.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut sq_a = 0.0f32;
    let mut sq_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        sq_a += x * x;
        sq_b += y * y;
    }

    if sq_a == 0.0 || sq_b == 0.0 {
        return 0.0;
    }

    (dot / (sq_a.sqrt() * sq_b.sqrt())).clamp(0.0, 1.0)
}
