//! Similarity Engine — cosine similarity and its batch variants.

/// Cosine similarity in [-1, 1], accumulated in f64.
///
/// A zero vector or a length mismatch has no defined similarity; both yield 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let sim = dot / (norm_a.sqrt() * norm_b.sqrt());
    if sim.is_finite() {
        sim.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

/// One similarity per candidate, identical to calling `cosine_similarity` pairwise.
pub fn batch_similarity(query: &[f32], candidates: &[Vec<f32>]) -> Vec<f64> {
    candidates
        .iter()
        .map(|candidate| cosine_similarity(query, candidate))
        .collect()
}

/// Full pairwise matrix: `matrix[i][j] = cosine_similarity(rows[i], cols[j])`.
pub fn similarity_matrix(rows: &[Vec<f32>], cols: &[Vec<f32>]) -> Vec<Vec<f64>> {
    rows.iter().map(|row| batch_similarity(row, cols)).collect()
}
