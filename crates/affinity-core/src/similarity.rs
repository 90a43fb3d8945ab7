// ─────────────────────────────────────────────────────────────────────
// Affinity Kernel — Vector Similarity
// ─────────────────────────────────────────────────────────────────────
//! Cosine similarity with a zero-vector policy: if either operand has
//! zero magnitude the similarity is exactly 0.

use affinity_types::{AffinityError, AffinityResult};

#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean norm.
#[inline]
pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Cosine similarity given precomputed norms.
///
/// Used by the engine, which caches one norm per agent per cycle.
#[inline]
pub fn cosine_with_norms(a: &[f64], b: &[f64], norm_a: f64, norm_b: f64) -> f64 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Cosine of the angle between `a` and `b`, in [-1, 1].
///
/// # Panics
///
/// Panics if the slices differ in length.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(
        a.len(),
        b.len(),
        "cosine_similarity: vector lengths differ ({} vs {})",
        a.len(),
        b.len()
    );
    cosine_with_norms(a, b, norm(a), norm(b))
}

/// Length-checked variant of [`cosine_similarity`].
pub fn checked_cosine_similarity(a: &[f64], b: &[f64]) -> AffinityResult<f64> {
    if a.len() != b.len() {
        return Err(AffinityError::dimension("cosine similarity", a.len(), b.len()));
    }
    Ok(cosine_with_norms(a, b, norm(a), norm(b)))
}

/// Index of the center most similar to `v`; ties go to the lowest index.
///
/// Returns 0 for an empty center list.
pub fn nearest_center(v: &[f64], centers: &[Vec<f64>]) -> usize {
    let nv = norm(v);
    let mut best = 0;
    let mut best_sim = f64::NEG_INFINITY;
    for (idx, c) in centers.iter().enumerate() {
        let sim = cosine_with_norms(v, c, nv, norm(c));
        if sim > best_sim {
            best_sim = sim;
            best = idx;
        }
    }
    best
}
