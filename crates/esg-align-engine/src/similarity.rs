//! Cosine similarity over sparse TF-IDF rows.

use crate::tfidf::SparseVector;

/// Cosine of the angle between `a` and `b`; 0 when either has zero norm.
pub fn cosine_sim(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

/// Dense `left.len() × right.len()` similarity matrix, row-major.
pub fn cosine_matrix(left: &[SparseVector], right: &[SparseVector]) -> Vec<Vec<f64>> {
    left.iter()
        .map(|l| right.iter().map(|r| cosine_sim(l, r)).collect())
        .collect()
}

/// Arithmetic mean over every entry of the matrix, clamped to `[0, 1]`.
///
/// Every pair counts equally; no row or column is privileged. Returns 0 for an
/// empty matrix.
pub fn mean_similarity(matrix: &[Vec<f64>]) -> f64 {
    let count: usize = matrix.iter().map(Vec::len).sum();
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = matrix.iter().flatten().sum();
    (sum / count as f64).clamp(0.0, 1.0)
}
