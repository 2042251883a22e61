//! Scalar (non-SIMD) kernels.
//!
//! Fallback implementations used when the `scalar` feature is enabled,
//! mainly for debugging and for validating the SIMD kernels.

/// Calculate the dot product between two vectors.
///
/// # Panics
///
/// Debug-panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Calculate the sum of squares (squared L2 norm) of a vector.
#[inline]
#[must_use]
pub fn sum_of_squares(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum()
}

/// Calculate the cosine similarity between two vectors.
///
/// Returns a value in the range [-1, 1] where:
/// - 1 means identical direction
/// - 0 means orthogonal
/// - -1 means opposite direction
///
/// Returns 0.0 if either vector has zero magnitude.
///
/// # Panics
///
/// Debug-panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let dot = dot_product(a, b);
    let norm_product = (sum_of_squares(a) * sum_of_squares(b)).sqrt();

    if norm_product == 0.0 {
        return 0.0;
    }

    dot / norm_product
}
