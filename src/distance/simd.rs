//! SIMD-optimized kernels using the `wide` crate.
//!
//! The `wide` crate automatically selects the best available SIMD
//! instruction set at compile time, with a scalar fallback on platforms
//! without SIMD support. All kernels process 8 floats at a time using
//! `f32x8` vectors and handle the remainder with a scalar tail.

use wide::f32x8;

/// Number of f32 elements processed per SIMD iteration.
const SIMD_WIDTH: usize = 8;

/// Convert a slice to a fixed-size array for SIMD.
/// Returns zero array if conversion fails (should never happen with correct loop bounds).
#[inline]
fn slice_to_simd_array(slice: &[f32]) -> [f32; SIMD_WIDTH] {
    slice.try_into().unwrap_or([0.0; SIMD_WIDTH])
}

/// Horizontal sum of an f32x8 SIMD register.
#[inline]
fn horizontal_sum(v: f32x8) -> f32 {
    let arr: [f32; 8] = v.to_array();
    arr.iter().sum()
}

/// Calculate the dot product between two vectors.
///
/// # Panics
///
/// Debug-panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let len = a.len();
    let simd_len = len - (len % SIMD_WIDTH);

    let mut sum = f32x8::ZERO;

    // Process 8 elements at a time
    for i in (0..simd_len).step_by(SIMD_WIDTH) {
        let va = f32x8::new(slice_to_simd_array(&a[i..i + SIMD_WIDTH]));
        let vb = f32x8::new(slice_to_simd_array(&b[i..i + SIMD_WIDTH]));
        sum += va * vb;
    }

    let mut result = horizontal_sum(sum);

    // Handle remaining elements
    for i in simd_len..len {
        result += a[i] * b[i];
    }

    result
}

/// Calculate the sum of squares (squared L2 norm) of a vector.
#[inline]
#[must_use]
pub fn sum_of_squares(v: &[f32]) -> f32 {
    let len = v.len();
    let simd_len = len - (len % SIMD_WIDTH);

    let mut sum = f32x8::ZERO;

    // Process 8 elements at a time
    for i in (0..simd_len).step_by(SIMD_WIDTH) {
        let vv = f32x8::new(slice_to_simd_array(&v[i..i + SIMD_WIDTH]));
        sum += vv * vv;
    }

    let mut result = horizontal_sum(sum);

    // Handle remaining elements
    for i in simd_len..len {
        result += v[i] * v[i];
    }

    result
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
/// The dot product and both norms are accumulated in a single pass over
/// the input.
///
/// # Panics
///
/// Debug-panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let len = a.len();
    let simd_len = len - (len % SIMD_WIDTH);

    let mut dot_sum = f32x8::ZERO;
    let mut norm_a_sum = f32x8::ZERO;
    let mut norm_b_sum = f32x8::ZERO;

    // Process 8 elements at a time, computing dot product and norms together
    for i in (0..simd_len).step_by(SIMD_WIDTH) {
        let va = f32x8::new(slice_to_simd_array(&a[i..i + SIMD_WIDTH]));
        let vb = f32x8::new(slice_to_simd_array(&b[i..i + SIMD_WIDTH]));

        dot_sum += va * vb;
        norm_a_sum += va * va;
        norm_b_sum += vb * vb;
    }

    let mut dot = horizontal_sum(dot_sum);
    let mut norm_a_sq = horizontal_sum(norm_a_sum);
    let mut norm_b_sq = horizontal_sum(norm_b_sum);

    // Handle remaining elements
    for i in simd_len..len {
        dot += a[i] * b[i];
        norm_a_sq += a[i] * a[i];
        norm_b_sq += b[i] * b[i];
    }

    let norm_product = (norm_a_sq * norm_b_sq).sqrt();

    if norm_product == 0.0 {
        return 0.0;
    }

    dot / norm_product
}
