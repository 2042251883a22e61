//! Cosine similarity kernels.
//!
//! This module provides both SIMD-optimized and scalar implementations of
//! the vector kernels the similarity scan is built on.
//!
//! # SIMD Optimization
//!
//! When the `simd` feature is enabled (default), the kernels use the `wide`
//! crate for portable SIMD that works across:
//! - x86/x86_64: SSE2, SSE4.1, AVX, AVX2
//! - ARM: NEON
//! - WebAssembly: SIMD128
//!
//! Eight floats are processed per iteration using `f32x8` vectors, with a
//! scalar tail for the remainder.
//!
//! # Zero vectors
//!
//! Cosine similarity against a zero-magnitude vector is defined as 0.0. A
//! zero embedding is a degenerate valid input, not a fault, so the kernels
//! never produce NaN for it.
//!
//! # Features
//!
//! - `simd` (default): SIMD-optimized kernels
//! - `scalar`: force scalar kernels (useful for debugging)

#[cfg(not(feature = "scalar"))]
mod simd;

#[cfg(feature = "scalar")]
mod scalar;

// Re-export the appropriate implementation
#[cfg(not(feature = "scalar"))]
pub use simd::{cosine_similarity, dot_product, sum_of_squares};

#[cfg(feature = "scalar")]
pub use scalar::{cosine_similarity, dot_product, sum_of_squares};

/// Calculate the L2 norm (magnitude) of a vector.
#[inline]
#[must_use]
pub fn l2_norm(v: &[f32]) -> f32 {
    sum_of_squares(v).sqrt()
}

/// Calculate the cosine similarity using pre-computed norms.
///
/// This is more efficient when the same vector is compared against many
/// others, as each norm only needs to be computed once.
///
/// Returns `None` if either norm is zero; callers that want the defined
/// zero-vector semantics map this to 0.0.
///
/// # Panics
///
/// Debug-panics if vectors have different lengths.
#[inline]
#[must_use]
pub fn cosine_similarity_with_norms(a: &[f32], b: &[f32], norm_a: f32, norm_b: f32) -> Option<f32> {
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }

    let dot = dot_product(a, b);
    Some(dot / (norm_a * norm_b))
}

/// Pre-computed L2 norm for efficient repeated cosine similarity calculations.
///
/// When comparing a query vector against every index entry, computing the
/// query's norm once and reusing it avoids a full pass per comparison. The
/// store caches one of these per entry for the same reason.
#[derive(Debug, Clone, Copy)]
pub struct CachedNorm {
    norm_squared: f32,
    norm: f32,
}

impl CachedNorm {
    /// Compute and cache the L2 norm of a vector.
    #[must_use]
    pub fn new(v: &[f32]) -> Self {
        let norm_squared = sum_of_squares(v);
        let norm = norm_squared.sqrt();
        Self { norm_squared, norm }
    }

    /// Get the cached L2 norm.
    #[inline]
    #[must_use]
    pub const fn norm(&self) -> f32 {
        self.norm
    }

    /// Get the cached squared L2 norm.
    #[inline]
    #[must_use]
    pub const fn norm_squared(&self) -> f32 {
        self.norm_squared
    }

    /// Check if the vector has zero magnitude.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.norm == 0.0
    }
}
