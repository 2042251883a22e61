//! Embedding type for the image index.

use std::ops::Deref;

use crate::error::MatchError;

/// A feature vector summarizing an image's visual content.
///
/// Embeddings are fixed-dimension vectors of f32 values produced by an
/// external extractor and compared by cosine similarity. The values are
/// stored as a contiguous array for SIMD-friendly memory layout.
///
/// A zero embedding is a degenerate but valid input: its cosine similarity
/// against any vector is defined as 0.0.
///
/// # Example
///
/// ```
/// use visimatch::types::Embedding;
///
/// let embedding = Embedding::new(vec![1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(embedding.dimension(), 3);
/// assert_eq!(embedding.as_slice(), &[1.0, 2.0, 3.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    data: Vec<f32>,
}

impl Embedding {
    /// Create a new embedding from a vector of f32 values.
    ///
    /// # Errors
    ///
    /// Returns an error if the vector is empty or contains NaN/Infinite values.
    pub fn new(data: Vec<f32>) -> Result<Self, MatchError> {
        if data.is_empty() {
            return Err(MatchError::InvalidDimension { expected: 1, actual: 0 });
        }

        // Check for NaN or Infinite values
        for (i, &value) in data.iter().enumerate() {
            if !value.is_finite() {
                return Err(MatchError::InvalidValue {
                    index: i,
                    value,
                    reason: if value.is_nan() {
                        "NaN values are not allowed"
                    } else {
                        "Infinite values are not allowed"
                    },
                });
            }
        }

        Ok(Self { data })
    }

    /// Create a zero-filled embedding of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if dimension is 0.
    pub fn zeros(dimension: usize) -> Result<Self, MatchError> {
        if dimension == 0 {
            return Err(MatchError::InvalidDimension { expected: 1, actual: 0 });
        }
        Ok(Self { data: vec![0.0; dimension] })
    }

    /// Get the dimension of the embedding.
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Get the embedding data as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consume the embedding and return the underlying vector.
    #[inline]
    #[must_use]
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Calculate the L2 (Euclidean) norm of the embedding.
    #[inline]
    #[must_use]
    pub fn l2_norm(&self) -> f32 {
        crate::distance::l2_norm(&self.data)
    }

    /// Normalize the embedding to unit length (L2 norm = 1).
    ///
    /// Returns a new normalized embedding. If the embedding has zero length,
    /// returns a copy of the original.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let norm = self.l2_norm();

        if norm == 0.0 {
            return self.clone();
        }

        let data: Vec<f32> = self.data.iter().map(|x| x / norm).collect();
        Self { data }
    }
}

impl Deref for Embedding {
    type Target = [f32];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl AsRef<[f32]> for Embedding {
    #[inline]
    fn as_ref(&self) -> &[f32] {
        &self.data
    }
}
