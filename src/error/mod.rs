//! Error types for the matching engine.

use thiserror::Error;

/// Errors that can occur in the embedding index and similarity engine.
///
/// No variant is fatal to the process: the store remains in a valid,
/// queryable state after any number of failed operations.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Dimension mismatch between a vector and the index dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The expected dimension.
        expected: usize,
        /// The actual dimension.
        actual: usize,
    },

    /// Invalid dimension (e.g., zero).
    #[error("invalid dimension: expected at least {expected}, got {actual}")]
    InvalidDimension {
        /// The minimum expected dimension.
        expected: usize,
        /// The actual dimension.
        actual: usize,
    },

    /// Invalid value in a vector (NaN, Infinity).
    #[error("invalid value at index {index}: {value} - {reason}")]
    InvalidValue {
        /// The index of the invalid value.
        index: usize,
        /// The invalid value.
        value: f32,
        /// The reason the value is invalid.
        reason: &'static str,
    },

    /// Invalid image identifier.
    #[error("invalid image id: {0}")]
    InvalidId(String),

    /// The input bytes could not be decoded as an image.
    ///
    /// Recoverable: the operation is rejected and the item is excluded
    /// from bulk loads.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The embedding extractor failed for a reason other than bad input.
    ///
    /// Distinguished from [`MatchError::InvalidImage`] so callers can
    /// decide whether a retry makes sense.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// The external image source could not be enumerated.
    #[error("image source error: {0}")]
    Storage(String),

    /// Lock poisoned - indicates a concurrent panic corrupted the store.
    ///
    /// This error is unrecoverable for the affected store instance; it
    /// must be dropped and rebuilt from the image source.
    #[error("store corrupted: lock poisoned due to prior panic in another thread")]
    LockPoisoned,
}
