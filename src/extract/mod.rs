//! Injected capabilities: embedding extraction and image enumeration.
//!
//! The engine never computes embeddings or touches object storage itself.
//! Both concerns are reached through the traits in this module, so the
//! core can be driven by a real feature-extraction model in production and
//! by deterministic fakes in tests.

use crate::error::MatchError;
use crate::types::{Embedding, ImageId};

/// An opaque embedding extractor: image bytes in, fixed-dimension vector out.
///
/// Implementations wrap a pretrained image model (or any other feature
/// source). The engine only relies on two properties:
///
/// - **Fixed dimension**: every embedding has exactly
///   [`dimension()`](EmbeddingExtractor::dimension) components.
/// - **Determinism**: identical input bytes produce identical embeddings.
///   Index correctness is untestable without this.
///
/// Extraction is computation-bound and may be slow (model inference);
/// callers in async contexts should run it on a blocking thread.
pub trait EmbeddingExtractor: Send + Sync {
    /// The dimension of every embedding this extractor produces.
    fn dimension(&self) -> usize;

    /// Extract an embedding from raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidImage`] if the bytes cannot be decoded
    /// as an image, or [`MatchError::Extraction`] for any other extractor
    /// failure. The distinction lets callers decide whether a retry makes
    /// sense.
    fn embed(&self, image: &[u8]) -> Result<Embedding, MatchError>;
}

impl<X: EmbeddingExtractor + ?Sized> EmbeddingExtractor for &X {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, image: &[u8]) -> Result<Embedding, MatchError> {
        (**self).embed(image)
    }
}

/// A source of stored images, used once at startup to build the index.
///
/// Typically backed by a directory scan or a blob-store listing. The
/// engine does not watch the source for changes; callers keep the index in
/// sync by invoking [`ingest`](crate::engine::MatchEngine::ingest) and
/// [`delete`](crate::engine::MatchEngine::delete) alongside storage
/// mutations.
pub trait ImageSource {
    /// Enumerate all stored images as (identifier, bytes) pairs.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Storage`] if the source cannot be enumerated.
    /// Individual unreadable images should be returned anyway and left to
    /// the extractor to reject, so the bulk load can skip them per item.
    fn list_images(&self) -> Result<Vec<(ImageId, Vec<u8>)>, MatchError>;
}
