//! Image identifiers and index entries.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distance::CachedNorm;
use crate::error::MatchError;
use crate::types::Embedding;

/// An opaque, unique, stable identifier of a stored image.
///
/// Typically a storage path or content key. Identifiers are ordered so
/// that ranking ties can be broken deterministically.
///
/// # Example
///
/// ```
/// use visimatch::types::ImageId;
///
/// let id = ImageId::new("uploads/cat.jpg").unwrap();
/// assert_eq!(id.as_str(), "uploads/cat.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ImageId(String);

impl TryFrom<String> for ImageId {
    type Error = MatchError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl ImageId {
    /// Create a new image identifier.
    ///
    /// The identifier is opaque to the engine; any non-empty string is
    /// accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, MatchError> {
        let id = id.into();

        if id.is_empty() {
            return Err(MatchError::InvalidId("image id cannot be empty".to_string()));
        }

        Ok(Self(id))
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier and return the underlying string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ImageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A single entry in the embedding index.
///
/// Owned exclusively by the [`EmbeddingStore`](crate::store::EmbeddingStore);
/// the L2 norm is computed once at insert so that ranking scans can reuse it
/// for every comparison.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    id: ImageId,
    embedding: Embedding,
    norm: CachedNorm,
}

impl IndexEntry {
    /// Create a new index entry, caching the embedding's L2 norm.
    #[must_use]
    pub fn new(id: ImageId, embedding: Embedding) -> Self {
        let norm = CachedNorm::new(&embedding);
        Self { id, embedding, norm }
    }

    /// Get the image identifier.
    #[must_use]
    pub fn id(&self) -> &ImageId {
        &self.id
    }

    /// Get the embedding vector.
    #[must_use]
    pub fn embedding(&self) -> &Embedding {
        &self.embedding
    }

    /// Get the cached L2 norm of the embedding.
    #[must_use]
    pub fn norm(&self) -> CachedNorm {
        self.norm
    }
}
