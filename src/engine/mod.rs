//! The matching engine facade.
//!
//! [`MatchEngine`] ties the injected [`EmbeddingExtractor`] to the
//! [`EmbeddingStore`] and [`SimilarityRanker`], and exposes the plain,
//! transport-agnostic operations an HTTP layer maps onto request handlers:
//! [`ingest`](MatchEngine::ingest), [`delete`](MatchEngine::delete) and
//! [`query`](MatchEngine::query).
//!
//! Structured log events are emitted here, at the calling layer, never
//! from inside the ranking algorithm.

mod wire;

pub use wire::{MatchPayload, MatchesEnvelope};

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::MatchError;
use crate::extract::{EmbeddingExtractor, ImageSource};
use crate::rank::{RankConfig, RankedMatch, SimilarityRanker};
use crate::store::{EmbeddingStore, LoadReport};
use crate::types::ImageId;

/// An image-matching engine over an injected embedding extractor.
///
/// The engine owns its store with a clear lifecycle: constructed empty,
/// populated once at startup via [`load_from`](Self::load_from), and kept
/// current through [`ingest`](Self::ingest) and [`delete`](Self::delete)
/// as the caller mutates external storage. There is no hidden global
/// state and no rebinding; reload replaces the store contents under the
/// write lock.
///
/// All operations take `&self` and are safe to call from multiple threads;
/// queries run concurrently, writes serialize.
pub struct MatchEngine<X: EmbeddingExtractor> {
    extractor: X,
    store: Arc<EmbeddingStore>,
    ranker: SimilarityRanker,
}

impl<X: EmbeddingExtractor> MatchEngine<X> {
    /// Create an engine with an empty index.
    ///
    /// The index dimension is taken from the extractor's output shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the extractor reports a zero dimension.
    pub fn new(extractor: X) -> Result<Self, MatchError> {
        let store = Arc::new(EmbeddingStore::new(extractor.dimension())?);
        let ranker = SimilarityRanker::new(Arc::clone(&store));
        Ok(Self { extractor, store, ranker })
    }

    /// Build (or rebuild) the index from an image source.
    ///
    /// Invoked once at startup, and again whenever the caller wants to
    /// resynchronize with external storage. Images the extractor rejects
    /// are logged and skipped, never fatal.
    ///
    /// # Errors
    ///
    /// Returns an error only if the source cannot be enumerated at all or
    /// the store is corrupted.
    pub fn load_from<S: ImageSource + ?Sized>(&self, source: &S) -> Result<LoadReport, MatchError> {
        let report = self.store.load(source, &self.extractor)?;
        info!(loaded = report.loaded, skipped = report.skipped, "embedding index built");
        Ok(report)
    }

    /// Embed an image and insert (or overwrite) its index entry.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidImage`] or [`MatchError::Extraction`]
    /// if the extractor rejects the bytes, or
    /// [`MatchError::DimensionMismatch`] if the extractor produced a vector
    /// of the wrong shape. A failed ingest leaves the prior entry, if any,
    /// untouched.
    pub fn ingest(&self, id: ImageId, image: &[u8]) -> Result<(), MatchError> {
        let embedding = self.extractor.embed(image)?;
        self.store.put(id.clone(), embedding)?;
        debug!(id = %id, "image ingested");
        Ok(())
    }

    /// Remove an image from the index.
    ///
    /// Returns `true` if an entry was removed; deleting an unknown id is a
    /// no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store is corrupted.
    pub fn delete(&self, id: &ImageId) -> Result<bool, MatchError> {
        let removed = self.store.remove(id)?;
        if removed {
            debug!(id = %id, "image removed from index");
        }
        Ok(removed)
    }

    /// Embed a query image and rank all stored images against it.
    ///
    /// Returns at most `config.k` matches strictly above
    /// `config.threshold`, best first, ties broken by ascending id. An
    /// empty result is valid when nothing clears the threshold or the
    /// index is empty.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::InvalidImage`] or [`MatchError::Extraction`]
    /// if the extractor rejects the bytes, or
    /// [`MatchError::DimensionMismatch`] if the extractor produced a vector
    /// of the wrong shape.
    pub fn query(
        &self,
        image: &[u8],
        config: &RankConfig,
    ) -> Result<Vec<RankedMatch>, MatchError> {
        let embedding = self.extractor.embed(image)?;
        let matches = self.ranker.rank(&embedding, config)?;
        debug!(
            candidates = self.store.len()?,
            matches = matches.len(),
            threshold = config.threshold,
            "similarity query served"
        );
        Ok(matches)
    }

    /// Access the underlying embedding store.
    #[must_use]
    pub fn store(&self) -> &EmbeddingStore {
        &self.store
    }
}
