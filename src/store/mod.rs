//! The in-memory embedding index.
//!
//! [`EmbeddingStore`] owns the id → embedding mapping. It is built once at
//! startup by scanning an [`ImageSource`] through an
//! [`EmbeddingExtractor`], and kept current via [`put`](EmbeddingStore::put)
//! and [`remove`](EmbeddingStore::remove) as images are added or deleted.
//!
//! # Concurrency
//!
//! The store supports concurrent readers and serialized writers through an
//! interior reader-writer lock. Ranking works on a
//! [`snapshot`](EmbeddingStore::snapshot) (copy-on-read), so an in-flight
//! scan never observes a half-written entry and never blocks writers from
//! completing.
//!
//! Nothing here persists across restarts; the index is rebuilt from the
//! source of truth at startup.

use std::collections::HashMap;
use std::sync::RwLock;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::MatchError;
use crate::extract::{EmbeddingExtractor, ImageSource};
use crate::types::{Embedding, ImageId, IndexEntry};

/// Outcome of a bulk [`load`](EmbeddingStore::load).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Number of images successfully embedded and indexed.
    pub loaded: usize,
    /// Number of images skipped because extraction rejected them.
    pub skipped: usize,
}

/// An in-memory mapping from image identifier to embedding vector.
///
/// The dimension is fixed at construction (taken from the extractor's
/// output shape); every stored vector has exactly that many components.
/// A mismatched dimension is rejected at the boundary, never silently
/// padded or truncated.
///
/// # Example
///
/// ```
/// use visimatch::store::EmbeddingStore;
/// use visimatch::types::{Embedding, ImageId};
///
/// let store = EmbeddingStore::new(3).unwrap();
/// let id = ImageId::new("cat.jpg").unwrap();
/// store.put(id.clone(), Embedding::new(vec![1.0, 2.0, 3.0]).unwrap()).unwrap();
/// assert!(store.contains(&id).unwrap());
/// ```
pub struct EmbeddingStore {
    dimension: usize,
    entries: RwLock<HashMap<ImageId, IndexEntry>>,
}

impl EmbeddingStore {
    /// Create an empty store for embeddings of the given dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if dimension is 0.
    pub fn new(dimension: usize) -> Result<Self, MatchError> {
        if dimension == 0 {
            return Err(MatchError::InvalidDimension { expected: 1, actual: 0 });
        }

        Ok(Self { dimension, entries: RwLock::new(HashMap::new()) })
    }

    /// Get the fixed embedding dimension of this store.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    /// Insert or overwrite the entry for `id`.
    ///
    /// The entry becomes visible to subsequent [`snapshot`](Self::snapshot)
    /// calls. A failed put leaves the prior entry, if any, untouched.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DimensionMismatch`] if the vector's dimension
    /// differs from the store's, or [`MatchError::LockPoisoned`] if a prior
    /// panic corrupted the store.
    pub fn put(&self, id: ImageId, embedding: Embedding) -> Result<(), MatchError> {
        if embedding.dimension() != self.dimension {
            return Err(MatchError::DimensionMismatch {
                expected: self.dimension,
                actual: embedding.dimension(),
            });
        }

        let entry = IndexEntry::new(id.clone(), embedding);
        let mut entries = self.entries.write().map_err(|_| MatchError::LockPoisoned)?;
        entries.insert(id, entry);
        Ok(())
    }

    /// Delete the entry for `id` if present.
    ///
    /// Returns `true` if an entry was removed, `false` if none existed;
    /// removal of an absent id is a no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::LockPoisoned`] if a prior panic corrupted the
    /// store.
    pub fn remove(&self, id: &ImageId) -> Result<bool, MatchError> {
        let mut entries = self.entries.write().map_err(|_| MatchError::LockPoisoned)?;
        Ok(entries.remove(id).is_some())
    }

    /// Check whether an entry exists for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::LockPoisoned`] if a prior panic corrupted the
    /// store.
    pub fn contains(&self, id: &ImageId) -> Result<bool, MatchError> {
        let entries = self.entries.read().map_err(|_| MatchError::LockPoisoned)?;
        Ok(entries.contains_key(id))
    }

    /// Get the number of indexed images.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::LockPoisoned`] if a prior panic corrupted the
    /// store.
    pub fn len(&self) -> Result<usize, MatchError> {
        let entries = self.entries.read().map_err(|_| MatchError::LockPoisoned)?;
        Ok(entries.len())
    }

    /// Check if the store is empty.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::LockPoisoned`] if a prior panic corrupted the
    /// store.
    pub fn is_empty(&self) -> Result<bool, MatchError> {
        self.len().map(|n| n == 0)
    }

    /// Return a point-in-time copy of all entries, sorted by ascending id.
    ///
    /// The copy is consistent: concurrent `put`/`remove` calls after the
    /// snapshot is taken do not affect it. Sorting makes iteration order
    /// deterministic across runs.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::LockPoisoned`] if a prior panic corrupted the
    /// store.
    pub fn snapshot(&self) -> Result<Vec<IndexEntry>, MatchError> {
        let entries = self.entries.read().map_err(|_| MatchError::LockPoisoned)?;
        let mut snapshot: Vec<IndexEntry> = entries.values().cloned().collect();
        drop(entries);

        snapshot.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(snapshot)
    }

    /// Bulk-initialize the store from an image source.
    ///
    /// Every image the source enumerates is embedded (extraction runs in
    /// parallel across items) and the store's contents are replaced with
    /// the result under a single write lock. Images the extractor rejects
    /// are logged and skipped; a single bad image never aborts the load.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::Storage`] if the source itself cannot be
    /// enumerated, or [`MatchError::LockPoisoned`] if a prior panic
    /// corrupted the store. Per-item extraction failures are not errors;
    /// they are counted in [`LoadReport::skipped`].
    pub fn load<S, X>(&self, source: &S, extractor: &X) -> Result<LoadReport, MatchError>
    where
        S: ImageSource + ?Sized,
        X: EmbeddingExtractor + ?Sized,
    {
        let images = source.list_images()?;

        // Extraction is independent per image; aggregation goes through
        // the single serialized write path below.
        let results: Vec<(ImageId, Result<Embedding, MatchError>)> = images
            .into_par_iter()
            .map(|(id, bytes)| {
                let result = extractor.embed(&bytes).and_then(|embedding| {
                    if embedding.dimension() == self.dimension {
                        Ok(embedding)
                    } else {
                        Err(MatchError::DimensionMismatch {
                            expected: self.dimension,
                            actual: embedding.dimension(),
                        })
                    }
                });
                (id, result)
            })
            .collect();

        let mut report = LoadReport::default();
        let mut entries = self.entries.write().map_err(|_| MatchError::LockPoisoned)?;
        entries.clear();

        for (id, result) in results {
            match result {
                Ok(embedding) => {
                    debug!(id = %id, "indexed image");
                    entries.insert(id.clone(), IndexEntry::new(id, embedding));
                    report.loaded += 1;
                }
                Err(error) => {
                    warn!(id = %id, %error, "skipping image during bulk load");
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }
}
