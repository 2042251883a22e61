//! Similarity ranking over the embedding index.
//!
//! [`SimilarityRanker`] produces a deterministic, thresholded, bounded
//! ranking of stored ids against one query embedding:
//!
//! 1. Validate the query dimension
//! 2. Compute cosine similarity against every entry in a store snapshot
//!    (0.0 for zero-magnitude vectors, never NaN)
//! 3. Retain entries strictly above the threshold
//! 4. Sort descending by similarity, breaking exact ties by ascending id
//! 5. Truncate to the top K
//!
//! Each call is an independent, idempotent computation over the snapshot;
//! the ranker holds no mutable state.

use std::cmp::Ordering;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::distance::{cosine_similarity_with_norms, CachedNorm};
use crate::error::MatchError;
use crate::store::EmbeddingStore;
use crate::types::{Embedding, ImageId};

/// Default number of matches returned when no explicit limit is set.
///
/// Matches the legacy serving default.
pub const DEFAULT_TOP_K: usize = 5;

/// Configuration for a similarity query.
///
/// The threshold is a required parameter: a match is returned only when
/// its similarity is strictly greater than it. There is deliberately no
/// `Default` implementation, so callers always state which cut-off they
/// are serving with.
///
/// # Example
///
/// ```
/// use visimatch::rank::RankConfig;
///
/// let config = RankConfig::new(0.5).with_k(10);
/// assert!((config.threshold - 0.5).abs() < 1e-6);
/// assert_eq!(config.k, 10);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RankConfig {
    /// Similarity cut-off; only entries with similarity strictly greater
    /// than this are returned.
    pub threshold: f32,
    /// Maximum number of matches to return.
    pub k: usize,
}

impl RankConfig {
    /// Create a configuration with the given threshold and the default
    /// result limit ([`DEFAULT_TOP_K`]).
    #[must_use]
    pub const fn new(threshold: f32) -> Self {
        Self { threshold, k: DEFAULT_TOP_K }
    }

    /// Set the maximum number of matches to return.
    ///
    /// `k = 0` is valid and yields an empty result.
    #[must_use]
    pub const fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }
}

/// A single ranked match from a similarity query.
///
/// Produced transiently per query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    /// The identifier of the matching stored image.
    pub id: ImageId,
    /// Cosine similarity to the query, in [-1.0, 1.0].
    pub similarity: f32,
}

impl RankedMatch {
    /// Create a new ranked match.
    #[must_use]
    pub const fn new(id: ImageId, similarity: f32) -> Self {
        Self { id, similarity }
    }
}

/// Ranks stored embeddings against query embeddings.
///
/// The ranker reads a point-in-time [`snapshot`](EmbeddingStore::snapshot)
/// of the store for each call, so concurrent mutation cannot produce a
/// torn result. The scan is a correctness-first linear pass over every
/// entry, parallelized across entries; suitable for moderate corpus sizes.
pub struct SimilarityRanker {
    store: Arc<EmbeddingStore>,
}

impl SimilarityRanker {
    /// Create a ranker over the given store.
    #[must_use]
    pub fn new(store: Arc<EmbeddingStore>) -> Self {
        Self { store }
    }

    /// Rank every stored embedding against `query`.
    ///
    /// Returns at most `config.k` matches with similarity strictly greater
    /// than `config.threshold`, sorted descending by similarity with exact
    /// ties broken by ascending id. An empty result is valid, not an
    /// error, when nothing clears the threshold or the store is empty.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::DimensionMismatch`] if the query dimension
    /// differs from the store's, or [`MatchError::LockPoisoned`] if a
    /// prior panic corrupted the store.
    pub fn rank(
        &self,
        query: &Embedding,
        config: &RankConfig,
    ) -> Result<Vec<RankedMatch>, MatchError> {
        if query.dimension() != self.store.dimension() {
            return Err(MatchError::DimensionMismatch {
                expected: self.store.dimension(),
                actual: query.dimension(),
            });
        }

        let query_norm = CachedNorm::new(query);
        let snapshot = self.store.snapshot()?;

        let mut matches: Vec<RankedMatch> = snapshot
            .par_iter()
            .filter_map(|entry| {
                // Zero-magnitude vectors compare at 0.0, not NaN
                let similarity = cosine_similarity_with_norms(
                    query,
                    entry.embedding(),
                    query_norm.norm(),
                    entry.norm().norm(),
                )
                .unwrap_or(0.0);

                (similarity > config.threshold)
                    .then(|| RankedMatch::new(entry.id().clone(), similarity))
            })
            .collect();

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        matches.truncate(config.k);

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Embedding;

    fn id(s: &str) -> ImageId {
        ImageId::new(s).unwrap()
    }

    fn store_with(entries: &[(&str, &[f32])]) -> Arc<EmbeddingStore> {
        let dimension = entries.first().map_or(2, |(_, v)| v.len());
        let store = Arc::new(EmbeddingStore::new(dimension).unwrap());
        for (name, values) in entries {
            store.put(id(name), Embedding::new(values.to_vec()).unwrap()).unwrap();
        }
        store
    }

    /// A unit vector at the given cosine against [1, 0].
    fn unit_at_cosine(cos: f32) -> Vec<f32> {
        vec![cos, (1.0 - cos * cos).sqrt()]
    }

    #[test]
    fn rank_empty_store_returns_empty() {
        let store = Arc::new(EmbeddingStore::new(2).unwrap());
        let ranker = SimilarityRanker::new(store);

        let query = Embedding::new(vec![1.0, 0.0]).unwrap();
        let matches = ranker.rank(&query, &RankConfig::new(0.0)).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn rank_filters_sorts_and_truncates() {
        // cosine against [1, 0] is the first component of a unit vector
        let store = store_with(&[
            ("a", &unit_at_cosine(0.9)),
            ("b", &unit_at_cosine(0.6)),
            ("c", &unit_at_cosine(0.4)),
        ]);
        let ranker = SimilarityRanker::new(store);
        let query = Embedding::new(vec![1.0, 0.0]).unwrap();

        let matches = ranker.rank(&query, &RankConfig::new(0.5)).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id.as_str(), "a");
        assert!((matches[0].similarity - 0.9).abs() < 1e-6);
        assert_eq!(matches[1].id.as_str(), "b");
        assert!((matches[1].similarity - 0.6).abs() < 1e-6);
    }

    #[test]
    fn rank_threshold_is_strict() {
        let store = store_with(&[("edge", &unit_at_cosine(0.7))]);
        let ranker = SimilarityRanker::new(Arc::clone(&store));
        let query = Embedding::new(vec![1.0, 0.0]).unwrap();

        // Use the actually computed similarity as the threshold so the
        // boundary comparison is exact.
        let computed = ranker.rank(&query, &RankConfig::new(-1.0)).unwrap()[0].similarity;

        let at_threshold = ranker.rank(&query, &RankConfig::new(computed)).unwrap();
        assert!(at_threshold.is_empty());

        let just_below = ranker.rank(&query, &RankConfig::new(computed - 1e-6)).unwrap();
        assert_eq!(just_below.len(), 1);
    }

    #[test]
    fn rank_breaks_ties_by_ascending_id() {
        let same = unit_at_cosine(0.8);
        let store = store_with(&[("b", &same), ("a", &same), ("c", &same)]);
        let ranker = SimilarityRanker::new(store);
        let query = Embedding::new(vec![1.0, 0.0]).unwrap();

        let matches = ranker.rank(&query, &RankConfig::new(0.0)).unwrap();
        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn rank_truncates_to_k() {
        let store = store_with(&[
            ("a", &unit_at_cosine(0.9)),
            ("b", &unit_at_cosine(0.8)),
            ("c", &unit_at_cosine(0.7)),
        ]);
        let ranker = SimilarityRanker::new(store);
        let query = Embedding::new(vec![1.0, 0.0]).unwrap();

        let matches = ranker.rank(&query, &RankConfig::new(0.0).with_k(2)).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id.as_str(), "a");
        assert_eq!(matches[1].id.as_str(), "b");
    }

    #[test]
    fn rank_k_zero_returns_empty() {
        let store = store_with(&[("a", &unit_at_cosine(0.9))]);
        let ranker = SimilarityRanker::new(store);
        let query = Embedding::new(vec![1.0, 0.0]).unwrap();

        let matches = ranker.rank(&query, &RankConfig::new(0.0).with_k(0)).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn rank_zero_query_scores_zero_everywhere() {
        let store = store_with(&[("a", &unit_at_cosine(0.9))]);
        let ranker = SimilarityRanker::new(store);
        let query = Embedding::zeros(2).unwrap();

        // 0.0 > 0.0 is false, so a zero query matches nothing at threshold 0
        let matches = ranker.rank(&query, &RankConfig::new(0.0)).unwrap();
        assert!(matches.is_empty());

        // but it is a valid query, reported at similarity 0.0 below threshold
        let matches = ranker.rank(&query, &RankConfig::new(-0.5)).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].similarity, 0.0);
    }

    #[test]
    fn rank_zero_stored_entry_scores_zero() {
        let store = Arc::new(EmbeddingStore::new(2).unwrap());
        store.put(id("blank"), Embedding::zeros(2).unwrap()).unwrap();
        let ranker = SimilarityRanker::new(store);
        let query = Embedding::new(vec![1.0, 0.0]).unwrap();

        let matches = ranker.rank(&query, &RankConfig::new(-1.0)).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].similarity, 0.0);
    }

    #[test]
    fn rank_rejects_wrong_query_dimension() {
        let store = Arc::new(EmbeddingStore::new(2).unwrap());
        let ranker = SimilarityRanker::new(store);
        let query = Embedding::new(vec![1.0, 0.0, 0.0]).unwrap();

        let result = ranker.rank(&query, &RankConfig::new(0.0));
        assert!(matches!(result, Err(MatchError::DimensionMismatch { expected: 2, actual: 3 })));
    }

    #[test]
    fn rank_is_deterministic() {
        let store = store_with(&[
            ("a", &unit_at_cosine(0.9)),
            ("b", &unit_at_cosine(0.6)),
            ("c", &unit_at_cosine(0.6)),
            ("d", &unit_at_cosine(0.2)),
        ]);
        let ranker = SimilarityRanker::new(store);
        let query = Embedding::new(vec![1.0, 0.0]).unwrap();
        let config = RankConfig::new(0.1);

        let first = ranker.rank(&query, &config).unwrap();
        let second = ranker.rank(&query, &config).unwrap();
        assert_eq!(first, second);
    }
}
