//! Property tests for ranking invariants.
//!
//! These pin the contract of the similarity scan: results are bounded,
//! strictly above the threshold, totally ordered, and stable across calls
//! and across growing k.

use std::sync::Arc;

use proptest::prelude::*;

use visimatch::distance::{cosine_similarity_with_norms, l2_norm};
use visimatch::rank::{RankConfig, SimilarityRanker};
use visimatch::store::EmbeddingStore;
use visimatch::types::{Embedding, ImageId};

const DIM: usize = 4;

fn vector() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-1.0f32..1.0, DIM)
}

fn corpus() -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(vector(), 0..24)
}

fn build_ranker(corpus: &[Vec<f32>]) -> SimilarityRanker {
    let store = Arc::new(EmbeddingStore::new(DIM).unwrap());
    for (i, values) in corpus.iter().enumerate() {
        let id = ImageId::new(format!("img-{i:02}")).unwrap();
        store.put(id, Embedding::new(values.clone()).unwrap()).unwrap();
    }
    SimilarityRanker::new(store)
}

proptest! {
    #[test]
    fn results_are_bounded_sorted_and_above_threshold(
        corpus in corpus(),
        query in vector(),
        threshold in -1.0f32..1.0,
        k in 0usize..12,
    ) {
        let ranker = build_ranker(&corpus);
        let query = Embedding::new(query).unwrap();
        let matches = ranker.rank(&query, &RankConfig::new(threshold).with_k(k)).unwrap();

        prop_assert!(matches.len() <= k);
        for m in &matches {
            prop_assert!(m.similarity > threshold);
            prop_assert!((-1.0 - 1e-5..=1.0 + 1e-5).contains(&m.similarity));
        }
        for pair in matches.windows(2) {
            // Descending similarity; exact ties ascending by id
            prop_assert!(
                pair[0].similarity > pair[1].similarity
                    || (pair[0].similarity == pair[1].similarity && pair[0].id < pair[1].id)
            );
        }
    }

    #[test]
    fn unbounded_result_is_exactly_the_qualifying_set(
        corpus in corpus(),
        query in vector(),
        threshold in -1.0f32..1.0,
    ) {
        let ranker = build_ranker(&corpus);
        let query_embedding = Embedding::new(query.clone()).unwrap();
        let matches = ranker
            .rank(&query_embedding, &RankConfig::new(threshold).with_k(usize::MAX))
            .unwrap();

        let query_norm = l2_norm(&query);
        let mut expected: Vec<String> = corpus
            .iter()
            .enumerate()
            .filter(|(_, v)| {
                let sim = cosine_similarity_with_norms(&query, v, query_norm, l2_norm(v))
                    .unwrap_or(0.0);
                sim > threshold
            })
            .map(|(i, _)| format!("img-{i:02}"))
            .collect();
        expected.sort();

        let mut actual: Vec<String> = matches.iter().map(|m| m.id.to_string()).collect();
        actual.sort();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn rank_is_deterministic(
        corpus in corpus(),
        query in vector(),
        threshold in -1.0f32..1.0,
        k in 0usize..12,
    ) {
        let ranker = build_ranker(&corpus);
        let query = Embedding::new(query).unwrap();
        let config = RankConfig::new(threshold).with_k(k);

        let first = ranker.rank(&query, &config).unwrap();
        let second = ranker.rank(&query, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn growing_k_only_appends(
        corpus in corpus(),
        query in vector(),
        threshold in -1.0f32..1.0,
        k in 0usize..12,
    ) {
        let ranker = build_ranker(&corpus);
        let query = Embedding::new(query).unwrap();

        let smaller = ranker.rank(&query, &RankConfig::new(threshold).with_k(k)).unwrap();
        let larger = ranker.rank(&query, &RankConfig::new(threshold).with_k(k + 1)).unwrap();

        prop_assert!(larger.len() >= smaller.len());
        prop_assert_eq!(&larger[..smaller.len()], &smaller[..]);
    }
}
