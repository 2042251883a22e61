//! Visimatch
//!
//! An embedding index and similarity-ranking engine for image matching.
//!
//! # Overview
//!
//! Visimatch answers "which previously stored images look like this query
//! image?" by comparing fixed-dimension embedding vectors with cosine
//! similarity rather than raw pixels. The crate provides:
//!
//! - **Embedding storage**: an in-memory id → embedding index, built at
//!   startup from an external image source and kept current as images are
//!   ingested or deleted
//! - **Similarity ranking**: a deterministic, thresholded, top-K cosine
//!   similarity scan over the index
//! - **Injected extraction**: embedding computation is an external
//!   capability behind the [`EmbeddingExtractor`] trait, so the engine can
//!   be driven by a real model in production and deterministic fakes in
//!   tests
//!
//! # Example
//!
//! ```ignore
//! use visimatch::{ImageId, MatchEngine, RankConfig};
//!
//! // `extractor` is any EmbeddingExtractor implementation
//! let engine = MatchEngine::new(extractor)?;
//!
//! // Build the index from existing images
//! let report = engine.load_from(&source)?;
//! println!("indexed {} images, skipped {}", report.loaded, report.skipped);
//!
//! // Ingest a new image and query for look-alikes
//! engine.ingest(ImageId::new("uploads/cat.jpg")?, &image_bytes)?;
//! let matches = engine.query(&query_bytes, &RankConfig::new(0.5))?;
//! ```
//!
//! # Modules
//!
//! - [`engine`] - The [`MatchEngine`] facade ([`ingest`](MatchEngine::ingest),
//!   [`delete`](MatchEngine::delete), [`query`](MatchEngine::query))
//! - [`store`] - The [`EmbeddingStore`] index
//! - [`rank`] - The [`SimilarityRanker`] and ranking configuration
//! - [`distance`] - Cosine similarity kernels (SIMD and scalar)
//! - [`extract`] - Traits for embedding extraction and image enumeration
//! - [`types`] - Core types ([`Embedding`], [`ImageId`], [`IndexEntry`])
//! - [`error`] - Error types
//!
//! # Concurrency
//!
//! The store supports concurrent readers and serialized writers. Ranking
//! operates on a point-in-time snapshot, so a scan never observes a
//! half-written entry; a query racing an ingest may or may not see the new
//! image.

pub mod distance;
pub mod engine;
pub mod error;
pub mod extract;
pub mod rank;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use distance::{cosine_similarity, CachedNorm};
pub use engine::{MatchEngine, MatchPayload, MatchesEnvelope};
pub use error::MatchError;
pub use extract::{EmbeddingExtractor, ImageSource};
pub use rank::{RankConfig, RankedMatch, SimilarityRanker};
pub use store::{EmbeddingStore, LoadReport};
pub use types::{Embedding, ImageId, IndexEntry};
