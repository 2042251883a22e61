//! Core types for the embedding index.

mod embedding;
mod entry;

pub use embedding::Embedding;
pub use entry::{ImageId, IndexEntry};
