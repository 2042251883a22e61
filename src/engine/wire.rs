//! Legacy JSON wire shape for similarity matches.
//!
//! The legacy image-matching service returned matches as
//! `{"matches": [{"image": <id>, "similarity": <percent>}]}` with the
//! similarity expressed as a percentage rounded to two decimals. The core
//! defines no wire format of its own; these types exist so a transport
//! layer that wants compatibility with that shape can echo it.

use serde::{Deserialize, Serialize};

use crate::rank::RankedMatch;
use crate::types::ImageId;

/// One match in the legacy wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchPayload {
    /// The stored image's identifier.
    pub image: ImageId,
    /// Similarity as a percentage in [0, 100], rounded to two decimals.
    pub similarity: f32,
}

impl From<&RankedMatch> for MatchPayload {
    fn from(m: &RankedMatch) -> Self {
        Self { image: m.id.clone(), similarity: round_two_decimals(m.similarity * 100.0) }
    }
}

/// The `{"matches": [...]}` envelope of the legacy wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchesEnvelope {
    /// The ranked matches, best first.
    pub matches: Vec<MatchPayload>,
}

impl MatchesEnvelope {
    /// Build an envelope from ranked matches.
    #[must_use]
    pub fn new(matches: &[RankedMatch]) -> Self {
        Self { matches: matches.iter().map(MatchPayload::from).collect() }
    }
}

fn round_two_decimals(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
