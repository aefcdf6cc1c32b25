//! # Face Matching
//!
//! Similarity scoring between a reference photo and a candidate photo is an
//! external collaborator, modelled as [`FaceMatcher`].

use checkpoint_core::PersonId;

use crate::reference::Person;

/// Minimum score, exclusive, for a candidate to count as a match.
pub const MATCH_THRESHOLD: f32 = 0.8;

/// Scores how likely two photos show the same face.
pub trait FaceMatcher: Send + Sync {
    /// Similarity in `[0.0, 1.0]` between `reference` and `candidate`.
    fn match_score(&self, reference: &[u8], candidate: &[u8]) -> f32;
}

/// Stand-in matcher that reports every pair as identical.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFaceMatcher;

impl FaceMatcher for MockFaceMatcher {
    fn match_score(&self, _reference: &[u8], _candidate: &[u8]) -> f32 {
        1.0
    }
}

/// Return the highest-scoring person above [`MATCH_THRESHOLD`].
///
/// Ties keep the first person encountered.
pub fn best_match<'a>(
    matcher: &dyn FaceMatcher,
    persons: impl IntoIterator<Item = &'a Person>,
    candidate: &[u8],
) -> Option<(PersonId, f32)> {
    let mut best: Option<(PersonId, f32)> = None;
    for person in persons {
        let score = matcher.match_score(&person.photo, candidate);
        if score <= MATCH_THRESHOLD {
            continue;
        }
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((person.id, score));
        }
    }
    best
}
