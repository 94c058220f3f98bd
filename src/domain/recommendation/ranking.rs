//! Ranking stage: order by score, break ties newest first, then truncate.

use std::cmp::Ordering;

use super::{RecommendationLimit, ScoredComposition};

/// Sorts scored compositions best-first and keeps at most `limit`.
///
/// Order: score descending, then creation time descending. Composition id
/// ascending is the last resort so equal inputs always rank identically.
pub fn rank(
    mut scored: Vec<ScoredComposition>,
    limit: RecommendationLimit,
) -> Vec<ScoredComposition> {
    scored.sort_by(compare);
    scored.truncate(limit.as_usize());
    scored
}

fn compare(a: &ScoredComposition, b: &ScoredComposition) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.composition_id.cmp(&b.composition_id))
}
