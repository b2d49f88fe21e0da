use time::{Duration, OffsetDateTime};

use crate::model::Candidate;

/// Dashboard aggregates. Pure folds over an already-fetched set; nothing
/// here touches the store.
pub fn total(candidates: &[Candidate]) -> usize {
    candidates.len()
}

/// Candidates created within the last 7 days of `now`. Records whose
/// `created_at` does not parse are not counted.
pub fn new_this_week(candidates: &[Candidate], now: OffsetDateTime) -> usize {
    let cutoff = now - Duration::days(7);
    candidates
        .iter()
        .filter(|c| c.created_at_ts().is_some_and(|ts| ts >= cutoff))
        .count()
}
