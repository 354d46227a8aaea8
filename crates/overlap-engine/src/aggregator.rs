//! Cross-participant intersection and per-participant projection.
//!
//! Pure derivations over a store snapshot: the aggregator holds no state of
//! its own, and callers recompute after every store mutation. O(P·I) per
//! recompute — fine at interactive scale.

use crate::algebra::{intersect_all, merge_overlapping};
use crate::error::{EngineError, Result};
use crate::interval::{LocalInterval, UtcInterval};
use crate::store::{AvailabilityStore, ParticipantId};
use crate::timezone::{from_canonical, to_canonical};

/// Compute the availability common to all participants, on the canonical
/// UTC scale, as a merged, non-overlapping list.
///
/// Two kinds of participant are excluded before the fold:
///
/// - no assigned timezone — their availability is undefined, not empty;
/// - no intervals — folding against `[]` would collapse the whole
///   intersection to empty.
pub fn compute_intersection(store: &AvailabilityStore) -> Result<Vec<UtcInterval>> {
    let mut normalized: Vec<Vec<UtcInterval>> = Vec::new();
    for record in store.participants() {
        let Some(tz) = record.timezone else {
            continue;
        };
        if record.intervals.is_empty() {
            continue;
        }
        let spans: Vec<LocalInterval> = record.intervals.iter().map(|iv| iv.span).collect();
        let canonical = to_canonical(&spans, tz)?;
        // The DST skip policy can drop every interval a participant selected.
        if canonical.is_empty() {
            continue;
        }
        normalized.push(canonical);
    }

    Ok(merge_overlapping(&intersect_all(&normalized)))
}

/// Project the common availability into one participant's wall clock.
///
/// Returns `Ok(None)` when the participant has no timezone — an expected
/// "unavailable" state the display layer gates on, not an error.
pub fn project_for_participant(
    store: &AvailabilityStore,
    id: ParticipantId,
) -> Result<Option<Vec<LocalInterval>>> {
    let record = store
        .participant(id)
        .ok_or(EngineError::UnknownParticipant(id.0))?;
    let Some(tz) = record.timezone else {
        return Ok(None);
    };
    let canonical = compute_intersection(store)?;
    Ok(Some(from_canonical(&canonical, tz)))
}
