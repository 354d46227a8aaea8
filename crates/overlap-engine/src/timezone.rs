//! Wall-clock ↔ UTC normalization via `chrono-tz`.
//!
//! Participants enter intervals in their own local time; the algebra only
//! compares instants on the canonical UTC scale. [`to_canonical`] reinterprets
//! wall-clock intervals in a given IANA timezone and converts them to UTC;
//! [`from_canonical`] is the inverse projection for display.
//!
//! Local times are not always well defined: during a spring-forward gap they
//! do not exist, and during a fall-back hour they exist twice. Ambiguous times
//! take the earliest mapping; nonexistent times follow a [`DstPolicy`].

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{EngineError, Result};
use crate::interval::{LocalInterval, UtcInterval};

/// How far shift-forward probing will search past a DST gap, in minutes.
/// Real-world gaps are at most two hours.
const MAX_GAP_PROBE_MINUTES: i64 = 120;

/// Policy for wall-clock times that fall inside a DST gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DstPolicy {
    /// Move to the first valid instant after the gap.
    #[default]
    ShiftForward,
    /// Drop intervals with an endpoint in the gap.
    Skip,
}

/// Resolve an IANA timezone identifier.
///
/// # Errors
/// Returns `EngineError::InvalidTimezone` for an unresolvable identifier —
/// this indicates malformed upstream input and fails fast.
pub fn resolve(tz_id: &str) -> Result<Tz> {
    tz_id
        .parse()
        .map_err(|_| EngineError::InvalidTimezone(tz_id.to_string()))
}

/// Convert wall-clock intervals in `tz` to the canonical UTC scale, using the
/// default DST policy (shift forward).
pub fn to_canonical(intervals: &[LocalInterval], tz: Tz) -> Result<Vec<UtcInterval>> {
    to_canonical_with_policy(intervals, tz, DstPolicy::default())
}

/// Convert wall-clock intervals in `tz` to the canonical UTC scale.
///
/// Under `DstPolicy::Skip`, an interval with either endpoint in a DST gap is
/// dropped from the output.
pub fn to_canonical_with_policy(
    intervals: &[LocalInterval],
    tz: Tz,
    policy: DstPolicy,
) -> Result<Vec<UtcInterval>> {
    let mut out = Vec::with_capacity(intervals.len());
    for iv in intervals {
        let (Some(start), Some(end)) = (
            localize(tz, iv.start, policy)?,
            localize(tz, iv.end, policy)?,
        ) else {
            continue;
        };
        out.push(UtcInterval { start, end });
    }
    Ok(out)
}

/// Project canonical UTC intervals into `tz` wall-clock time for display.
///
/// Total: every instant has exactly one local representation, so this cannot
/// fail and is the inverse of [`to_canonical`] away from DST gaps and folds.
pub fn from_canonical(intervals: &[UtcInterval], tz: Tz) -> Vec<LocalInterval> {
    intervals
        .iter()
        .map(|iv| LocalInterval {
            start: iv.start.with_timezone(&tz).naive_local(),
            end: iv.end.with_timezone(&tz).naive_local(),
        })
        .collect()
}

/// Map one wall-clock time in `tz` to a UTC instant.
///
/// `Ok(None)` means the time fell in a DST gap and the policy is `Skip`.
fn localize(tz: Tz, local: NaiveDateTime, policy: DstPolicy) -> Result<Option<DateTime<Utc>>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(Some(dt.with_timezone(&Utc))),
        // Fall-back hour: the earlier of the two instants.
        LocalResult::Ambiguous(earliest, _) => Ok(Some(earliest.with_timezone(&Utc))),
        LocalResult::None => match policy {
            DstPolicy::Skip => Ok(None),
            DstPolicy::ShiftForward => shift_past_gap(tz, local).map(Some),
        },
    }
}

/// Find the first valid instant at or after a wall-clock time inside a DST
/// gap, probing forward a minute at a time up to the largest real-world gap.
fn shift_past_gap(tz: Tz, local: NaiveDateTime) -> Result<DateTime<Utc>> {
    let mut probe = local;
    for _ in 0..MAX_GAP_PROBE_MINUTES {
        probe += Duration::minutes(1);
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                return Ok(dt.with_timezone(&Utc));
            }
            LocalResult::None => continue,
        }
    }
    Err(EngineError::Normalization(format!(
        "no valid instant within {MAX_GAP_PROBE_MINUTES} minutes of {local} in {tz}"
    )))
}
