//! Interval value types and pairwise predicates.
//!
//! An interval is a start/end pair on one time scale. The algebra is generic
//! over the instant type so the same operations serve both the canonical UTC
//! scale and a participant's wall clock.
//!
//! Overlap comes in two deliberately different flavors:
//!
//! - **strict** ([`Interval::overlaps`]) for intersection — adjacent busy
//!   blocks must not be reported as a sliver of shared availability;
//! - **inclusive** ([`Interval::touches_or_overlaps`]) for coalescing —
//!   touching selections merge so the display is not visually fragmented.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A time range on a single scale. Invariant: `start <= end`.
///
/// Zero-length intervals are permitted; under the strict rule they never
/// intersect with themselves or with an interval they merely touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub start: T,
    pub end: T,
}

/// An interval on the canonical UTC scale.
pub type UtcInterval = Interval<DateTime<Utc>>;

/// An interval in a participant's wall-clock local time, before normalization.
pub type LocalInterval = Interval<NaiveDateTime>;

/// The role of an interval from the display layer's point of view:
/// a participant's own selection, or a computed common-availability block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Selection,
    Intersection,
}

impl<T: Copy + Ord + fmt::Debug> Interval<T> {
    /// Construct an interval, rejecting `start > end`.
    pub fn new(start: T, end: T) -> Result<Self> {
        if start > end {
            return Err(EngineError::InvalidInterval {
                start: format!("{start:?}"),
                end: format!("{end:?}"),
            });
        }
        Ok(Self { start, end })
    }

    /// Zero-length interval.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Strict overlap: touching endpoints (`a.end == b.start`) do NOT count.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Inclusive overlap used for coalescing: touching endpoints DO count.
    pub fn touches_or_overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// The overlap of two intervals under the strict rule, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self {
            start: self.start.max(other.start),
            end: self.end.min(other.end),
        })
    }

    /// Widen this interval to cover `other` as well.
    pub fn absorb(&mut self, other: &Self) {
        self.start = self.start.min(other.start);
        self.end = self.end.max(other.end);
    }
}
