//! Interval set algebra: list intersection, N-way intersection, coalescing.
//!
//! All functions are pure. Intersection uses the strict overlap rule;
//! coalescing uses the inclusive rule (see [`crate::interval`]).

use std::fmt;

use crate::interval::Interval;

/// Upper bound on coalescing passes. Each absorbing pass strictly shrinks the
/// list, so the fixed point arrives within `len` passes; the cap is a guard
/// against that reasoning being violated.
pub const MAX_COALESCE_PASSES: usize = 16;

/// Intersect every pair from `a` × `b`, keeping pairs that strictly overlap.
///
/// Results come in nested for-each order (outer `a`, inner `b`) and are not
/// deduplicated or merged — that is [`merge_overlapping`]'s job downstream.
pub fn intersect_lists<T: Copy + Ord + fmt::Debug>(
    a: &[Interval<T>],
    b: &[Interval<T>],
) -> Vec<Interval<T>> {
    let mut out = Vec::new();
    for x in a {
        for y in b {
            if let Some(overlap) = x.intersect(y) {
                out.push(overlap);
            }
        }
    }
    out
}

/// Left fold of [`intersect_lists`] across N interval lists, starting from
/// the first. An empty input folds to an empty result.
///
/// Folding against an empty member list collapses the whole result to empty,
/// so a participant with zero intervals must be excluded upstream rather than
/// passed through as `[]` (the aggregator does this).
pub fn intersect_all<T: Copy + Ord + fmt::Debug>(lists: &[Vec<Interval<T>>]) -> Vec<Interval<T>> {
    let mut iter = lists.iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };
    iter.fold(first.clone(), |acc, next| intersect_lists(&acc, next))
}

/// Coalesce a list into a minimal set of non-overlapping, non-touching
/// intervals.
///
/// A single absorption pass can leave two accumulated results that each grew
/// into overlap with the other after being emitted, so passes repeat until
/// one absorbs nothing. Output order is the insertion order of each surviving
/// representative, not sorted by start — callers wanting sorted output sort
/// explicitly.
pub fn merge_overlapping<T: Copy + Ord + fmt::Debug>(intervals: &[Interval<T>]) -> Vec<Interval<T>> {
    let mut current = intervals.to_vec();
    for _ in 0..MAX_COALESCE_PASSES {
        let before = current.len();
        current = coalesce_pass(current);
        if current.len() == before {
            break;
        }
    }
    current
}

/// One absorption pass: each interval either widens the first accumulated
/// result it touches or becomes a new result.
fn coalesce_pass<T: Copy + Ord + fmt::Debug>(intervals: Vec<Interval<T>>) -> Vec<Interval<T>> {
    let mut out: Vec<Interval<T>> = Vec::new();
    for iv in intervals {
        match out.iter_mut().find(|acc| acc.touches_or_overlaps(&iv)) {
            Some(acc) => acc.absorb(&iv),
            None => out.push(iv),
        }
    }
    out
}
