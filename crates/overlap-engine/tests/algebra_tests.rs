//! Tests for the interval set algebra: strict intersection, N-way folds,
//! and fixed-point coalescing.

use chrono::{TimeZone, Utc};
use overlap_engine::{intersect_all, intersect_lists, merge_overlapping, UtcInterval};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Interval spanning the given hours on a fixed day.
fn iv(start_h: u32, end_h: u32) -> UtcInterval {
    UtcInterval {
        start: Utc.with_ymd_and_hms(2026, 3, 16, start_h, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2026, 3, 16, end_h, 0, 0).unwrap(),
    }
}

// ── Pairwise intersection ───────────────────────────────────────────────────

#[test]
fn touching_intervals_do_not_intersect() {
    // Adjacent busy blocks must not report a sliver of shared availability.
    assert_eq!(iv(0, 5).intersect(&iv(5, 10)), None);
    assert_eq!(iv(5, 10).intersect(&iv(0, 5)), None);
}

#[test]
fn overlapping_intervals_intersect_to_the_shared_range() {
    assert_eq!(iv(0, 5).intersect(&iv(4, 10)), Some(iv(4, 5)));
    assert_eq!(iv(4, 10).intersect(&iv(0, 5)), Some(iv(4, 5)));
}

#[test]
fn containment_intersects_to_the_inner_interval() {
    assert_eq!(iv(0, 12).intersect(&iv(3, 5)), Some(iv(3, 5)));
}

#[test]
fn zero_length_interval_never_intersects_itself() {
    assert_eq!(iv(5, 5).intersect(&iv(5, 5)), None);
}

#[test]
fn zero_length_interval_at_an_endpoint_does_not_intersect() {
    assert_eq!(iv(0, 5).intersect(&iv(5, 5)), None);
    assert_eq!(iv(5, 5).intersect(&iv(0, 5)), None);
}

// ── List intersection ───────────────────────────────────────────────────────

#[test]
fn intersect_lists_keeps_nested_foreach_order() {
    let a = vec![iv(0, 5), iv(6, 10)];
    let b = vec![iv(4, 7), iv(9, 12)];

    // Outer a, inner b: (a0,b0), (a0,b1), (a1,b0), (a1,b1).
    let result = intersect_lists(&a, &b);
    assert_eq!(result, vec![iv(4, 5), iv(6, 7), iv(9, 10)]);
}

#[test]
fn intersect_lists_does_not_dedup() {
    // Both members of b overlap the same range of a; both survive.
    let a = vec![iv(0, 10)];
    let b = vec![iv(2, 4), iv(2, 4)];
    assert_eq!(intersect_lists(&a, &b), vec![iv(2, 4), iv(2, 4)]);
}

#[test]
fn intersect_all_folds_left_from_the_first_list() {
    let lists = vec![
        vec![iv(0, 10)],
        vec![iv(2, 12)],
        vec![iv(4, 6), iv(8, 14)],
    ];
    assert_eq!(intersect_all(&lists), vec![iv(4, 6), iv(8, 10)]);
}

#[test]
fn intersect_all_of_nothing_is_empty() {
    let lists: Vec<Vec<UtcInterval>> = Vec::new();
    assert!(intersect_all(&lists).is_empty());
}

#[test]
fn intersect_all_collapses_against_an_empty_member_list() {
    // Folding against [] yields []; this is why the aggregator excludes
    // zero-interval participants before folding.
    let lists = vec![vec![iv(0, 10)], vec![], vec![iv(2, 4)]];
    assert!(intersect_all(&lists).is_empty());
}

// ── Coalescing ──────────────────────────────────────────────────────────────

#[test]
fn bridging_input_requires_a_second_pass() {
    // One left-to-right pass leaves {0,2} (widened to {0,6} by {1,6}) and
    // {5,7} separate even though they now overlap; the next pass joins them.
    let merged = merge_overlapping(&[iv(0, 2), iv(5, 7), iv(1, 6)]);
    assert_eq!(merged, vec![iv(0, 7)]);
}

#[test]
fn touching_intervals_are_merged() {
    // Coalescing is inclusive, opposite of intersection: adjacent selections
    // must not render as fragmented blocks.
    assert_eq!(merge_overlapping(&[iv(0, 5), iv(5, 10)]), vec![iv(0, 10)]);
}

#[test]
fn zero_length_interval_is_absorbed_by_a_touching_block() {
    assert_eq!(merge_overlapping(&[iv(5, 5), iv(5, 7)]), vec![iv(5, 7)]);
}

#[test]
fn disjoint_intervals_keep_insertion_order() {
    // Output is first-absorbed-representative order, not sorted by start.
    let merged = merge_overlapping(&[iv(5, 7), iv(0, 2), iv(10, 12)]);
    assert_eq!(merged, vec![iv(5, 7), iv(0, 2), iv(10, 12)]);
}

#[test]
fn representative_widens_over_later_members() {
    let merged = merge_overlapping(&[iv(3, 5), iv(4, 8), iv(1, 4)]);
    assert_eq!(merged, vec![iv(1, 8)]);
}

#[test]
fn rerunning_merge_changes_nothing() {
    let input = [iv(0, 2), iv(5, 7), iv(1, 6), iv(9, 10), iv(10, 11)];
    let once = merge_overlapping(&input);
    let twice = merge_overlapping(&once);
    assert_eq!(once, twice);
}

#[test]
fn merge_of_empty_input_is_empty() {
    assert!(merge_overlapping::<chrono::DateTime<Utc>>(&[]).is_empty());
}
