//! Range decomposition search.
//!
//! Turns a set of query boxes in curve space into a short, sorted list of
//! contiguous Z-value intervals that a range-scanning store can read.
//!
//! # Algorithm
//!
//! 1. Find the longest bit prefix shared by every bound corner. Everything the
//!    query can touch lives in the cell identified by that prefix.
//! 2. Walk the cell tree breadth first, one level per `dimensions` bits. Each
//!    child cell is either:
//!    - **contained** in some bound (or already at the precision floor):
//!      emitted as a `contained = true` range,
//!    - **overlapping** some bound: queued for the next level,
//!    - **disjoint** from every bound: dropped.
//! 3. When the depth or range budget runs out, any cell still queued is
//!    emitted as `contained = false`, so the result always covers the query.
//! 4. Sort the ranges and merge adjacent or overlapping ones.
//!
//! # Budgets
//!
//! | Parameter     | Effect                                              | `0` means  |
//! |---------------|-----------------------------------------------------|------------|
//! | `precision`   | Cells at or below `64 - precision` bits stop early  | whole cell |
//! | `max_ranges`  | Stops subdividing once this many ranges are emitted | unbounded  |
//! | `max_recurse` | Maximum number of levels below the starting cell    | 20 levels  |
//!
//! A precision of 64 disables the floor entirely.

mod queue;

pub use queue::{RingQueue, MIN_CAPACITY};

use tracing::{debug, trace};

use crate::curve::ZCurve;
use crate::error::{Result, ZOrderError};
use crate::range::{BoundedRange, IndexRange};

/// Recursion depth used when the caller passes `max_recurse = 0`.
pub const DEFAULT_RECURSE_LIMIT: usize = 20;

/// Entry in the breadth-first work queue.
#[derive(Debug, Clone, Copy)]
enum WorkItem {
    /// Cell that overlaps the query but is not yet resolved.
    Cell(BoundedRange),
    /// Marks the end of one tree level.
    LevelEnd,
}

/// Computes the scan ranges covering `bounds` on `curve`.
///
/// `precision` is the number of leading Z-value bits that must be resolved
/// before a cell is accepted without further subdivision. `max_ranges` and
/// `max_recurse` bound the work done; see the module docs for their zero
/// values.
///
/// The result is sorted by `lower`, non-overlapping and never empty.
///
/// # Errors
///
/// - [`ZOrderError::EmptyQuery`] if `bounds` is empty.
/// - [`ZOrderError::Internal`] if the search finished without emitting a range.
pub fn calculate_ranges<C: ZCurve>(
    curve: &C,
    bounds: &[BoundedRange],
    precision: u32,
    max_ranges: usize,
    max_recurse: usize,
) -> Result<Vec<IndexRange>> {
    if bounds.is_empty() {
        return Err(ZOrderError::EmptyQuery);
    }

    let max_ranges = if max_ranges == 0 { usize::MAX } else { max_ranges };
    let max_recurse = if max_recurse == 0 {
        DEFAULT_RECURSE_LIMIT
    } else {
        max_recurse
    };

    let corners: Vec<u64> = bounds.iter().flat_map(|b| [b.min(), b.max()]).collect();
    let (prefix, common_bits) =
        longest_common_prefix(curve.total_bits(), curve.dimensions(), &corners)?;

    let search = Search {
        curve,
        bounds,
        precision_floor: 64 - i64::from(precision),
    };
    let step = curve.dimensions() as i32;
    let mut offset = 64 - common_bits as i32;

    let mut ranges = Vec::new();
    let mut remaining = RingQueue::new();

    search.check_cell(prefix, 0, offset, &mut ranges, &mut remaining)?;
    remaining.push(WorkItem::LevelEnd);
    offset -= step;

    let mut level = 0;
    while level < max_recurse && offset >= 0 && ranges.len() < max_ranges {
        let Some(item) = remaining.pop() else {
            break;
        };
        match item {
            WorkItem::LevelEnd => {
                if !remaining.is_empty() {
                    level += 1;
                    offset -= step;
                    trace!(level, offset, pending = remaining.len(), "descending");
                    remaining.push(WorkItem::LevelEnd);
                }
            }
            WorkItem::Cell(cell) => {
                for quadrant in 0..curve.quadrants() {
                    search.check_cell(cell.min(), quadrant, offset, &mut ranges, &mut remaining)?;
                }
            }
        }
    }

    // Whatever the budget left unresolved still has to be scanned
    let mut unresolved = 0usize;
    while let Some(item) = remaining.pop() {
        if let WorkItem::Cell(cell) = item {
            ranges.push(IndexRange::new(cell.min(), cell.max(), false));
            unresolved += 1;
        }
    }

    if ranges.is_empty() {
        return Err(ZOrderError::Internal(
            "range search emitted no ranges".to_string(),
        ));
    }

    let emitted = ranges.len();
    let merged = merge_ranges(ranges);
    debug!(
        bounds = bounds.len(),
        common_bits,
        levels = level,
        emitted,
        unresolved,
        ranges = merged.len(),
        "range search complete"
    );

    Ok(merged)
}

/// Query state shared by every cell check of one search.
struct Search<'a, C> {
    curve: &'a C,
    bounds: &'a [BoundedRange],
    precision_floor: i64,
}

impl<C: ZCurve> Search<'_, C> {
    /// Classifies the child cell `prefix | (quadrant << offset)`.
    fn check_cell(
        &self,
        prefix: u64,
        quadrant: u64,
        offset: i32,
        ranges: &mut Vec<IndexRange>,
        remaining: &mut RingQueue<WorkItem>,
    ) -> Result<()> {
        let shift = offset as u32;
        let min = prefix | (quadrant << shift);
        let max = min | ((1u64 << shift) - 1);
        let cell = BoundedRange::new(min, max)?;

        if is_contained(self.curve, self.bounds, &cell) || i64::from(offset) < self.precision_floor {
            ranges.push(IndexRange::new(min, max, true));
        } else if is_overlapped(self.curve, self.bounds, &cell) {
            remaining.push(WorkItem::Cell(cell));
        }

        Ok(())
    }
}

/// Finds the longest prefix shared by all `values`.
///
/// Compares `dimensions` bits at a time, starting from the top of a
/// `total_bits`-wide Z-value, so the prefix always ends on a cell boundary.
/// Returns the prefix with all lower bits cleared and the number of leading
/// bits (out of 64) it fixes.
///
/// # Errors
///
/// Returns [`ZOrderError::InsufficientInput`] if fewer than two values are given.
pub fn longest_common_prefix(
    total_bits: u32,
    dimensions: u32,
    values: &[u64],
) -> Result<(u64, u32)> {
    if values.len() < 2 {
        return Err(ZOrderError::InsufficientInput(values.len()));
    }

    let step = dimensions as i32;
    let first = values[0];
    let mut bit_shift = total_bits as i32 - step;

    while bit_shift >= 0 {
        let head = first >> bit_shift;
        if values[1..].iter().all(|v| v >> bit_shift == head) {
            bit_shift -= step;
        } else {
            break;
        }
    }
    bit_shift += step;

    let shift = bit_shift as u32;
    let mask = u64::MAX.checked_shl(shift).unwrap_or(0);

    Ok((first & mask, 64 - shift))
}

/// Returns true if `range` lies inside at least one of `bounds` on every axis.
pub fn is_contained<C: ZCurve>(curve: &C, bounds: &[BoundedRange], range: &BoundedRange) -> bool {
    bounds
        .iter()
        .any(|bound| curve.contains(bound, range.min()) && curve.contains(bound, range.max()))
}

/// Returns true if `range` intersects at least one of `bounds`.
pub fn is_overlapped<C: ZCurve>(curve: &C, bounds: &[BoundedRange], range: &BoundedRange) -> bool {
    bounds.iter().any(|bound| curve.overlaps(bound, range))
}

/// Sorts `ranges` and coalesces every pair that overlaps or touches.
///
/// A merged range is `contained` only if all of its parts were.
pub fn merge_ranges(mut ranges: Vec<IndexRange>) -> Vec<IndexRange> {
    ranges.sort_by_key(|r| (r.lower, r.upper));

    let mut merged: Vec<IndexRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(current) if range.lower <= current.upper.saturating_add(1) => {
                current.upper = current.upper.max(range.upper);
                current.contained &= range.contained;
            }
            _ => merged.push(range),
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{Z2, Z3};

    fn z2_box(min: (u32, u32), max: (u32, u32)) -> BoundedRange {
        BoundedRange::new(Z2::interleave(min.0, min.1), Z2::interleave(max.0, max.1)).unwrap()
    }

    fn z3_box(min: (u32, u32, u32), max: (u32, u32, u32)) -> BoundedRange {
        BoundedRange::new(
            Z3::interleave(min.0, min.1, min.2),
            Z3::interleave(max.0, max.1, max.2),
        )
        .unwrap()
    }

    fn covered(ranges: &[IndexRange], z: u64) -> Option<&IndexRange> {
        ranges.iter().find(|r| r.contains(z))
    }

    // =========================================================================
    // Longest common prefix
    // =========================================================================

    #[test]
    fn test_lcp_two_values() {
        let result =
            longest_common_prefix(63, 3, &[8112745685912240673, 8770437881794063205]).unwrap();
        assert_eq!(result, (8070450532247928832, 4));
    }

    #[test]
    fn test_lcp_three_values() {
        let values = [4086666153209713566, 4086668626887099574, 4086668390556888644];
        let result = longest_common_prefix(63, 3, &values).unwrap();
        assert_eq!(result, (4086664818117836800, 22));
    }

    #[test]
    fn test_lcp_identical_values_keeps_every_bit() {
        let result = longest_common_prefix(62, 2, &[45, 45]).unwrap();
        assert_eq!(result, (45, 64));
    }

    #[test]
    fn test_lcp_no_shared_prefix() {
        // Top 2D cell bits differ straight away
        let result = longest_common_prefix(62, 2, &[0, 1u64 << 61]).unwrap();
        assert_eq!(result, (0, 2));
    }

    #[test]
    fn test_lcp_requires_two_values() {
        assert_eq!(
            longest_common_prefix(62, 2, &[12]),
            Err(ZOrderError::InsufficientInput(1))
        );
        assert_eq!(
            longest_common_prefix(62, 2, &[]),
            Err(ZOrderError::InsufficientInput(0))
        );
    }

    // =========================================================================
    // Containment and overlap
    // =========================================================================

    #[test]
    fn test_is_contained_any_bound() {
        let bounds = [z2_box((0, 0), (1, 1)), z2_box((2, 2), (3, 6))];

        assert!(is_contained(&Z2, &bounds, &BoundedRange::new(12, 15).unwrap()));
        assert!(is_contained(&Z2, &bounds, &BoundedRange::new(0, 3).unwrap()));
        // 36..=39 decodes to (2..=3, 4..=5): second bound
        assert!(is_contained(&Z2, &bounds, &BoundedRange::new(36, 39).unwrap()));
        // (0..=1, 2..=3) sits in neither bound
        assert!(!is_contained(&Z2, &bounds, &BoundedRange::new(8, 11).unwrap()));
    }

    #[test]
    fn test_is_overlapped_any_bound() {
        let bounds = [z2_box((2, 2), (3, 6))];

        // (0..=3, 0..=3) shares (2..=3, 2..=3) with the bound
        assert!(is_overlapped(&Z2, &bounds, &BoundedRange::new(0, 15).unwrap()));
        // (4..=7, 0..=3) is entirely to the right
        assert!(!is_overlapped(&Z2, &bounds, &BoundedRange::new(16, 31).unwrap()));
        assert!(!is_overlapped(&Z2, &[], &BoundedRange::new(0, 15).unwrap()));
    }

    #[test]
    fn test_contained_implies_overlapped() {
        let bounds = [z3_box((2, 2, 0), (3, 6, 0))];
        let cell = BoundedRange::new(24, 27).unwrap();
        assert!(is_contained(&Z3, &bounds, &cell));
        assert!(is_overlapped(&Z3, &bounds, &cell));
    }

    // =========================================================================
    // Merging
    // =========================================================================

    #[test]
    fn test_merge_adjacent_and_overlapping() {
        let ranges = vec![
            IndexRange::new(20, 25, true),
            IndexRange::new(0, 3, true),
            IndexRange::new(4, 7, false),
            IndexRange::new(10, 12, true),
            IndexRange::new(11, 15, true),
        ];

        assert_eq!(
            merge_ranges(ranges),
            vec![
                IndexRange::new(0, 7, false),
                IndexRange::new(10, 15, true),
                IndexRange::new(20, 25, true),
            ]
        );
    }

    #[test]
    fn test_merge_keeps_wider_upper() {
        let ranges = vec![IndexRange::new(0, 100, true), IndexRange::new(5, 10, true)];
        assert_eq!(merge_ranges(ranges), vec![IndexRange::new(0, 100, true)]);
    }

    #[test]
    fn test_merge_at_top_of_domain() {
        let ranges = vec![
            IndexRange::new(u64::MAX - 1, u64::MAX, true),
            IndexRange::new(u64::MAX, u64::MAX, true),
        ];
        assert_eq!(merge_ranges(ranges), vec![IndexRange::new(u64::MAX - 1, u64::MAX, true)]);
    }

    #[test]
    fn test_merge_empty() {
        assert!(merge_ranges(Vec::new()).is_empty());
    }

    // =========================================================================
    // Range search
    // =========================================================================

    #[test]
    fn test_calculate_ranges_2d() {
        let bounds = [z2_box((2, 2), (3, 6))];
        let ranges = calculate_ranges(&Z2, &bounds, 64, 0, 7).unwrap();

        assert_eq!(
            ranges,
            vec![
                IndexRange::new(12, 15, true),
                IndexRange::new(36, 39, true),
                IndexRange::new(44, 45, true),
            ]
        );
    }

    #[test]
    fn test_calculate_ranges_2d_touching_origin() {
        let bounds = [z2_box((0, 2), (3, 5))];
        let ranges = calculate_ranges(&Z2, &bounds, 64, 0, 7).unwrap();

        assert_eq!(
            ranges,
            vec![IndexRange::new(8, 15, true), IndexRange::new(32, 39, true)]
        );
    }

    #[test]
    fn test_calculate_ranges_3d() {
        let bounds = [z3_box((2, 2, 0), (3, 6, 0))];
        let ranges = calculate_ranges(&Z3, &bounds, 64, 0, 7).unwrap();

        assert_eq!(
            ranges,
            vec![
                IndexRange::new(24, 27, true),
                IndexRange::new(136, 139, true),
                IndexRange::new(152, 153, true),
            ]
        );
    }

    #[test]
    fn test_calculate_ranges_single_point() {
        let z = Z2::interleave(1082042347, 1593476068);
        let bounds = [BoundedRange::new(z, z).unwrap()];
        let ranges = calculate_ranges(&Z2, &bounds, 64, 0, 7).unwrap();
        assert_eq!(ranges, vec![IndexRange::new(z, z, true)]);
    }

    #[test]
    fn test_calculate_ranges_precision_floor_accepts_coarse_cells() {
        // With 60 bits of precision, 4-value cells are accepted without
        // checking them against the query.
        let bounds = [z2_box((2, 2), (3, 6))];
        let ranges = calculate_ranges(&Z2, &bounds, 60, 0, 7).unwrap();

        assert_eq!(
            ranges,
            vec![IndexRange::new(0, 15, true), IndexRange::new(32, 47, true)]
        );
    }

    #[test]
    fn test_calculate_ranges_depth_budget_flushes_unresolved() {
        let bounds = [z2_box((2, 2), (3, 6))];
        // One level below the starting cell leaves 0..=15 and 32..=47 pending
        let ranges = calculate_ranges(&Z2, &bounds, 64, 0, 1).unwrap();

        assert_eq!(
            ranges,
            vec![IndexRange::new(0, 15, false), IndexRange::new(32, 47, false)]
        );
    }

    #[test]
    fn test_calculate_ranges_range_budget_stops_early() {
        let bounds = [z2_box((1000, 1000), (1500, 1300))];
        let unbounded = calculate_ranges(&Z2, &bounds, 64, 0, 20).unwrap();
        let bounded = calculate_ranges(&Z2, &bounds, 64, 10, 20).unwrap();

        assert!(bounded.len() < unbounded.len());
        assert!(bounded.iter().any(|r| !r.contained));
    }

    #[test]
    fn test_calculate_ranges_multiple_bounds() {
        let bounds = [z2_box((0, 0), (1, 1)), z2_box((2, 2), (3, 3))];
        let ranges = calculate_ranges(&Z2, &bounds, 64, 0, 7).unwrap();
        assert_eq!(
            ranges,
            vec![IndexRange::new(0, 3, true), IndexRange::new(12, 15, true)]
        );
    }

    #[test]
    fn test_calculate_ranges_rejects_empty_bounds() {
        assert_eq!(
            calculate_ranges(&Z2, &[], 64, 0, 7),
            Err(ZOrderError::EmptyQuery)
        );
    }

    #[test]
    fn test_full_domain_is_one_range() {
        let bounds = [z2_box((0, 0), (0x7fff_ffff, 0x7fff_ffff))];
        let ranges = calculate_ranges(&Z2, &bounds, 64, 0, 7).unwrap();
        assert_eq!(ranges, vec![IndexRange::new(0, (1u64 << 62) - 1, true)]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn ordered(a: u32, b: u32) -> (u32, u32) {
            (a.min(b), a.max(b))
        }

        proptest! {
            #[test]
            fn test_merge_is_idempotent(
                raw in proptest::collection::vec((0u64..1000, 0u64..50, any::<bool>()), 0..40)
            ) {
                let ranges: Vec<_> = raw
                    .into_iter()
                    .map(|(lower, len, contained)| IndexRange::new(lower, lower + len, contained))
                    .collect();
                let once = merge_ranges(ranges.clone());
                let twice = merge_ranges(once.clone());
                prop_assert_eq!(&once, &twice);

                // Every input value is still covered
                for range in &ranges {
                    prop_assert!(covered(&once, range.lower).is_some());
                    prop_assert!(covered(&once, range.upper).is_some());
                }
                // Sorted with a gap between neighbours
                for pair in once.windows(2) {
                    prop_assert!(pair[0].upper + 1 < pair[1].lower);
                }
            }

            #[test]
            fn test_2d_full_depth_is_exact(
                x in (0u32..64, 0u32..64).prop_map(|(a, b)| ordered(a, b)),
                y in (0u32..64, 0u32..64).prop_map(|(a, b)| ordered(a, b))
            ) {
                let bounds = [z2_box((x.0, y.0), (x.1, y.1))];
                let ranges = calculate_ranges(&Z2, &bounds, 64, 0, 0)?;

                prop_assert!(ranges.iter().all(|r| r.contained));
                for z in 0..4096u64 {
                    let (px, py) = Z2::deinterleave(z);
                    let inside = px >= x.0 && px <= x.1 && py >= y.0 && py <= y.1;
                    prop_assert_eq!(covered(&ranges, z).is_some(), inside, "z = {}", z);
                }
            }

            #[test]
            fn test_2d_budgeted_search_is_sound(
                x in (0u32..64, 0u32..64).prop_map(|(a, b)| ordered(a, b)),
                y in (0u32..64, 0u32..64).prop_map(|(a, b)| ordered(a, b)),
                max_recurse in 1usize..4,
                max_ranges in 0usize..6
            ) {
                let bounds = [z2_box((x.0, y.0), (x.1, y.1))];
                let ranges = calculate_ranges(&Z2, &bounds, 64, max_ranges, max_recurse)?;

                for z in 0..4096u64 {
                    let (px, py) = Z2::deinterleave(z);
                    let inside = px >= x.0 && px <= x.1 && py >= y.0 && py <= y.1;
                    match covered(&ranges, z) {
                        // No false negatives
                        None => prop_assert!(!inside, "z = {} missed", z),
                        // Contained ranges hold no false positives
                        Some(range) if range.contained => prop_assert!(inside, "z = {} leaked", z),
                        Some(_) => {}
                    }
                }
            }

            #[test]
            fn test_3d_full_depth_is_exact(
                x in (0u32..16, 0u32..16).prop_map(|(a, b)| ordered(a, b)),
                y in (0u32..16, 0u32..16).prop_map(|(a, b)| ordered(a, b)),
                t in (0u32..16, 0u32..16).prop_map(|(a, b)| ordered(a, b))
            ) {
                let bounds = [z3_box((x.0, y.0, t.0), (x.1, y.1, t.1))];
                let ranges = calculate_ranges(&Z3, &bounds, 64, 0, 0)?;

                for z in 0..4096u64 {
                    let (px, py, pt) = Z3::deinterleave(z);
                    let inside = px >= x.0 && px <= x.1
                        && py >= y.0 && py <= y.1
                        && pt >= t.0 && pt <= t.1;
                    prop_assert_eq!(covered(&ranges, z).is_some(), inside, "z = {}", z);
                }
            }
        }
    }
}
