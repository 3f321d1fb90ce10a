//! Binary search primitive and adjacency-cluster expansion
//!
//! The comparator orders the examined record relative to the target:
//! `Less` means the record sorts before the target, `Greater` after.
//! Searches are iterative with explicit lo/hi bounds, so stack usage is
//! independent of file size.

use geodex_store::{FixedFile, FixedRecord};
use std::cmp::Ordering;

/// Find any record comparing `Equal` under `cmp`
///
/// Returns the index of the first record observed as `Equal`, or `None`
/// when no record matches. An empty file returns `None` immediately.
///
/// When several records compare `Equal` (a duplicate-key cluster), which
/// member is returned is unspecified; callers needing the full cluster
/// must follow up with [`expand_cluster`].
pub fn binary_search<R, F>(file: &FixedFile<R>, cmp: F) -> Option<u32>
where
    R: FixedRecord,
    F: Fn(&R) -> Ordering,
{
    let mut lo = 0u32;
    let mut hi = file.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let record = file.get(mid)?;
        match cmp(&record) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    None
}

/// Expand a known match into its full adjacency cluster
///
/// Scans backward then forward from `hit` one record at a time,
/// including every adjacent record that still compares `Equal`, and
/// stops at the first mismatch in each direction. Returns the matching
/// indices in ascending order.
///
/// This is correct only when matching records form a contiguous run
/// under the file's sort order, which holds for exact-key and
/// literal-prefix comparators on a file sorted by that key. It is not
/// guaranteed for arbitrary pattern comparators; those must fall back
/// to a linear scan.
pub fn expand_cluster<R, F>(file: &FixedFile<R>, hit: u32, cmp: F) -> Vec<u32>
where
    R: FixedRecord,
    F: Fn(&R) -> Ordering,
{
    let mut idxs = vec![hit];

    // Look backwards
    let mut idx = hit;
    while idx > 0 {
        idx -= 1;
        match file.get(idx) {
            Some(record) if cmp(&record) == Ordering::Equal => idxs.push(idx),
            _ => break,
        }
    }

    // Look forwards
    let mut idx = hit + 1;
    while idx < file.len() {
        match file.get(idx) {
            Some(record) if cmp(&record) == Ordering::Equal => idxs.push(idx),
            _ => break,
        }
        idx += 1;
    }

    idxs.sort_unstable();
    idxs
}
