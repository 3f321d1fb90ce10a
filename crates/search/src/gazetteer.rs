//! Gazetteer place-name matching
//!
//! Two paths, selected by inspecting the pattern:
//! - **Literal-prefix fast path**: a pattern with no metacharacters is
//!   a left-anchored literal, answered by binary search plus adjacency
//!   expansion against the name-sorted index. The comparator compares
//!   the pattern against the name's leading substring of equal length,
//!   so all matches form one contiguous run and expansion is sound.
//! - **General pattern path**: anything else falls back to a full
//!   linear scan applying an anchored regex to every entry. O(N) but
//!   correct for arbitrary patterns, which need not cluster under the
//!   sort order.

use crate::bsearch::{binary_search, expand_cluster};
use geodex_core::{Error, Result};
use geodex_store::{GazetteerEntry, GazetteerStore};
use regex::Regex;
use std::cmp::Ordering;

/// Characters that force the linear-scan path
pub const PATTERN_METACHARACTERS: &[char] = &['.', '*', '?', '[', ']', '+', '{', '}'];

/// True when the pattern cannot be treated as a left-anchored literal
pub fn needs_linear_scan(pattern: &str) -> bool {
    pattern.contains(PATTERN_METACHARACTERS)
}

/// Find gazetteer entries whose name matches the pattern
///
/// Returns index positions into the gazetteer, ascending. A pattern
/// without metacharacters takes the binary-search fast path; the result
/// set is identical to what the scan path would produce for it.
///
/// # Errors
///
/// [`Error::InvalidPattern`] when a metacharacter pattern fails to
/// compile as a regex.
pub fn find_places(store: &GazetteerStore, pattern: &str) -> Result<Vec<u32>> {
    if needs_linear_scan(pattern) {
        scan_entries(store, pattern)
    } else {
        Ok(prefix_entries(store, pattern))
    }
}

/// Order a name relative to a literal prefix target
///
/// The name's leading substring of the pattern's length is compared; a
/// name shorter than the pattern sorts by its whole text.
fn prefix_cmp(name: &[u8], pattern: &[u8]) -> Ordering {
    let take = name.len().min(pattern.len());
    match name[..take].cmp(&pattern[..take]) {
        Ordering::Equal if name.len() >= pattern.len() => Ordering::Equal,
        Ordering::Equal => Ordering::Less,
        other => other,
    }
}

/// Literal-prefix fast path: binary search + adjacency expansion
pub fn prefix_entries(store: &GazetteerStore, pattern: &str) -> Vec<u32> {
    let pat = pattern.as_bytes();
    let cmp = |entry: &GazetteerEntry| match store.name_bytes(entry) {
        Some(name) => prefix_cmp(name, pat),
        // Entry addresses bytes outside the blob; order it after the
        // target so the search walks away from it
        None => Ordering::Greater,
    };

    match binary_search(store.index(), cmp) {
        Some(hit) => expand_cluster(store.index(), hit, cmp),
        None => Vec::new(),
    }
}

/// General pattern path: anchored regex over every entry
fn scan_entries(store: &GazetteerStore, pattern: &str) -> Result<Vec<u32>> {
    let re = Regex::new(&format!("^(?:{pattern})")).map_err(|err| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })?;

    let mut hits = Vec::new();
    for idx in 0..store.len() {
        let entry = match store.entry(idx) {
            Some(entry) => entry,
            None => break,
        };
        if let Some(name) = store.name(&entry) {
            if re.is_match(&name) {
                hits.push(idx);
            }
        }
    }
    Ok(hits)
}
