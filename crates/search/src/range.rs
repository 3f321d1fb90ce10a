//! Coordinate range and nearest-neighbour queries
//!
//! A bounding-box query runs two independent range queries, one per
//! coordinate index, and intersects the resulting record-id sets.
//! Bound finding never hard-fails on an exact-match miss: `lower_bound`
//! and `upper_bound` return the boundary position the search converged
//! on, so a range degrades to the nearest valid boundary instead of
//! raising an error. Both interval endpoints are inclusive.
//!
//! Nearest-neighbour search widens a square margin around the point,
//! doubling on every empty (or under-populated) retry. The loop is
//! capped: a sparse or empty store surfaces
//! [`geodex_core::Error::SearchExhausted`] rather than spinning.

use geodex_core::{Error, RecordId, Result};
use geodex_store::{CoordEntry, FixedFile};
use std::collections::BTreeSet;
use tracing::debug;

/// Initial nearest-neighbour margin in degrees
pub const DEFAULT_MARGIN: f64 = 0.0002;

/// Maximum number of margin doublings before giving up
pub const MAX_WIDEN_RETRIES: u32 = 24;

/// An inclusive latitude/longitude bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Lower latitude bound
    pub lat_lo: f64,
    /// Upper latitude bound
    pub lat_hi: f64,
    /// Lower longitude bound
    pub lon_lo: f64,
    /// Upper longitude bound
    pub lon_hi: f64,
}

impl BoundingBox {
    /// Create a box from explicit bounds
    pub fn new(lat_lo: f64, lat_hi: f64, lon_lo: f64, lon_hi: f64) -> Self {
        BoundingBox {
            lat_lo,
            lat_hi,
            lon_lo,
            lon_hi,
        }
    }

    /// A square box of `margin` degrees around a point
    pub fn around(lat: f64, lon: f64, margin: f64) -> Self {
        BoundingBox {
            lat_lo: lat - margin,
            lat_hi: lat + margin,
            lon_lo: lon - margin,
            lon_hi: lon + margin,
        }
    }
}

/// First index whose value is `>= bound`
///
/// Returns `index.len()` when every value is below the bound; never
/// fails on an exact-match miss.
pub fn lower_bound(index: &FixedFile<CoordEntry>, bound: f64) -> u32 {
    let mut lo = 0u32;
    let mut hi = index.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let entry = match index.get(mid) {
            Some(entry) => entry,
            None => break,
        };
        if entry.value < bound {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// First index whose value is `> bound`
pub fn upper_bound(index: &FixedFile<CoordEntry>, bound: f64) -> u32 {
    let mut lo = 0u32;
    let mut hi = index.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let entry = match index.get(mid) {
            Some(entry) => entry,
            None => break,
        };
        if entry.value <= bound {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Record ids whose coordinate value lies in `[lo, hi]` inclusive
pub fn range_ids(index: &FixedFile<CoordEntry>, lo: f64, hi: f64) -> Vec<RecordId> {
    let start = lower_bound(index, lo);
    let end = upper_bound(index, hi);
    (start..end)
        .filter_map(|idx| index.get(idx))
        .map(|entry| entry.record_id)
        .collect()
}

/// Record ids falling inside a bounding box
///
/// The intersection of the independent latitude and longitude range
/// queries.
pub fn box_ids(
    lat_index: &FixedFile<CoordEntry>,
    lon_index: &FixedFile<CoordEntry>,
    bbox: &BoundingBox,
) -> BTreeSet<RecordId> {
    let lats: BTreeSet<RecordId> = range_ids(lat_index, bbox.lat_lo, bbox.lat_hi)
        .into_iter()
        .collect();
    let lons: BTreeSet<RecordId> = range_ids(lon_index, bbox.lon_lo, bbox.lon_hi)
        .into_iter()
        .collect();
    lats.intersection(&lons).copied().collect()
}

/// Options for nearest-neighbour search
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestOptions {
    /// Initial square margin in degrees (default [`DEFAULT_MARGIN`])
    pub margin: Option<f64>,
    /// Keep widening until at least this many records are found
    /// (default 1)
    pub min_results: Option<usize>,
}

/// Record ids near a point, widening a square margin until enough are
/// found
///
/// # Errors
///
/// [`Error::SearchExhausted`] once the margin has been doubled
/// [`MAX_WIDEN_RETRIES`] times without satisfying the request; this is
/// the store-is-empty-or-too-sparse outcome.
pub fn nearest(
    lat_index: &FixedFile<CoordEntry>,
    lon_index: &FixedFile<CoordEntry>,
    lat: f64,
    lon: f64,
    opts: NearestOptions,
) -> Result<BTreeSet<RecordId>> {
    let want = opts.min_results.unwrap_or(1).max(1);
    let mut margin = opts.margin.unwrap_or(DEFAULT_MARGIN);

    for retry in 0..=MAX_WIDEN_RETRIES {
        let ids = box_ids(lat_index, lon_index, &BoundingBox::around(lat, lon, margin));
        if ids.len() >= want {
            return Ok(ids);
        }
        debug!(
            target: "geodex::search",
            retry,
            margin,
            found = ids.len(),
            want,
            "widening nearest-neighbour margin"
        );
        margin *= 2.0;
    }

    Err(Error::SearchExhausted {
        retries: MAX_WIDEN_RETRIES,
        margin,
    })
}
