//! Search algorithms over the geodex store files
//!
//! Three building blocks compose every query the engine answers:
//! - `bsearch`: iterative binary search over a sorted fixed-width file,
//!   plus adjacency-cluster expansion around a known match
//! - `range`: coordinate bound search, inclusive range and bounding-box
//!   intersection, and the capped margin-widening nearest-neighbour loop
//! - `gazetteer`: place-name matching with a literal-prefix fast path
//!   and a linear-scan fallback for general patterns

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bsearch;
pub mod gazetteer;
pub mod range;

pub use bsearch::{binary_search, expand_cluster};
pub use gazetteer::{find_places, needs_linear_scan};
pub use range::{
    box_ids, lower_bound, nearest, range_ids, upper_bound, BoundingBox, NearestOptions,
    DEFAULT_MARGIN, MAX_WIDEN_RETRIES,
};
