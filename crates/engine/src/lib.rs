//! Query engine for the geodex lookup stores
//!
//! The [`Geodex`] handle owns every open store (record store, the two
//! coordinate indices, the grid-reference index, the gazetteer pair,
//! and the in-memory county table) and answers the three query types:
//! exact lookup by postcode, bounding-box lookup by coordinate, and
//! prefix/pattern lookup by place name.
//!
//! All stores are immutable once built; any number of handles may be
//! open over the same directory concurrently.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod db;
pub mod maps;

pub use db::Geodex;
pub use geodex_core::{
    Error, GazetteerRow, GridRef, Place, Postcode, PostcodeRow, Record, RecordId, Result,
};
pub use geodex_search::{BoundingBox, NearestOptions};
pub use maps::{google_maps_url, open_street_map_url};
