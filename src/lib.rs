//! Geodex - read-only, disk-resident lookup engine for geocoded records
//!
//! Geodex answers three query types over stores built once from
//! ingestion rows and never mutated afterwards:
//! - exact lookup by postcode key
//! - bounding-box and nearest-neighbour lookup by coordinate
//! - prefix/pattern lookup by place name, with duplicate-cluster
//!   expansion
//!
//! # Quick Start
//!
//! ```no_run
//! use geodex::{Geodex, BoundingBox, NearestOptions};
//!
//! # fn main() -> geodex::Result<()> {
//! let db = Geodex::open("/var/cache/geodex")?;
//!
//! if let Some((id, record)) = db.lookup("SP1 2BB")? {
//!     let near = db.find_nearest(record.lat, record.lon, NearestOptions::default())?;
//!     println!("{}: {} neighbours", record.key, near.len());
//! }
//!
//! for place in db.find_places("Wilton")? {
//!     println!("{} ({}) {}", place.name, place.county, place.grid_ref);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! Ingestion (CSV decoding, decompression) and geodetic conversion are
//! external collaborators: the builder consumes already-decoded rows,
//! and queries expose raw lat/lon pairs and grid references. Internal
//! store and search crates are not exposed; the engine API is the
//! public surface.

// Re-export the public API from geodex-engine
pub use geodex_engine::*;
