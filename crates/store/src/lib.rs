//! Disk store layer for the geodex lookup engine
//!
//! This crate implements the immutable binary stores and their one-shot
//! builder:
//! - Fixed little-endian record layouts (`format`)
//! - Mmap-backed random access to sorted fixed-width files (`FixedFile`)
//! - The in-memory county name table (`CountyTable`)
//! - The gazetteer index + text blob pair (`GazetteerStore`)
//! - Idempotent, crash-safe construction of all of the above (`Builder`)
//!
//! Every store is created once, atomically, and never mutated. Readers
//! may open the files concurrently without coordination.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod county;
pub mod fixed_file;
pub mod format;
pub mod gazetteer;

pub use builder::{
    Builder, COUNTY_FILE, GAZ_INDEX_FILE, GAZ_TEXT_FILE, GRID_REF_FILE, LAT_FILE, LON_FILE,
    RECORD_FILE,
};
pub use county::CountyTable;
pub use fixed_file::{Blob, FixedFile};
pub use format::{CoordEntry, FixedRecord, GazetteerEntry, GridRefEntry};
pub use gazetteer::GazetteerStore;
