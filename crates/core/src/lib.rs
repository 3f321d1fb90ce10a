//! Core types for the geodex lookup engine
//!
//! This crate defines the foundational types used throughout the system:
//! - Postcode: normalized 7-character primary key
//! - GridRef: national grid reference string
//! - Record: one entry of the record store (key, lat, lon, grid ref)
//! - PostcodeRow / GazetteerRow: decoded input rows from the ingestion side
//! - Place: a resolved gazetteer match
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod types;

pub use error::{Error, Result};
pub use key::{Postcode, POSTCODE_LEN};
pub use types::{GazetteerRow, GridRef, Place, PostcodeRow, Record, RecordId};
