//! Record and row types
//!
//! One explicit type per store record, consumed through named fields
//! rather than positional tuples. Input rows (`PostcodeRow`,
//! `GazetteerRow`) are what the ingestion collaborator hands the
//! builder, already decompressed and parsed.

use crate::key::Postcode;
use std::fmt;

/// Zero-based positional index into the record store
///
/// Secondary indices refer to records by this offset-index, never by a
/// byte pointer.
pub type RecordId = u32;

/// National grid reference
///
/// Compact alphanumeric encoding of a grid coordinate: a regional
/// letter pair followed by digit pairs for easting and northing, e.g.
/// `"SX123456"` (6-figure) or `"SU1234"` (4-figure). May be empty when
/// the source row carried no reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridRef(String);

impl GridRef {
    /// Wrap a grid reference string
    pub fn new(s: impl Into<String>) -> Self {
        GridRef(s.into())
    }

    /// The reference as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the source row carried no grid reference
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expand a 4-figure reference to the 6-figure form
    ///
    /// Appends a trailing zero to each of the easting and northing
    /// halves: `"SU1234"` becomes `"SU120340"`. References that are not
    /// in the 4-figure form are returned unchanged.
    pub fn expand_four_digit(&self) -> GridRef {
        if self.0.len() != 6 {
            return self.clone();
        }
        let (head, tail) = self.0.split_at(4);
        GridRef(format!("{}0{}0", head, tail))
    }
}

impl AsRef<str> for GridRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GridRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the record store
///
/// The record store is totally ordered by `key` ascending. Keys are
/// assumed unique by the ingestion side; the store does not enforce it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Normalized postcode key
    pub key: Postcode,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// 6-figure grid reference, possibly empty
    pub grid_ref: GridRef,
}

impl Record {
    /// Create a record
    pub fn new(key: Postcode, lat: f64, lon: f64, grid_ref: GridRef) -> Self {
        Record {
            key,
            lat,
            lon,
            grid_ref,
        }
    }
}

/// Decoded postcode row supplied by the ingestion collaborator
///
/// The key is raw, not yet normalized; the builder normalizes it and
/// rejects rows whose key fails validation.
#[derive(Debug, Clone, PartialEq)]
pub struct PostcodeRow {
    /// Raw postcode as it appeared in the source
    pub key: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// 6-figure grid reference, possibly empty
    pub grid_ref: String,
}

impl PostcodeRow {
    /// Create a row
    pub fn new(
        key: impl Into<String>,
        lat: f64,
        lon: f64,
        grid_ref: impl Into<String>,
    ) -> Self {
        PostcodeRow {
            key: key.into(),
            lat,
            lon,
            grid_ref: grid_ref.into(),
        }
    }
}

/// Decoded gazetteer row supplied by the ingestion collaborator
#[derive(Debug, Clone, PartialEq)]
pub struct GazetteerRow {
    /// Place name; dual-language names keep only the part before `/`
    pub name: String,
    /// 4-figure grid reference
    pub grid_ref: String,
    /// Administrative county name
    pub county: String,
}

impl GazetteerRow {
    /// Create a row
    pub fn new(
        name: impl Into<String>,
        grid_ref: impl Into<String>,
        county: impl Into<String>,
    ) -> Self {
        GazetteerRow {
            name: name.into(),
            grid_ref: grid_ref.into(),
            county: county.into(),
        }
    }
}

/// A resolved gazetteer match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    /// Place name from the text blob
    pub name: String,
    /// 4-figure grid reference
    pub grid_ref: GridRef,
    /// County name from the county table
    pub county: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_ref_expand_four_digit() {
        assert_eq!(
            GridRef::new("SU1234").expand_four_digit().as_str(),
            "SU120340"
        );
        // Already 6-figure: unchanged
        assert_eq!(
            GridRef::new("SX123456").expand_four_digit().as_str(),
            "SX123456"
        );
        assert_eq!(GridRef::default().expand_four_digit().as_str(), "");
    }

    #[test]
    fn test_grid_ref_empty() {
        assert!(GridRef::default().is_empty());
        assert!(!GridRef::new("SX123456").is_empty());
    }

    #[test]
    fn test_record_fields() {
        let r = Record::new(
            Postcode::parse("AB1 1AA").unwrap(),
            51.0,
            -1.0,
            GridRef::new("SX123456"),
        );
        assert_eq!(r.key.as_str(), "AB1 1AA");
        assert_eq!(r.lat, 51.0);
        assert_eq!(r.lon, -1.0);
        assert_eq!(r.grid_ref.as_str(), "SX123456");
    }
}
