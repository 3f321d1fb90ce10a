//! Binary record layouts
//!
//! All stores are flat arrays of fixed-width records with every
//! multi-byte field little-endian. String fields are NUL-padded to their
//! field width; trailing NULs are stripped on decode.
//!
//! ## Layouts
//!
//! ```text
//! Record (32 bytes, pc.dat, sorted by key):
//!   key                   8B   NUL-padded postcode
//!   lat                   f64 LE
//!   lon                   f64 LE
//!   grid_ref              8B   NUL-padded, may be all-NUL
//!
//! CoordEntry (12 bytes, lat.dat / lon.dat, sorted by value):
//!   value                 f64 LE
//!   record_id             u32 LE   → offset-index into pc.dat
//!
//! GridRefEntry (12 bytes, os.dat, sorted by grid_ref):
//!   grid_ref              8B   NUL-padded
//!   record_id             u32 LE
//!
//! GazetteerEntry (16 bytes, gaz.idx, sorted by referenced name):
//!   county_index          u32 LE   → county table
//!   text_offset           u32 LE   → byte offset into gaz.txt
//!   text_length           u16 LE
//!   grid_ref              6B   NUL-padded 4-figure reference
//! ```

use byteorder::{ByteOrder, LittleEndian};
use geodex_core::{GridRef, Postcode, Record, RecordId};

/// Width of the padded postcode key field
pub const KEY_FIELD_LEN: usize = 8;
/// Width of the padded grid-ref field in record and grid-ref stores
pub const GRID_REF_FIELD_LEN: usize = 8;
/// Width of the padded grid-ref field in gazetteer entries
pub const GAZ_GRID_REF_FIELD_LEN: usize = 6;

/// A fixed-width record that can be packed into and unpacked from a
/// sorted store file.
///
/// `decode` trusts its input: the bytes come from a size-validated
/// store slice, so decoding is infallible and malformed string bytes
/// degrade lossily rather than abort a scan.
pub trait FixedRecord: Sized {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Append the encoded record to `buf`
    fn encode(&self, buf: &mut Vec<u8>);

    /// Decode a record from exactly `SIZE` bytes
    fn decode(bytes: &[u8]) -> Self;
}

fn put_padded(buf: &mut Vec<u8>, s: &str, width: usize) {
    let bytes = s.as_bytes();
    debug_assert!(bytes.len() <= width, "field {s:?} wider than {width}");
    let take = bytes.len().min(width);
    buf.extend_from_slice(&bytes[..take]);
    buf.resize(buf.len() + (width - take), 0);
}

fn take_padded(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

impl FixedRecord for Record {
    const SIZE: usize = KEY_FIELD_LEN + 8 + 8 + GRID_REF_FIELD_LEN;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_padded(buf, self.key.as_str(), KEY_FIELD_LEN);
        buf.extend_from_slice(&self.lat.to_le_bytes());
        buf.extend_from_slice(&self.lon.to_le_bytes());
        put_padded(buf, self.grid_ref.as_str(), GRID_REF_FIELD_LEN);
    }

    fn decode(bytes: &[u8]) -> Self {
        Record {
            key: Postcode::from_stored(take_padded(&bytes[0..8])),
            lat: LittleEndian::read_f64(&bytes[8..16]),
            lon: LittleEndian::read_f64(&bytes[16..24]),
            grid_ref: GridRef::new(take_padded(&bytes[24..32])),
        }
    }
}

/// One entry of a coordinate index (latitude or longitude)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordEntry {
    /// Coordinate value in degrees
    pub value: f64,
    /// Offset-index of the referenced record
    pub record_id: RecordId,
}

impl FixedRecord for CoordEntry {
    const SIZE: usize = 8 + 4;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.value.to_le_bytes());
        buf.extend_from_slice(&self.record_id.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        CoordEntry {
            value: LittleEndian::read_f64(&bytes[0..8]),
            record_id: LittleEndian::read_u32(&bytes[8..12]),
        }
    }
}

/// One entry of the grid-reference index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRefEntry {
    /// 6-figure grid reference, never empty in a built index
    pub grid_ref: GridRef,
    /// Offset-index of the referenced record
    pub record_id: RecordId,
}

impl FixedRecord for GridRefEntry {
    const SIZE: usize = GRID_REF_FIELD_LEN + 4;

    fn encode(&self, buf: &mut Vec<u8>) {
        put_padded(buf, self.grid_ref.as_str(), GRID_REF_FIELD_LEN);
        buf.extend_from_slice(&self.record_id.to_le_bytes());
    }

    fn decode(bytes: &[u8]) -> Self {
        GridRefEntry {
            grid_ref: GridRef::new(take_padded(&bytes[0..8])),
            record_id: LittleEndian::read_u32(&bytes[8..12]),
        }
    }
}

/// One entry of the gazetteer index
///
/// `text_offset`/`text_length` address this entry's own name in the
/// text blob. They are captured when the name is appended, before the
/// entry list is sorted, and travel with the entry through the sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GazetteerEntry {
    /// Index into the county table
    pub county_index: u32,
    /// Byte offset of the name in the text blob
    pub text_offset: u32,
    /// Byte length of the name
    pub text_length: u16,
    /// 4-figure grid reference
    pub grid_ref: GridRef,
}

impl FixedRecord for GazetteerEntry {
    const SIZE: usize = 4 + 4 + 2 + GAZ_GRID_REF_FIELD_LEN;

    fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.county_index.to_le_bytes());
        buf.extend_from_slice(&self.text_offset.to_le_bytes());
        buf.extend_from_slice(&self.text_length.to_le_bytes());
        put_padded(buf, self.grid_ref.as_str(), GAZ_GRID_REF_FIELD_LEN);
    }

    fn decode(bytes: &[u8]) -> Self {
        GazetteerEntry {
            county_index: LittleEndian::read_u32(&bytes[0..4]),
            text_offset: LittleEndian::read_u32(&bytes[4..8]),
            text_length: LittleEndian::read_u16(&bytes[8..10]),
            grid_ref: GridRef::new(take_padded(&bytes[10..16])),
        }
    }
}
