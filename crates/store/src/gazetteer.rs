//! Gazetteer store
//!
//! Two files built as a pair: `gaz.txt`, a text blob of place names
//! concatenated with no delimiters, and `gaz.idx`, a fixed-width index
//! sorted ascending by the name each entry addresses. An entry's
//! `text_offset`/`text_length` always reference that entry's own name;
//! the builder captures them before sorting and they travel with the
//! entry through the reorder.

use crate::fixed_file::{Blob, FixedFile};
use crate::format::GazetteerEntry;
use geodex_core::Result;
use std::path::Path;

/// Open gazetteer index + text blob pair
pub struct GazetteerStore {
    index: FixedFile<GazetteerEntry>,
    text: Blob,
}

impl GazetteerStore {
    /// Open both files
    ///
    /// # Errors
    ///
    /// [`geodex_core::Error::MissingSourceFile`] if either file is
    /// absent, [`geodex_core::Error::IndexCorrupt`] if the index size is
    /// not a whole number of entries.
    pub fn open(index_path: &Path, text_path: &Path) -> Result<Self> {
        let index = FixedFile::open(index_path)?;
        let text = Blob::open(text_path)?;
        Ok(GazetteerStore { index, text })
    }

    /// Build a store over in-memory parts
    pub fn from_parts(index: FixedFile<GazetteerEntry>, text: Blob) -> Self {
        GazetteerStore { index, text }
    }

    /// The sorted index file
    pub fn index(&self) -> &FixedFile<GazetteerEntry> {
        &self.index
    }

    /// Number of gazetteer entries
    pub fn len(&self) -> u32 {
        self.index.len()
    }

    /// True when the gazetteer holds no entries
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Entry at `idx`, or `None` past the end
    pub fn entry(&self, idx: u32) -> Option<GazetteerEntry> {
        self.index.get(idx)
    }

    /// Raw name bytes addressed by an entry
    ///
    /// Returns `None` when the entry's offset/length fall outside the
    /// blob, which only happens on mismatched index/blob files.
    pub fn name_bytes(&self, entry: &GazetteerEntry) -> Option<&[u8]> {
        self.text.slice(entry.text_offset, entry.text_length)
    }

    /// Name addressed by an entry, lossily decoded
    pub fn name(&self, entry: &GazetteerEntry) -> Option<String> {
        self.name_bytes(entry)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}
