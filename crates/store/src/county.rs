//! County name table
//!
//! Counties are interned at build time in first-seen order; gazetteer
//! entries carry the resulting index. The table is one file of
//! NUL-separated names, loaded wholly into memory and owned by the
//! database handle (never a process-wide global).

use geodex_core::{Error, Result};
use std::path::Path;

/// In-memory county name table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountyTable {
    names: Vec<String>,
}

impl CountyTable {
    /// Load the table from its NUL-separated file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingSourceFile {
                path: path.to_path_buf(),
            });
        }
        let raw = std::fs::read(path)?;
        Ok(Self::from_bytes(&raw))
    }

    /// Parse a table from NUL-separated bytes
    pub fn from_bytes(raw: &[u8]) -> Self {
        if raw.is_empty() {
            return CountyTable::default();
        }
        let names = raw
            .split(|&b| b == 0)
            .map(|part| String::from_utf8_lossy(part).into_owned())
            .collect();
        CountyTable { names }
    }

    /// Build a table from an ordered name list
    pub fn from_names(names: Vec<String>) -> Self {
        CountyTable { names }
    }

    /// Serialize as NUL-separated bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.names.join("\0").into_bytes()
    }

    /// County name for an index from a gazetteer entry
    pub fn name(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    /// Number of counties
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no counties are loaded
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
