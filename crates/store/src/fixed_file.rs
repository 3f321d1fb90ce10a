//! Mmap-backed access to sorted fixed-width store files
//!
//! Store files are immutable once built, so they are memory-mapped and
//! addressed as flat record arrays. `FixedFile` validates on open that
//! the file size is a whole number of records and surfaces
//! [`Error::IndexCorrupt`] otherwise, rather than silently truncating
//! results.

use crate::format::FixedRecord;
use geodex_core::{Error, Result};
use std::fmt;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Underlying bytes of an open store
///
/// Owned data is used by tests and the builder's verification pass;
/// mapped data is the normal read path.
enum StoreData {
    /// In-memory owned data
    Owned(Vec<u8>),
    /// Memory-mapped file data
    Mmap(memmap2::Mmap),
}

impl StoreData {
    fn as_bytes(&self) -> &[u8] {
        match self {
            StoreData::Owned(v) => v,
            StoreData::Mmap(m) => m,
        }
    }
}

/// A sorted file of `R::SIZE`-byte records addressable by index
pub struct FixedFile<R> {
    data: StoreData,
    count: u32,
    path: PathBuf,
    _marker: PhantomData<R>,
}

impl<R: FixedRecord> FixedFile<R> {
    /// Open and map a store file
    ///
    /// # Errors
    ///
    /// [`Error::MissingSourceFile`] if the file does not exist,
    /// [`Error::IndexCorrupt`] if its size is not a multiple of
    /// `R::SIZE`.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingSourceFile {
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path)?;
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Self::validate(StoreData::Mmap(mmap), path.to_path_buf())
    }

    /// Create a store view over owned bytes
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::validate(StoreData::Owned(data), PathBuf::from("<memory>"))
    }

    fn validate(data: StoreData, path: PathBuf) -> Result<Self> {
        let len = data.as_bytes().len();
        if len % R::SIZE != 0 {
            return Err(Error::IndexCorrupt {
                path,
                file_size: len as u64,
                record_size: R::SIZE,
            });
        }
        Ok(FixedFile {
            data,
            count: (len / R::SIZE) as u32,
            path,
            _marker: PhantomData,
        })
    }

    /// Number of records in the file
    #[inline]
    pub fn len(&self) -> u32 {
        self.count
    }

    /// True when the file holds no records
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Path the store was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Decode the record at `idx`, or `None` past the end
    pub fn get(&self, idx: u32) -> Option<R> {
        if idx >= self.count {
            return None;
        }
        let start = idx as usize * R::SIZE;
        Some(R::decode(&self.data.as_bytes()[start..start + R::SIZE]))
    }

    /// Iterate over every record in file order
    pub fn iter(&self) -> impl Iterator<Item = R> + '_ {
        (0..self.count).filter_map(move |idx| self.get(idx))
    }
}

impl<R> fmt::Debug for FixedFile<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedFile")
            .field("path", &self.path)
            .field("count", &self.count)
            .finish()
    }
}

/// An opaque mmap-backed byte blob (the gazetteer name text)
pub struct Blob {
    data: StoreData,
}

impl Blob {
    /// Open and map a blob file
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::MissingSourceFile {
                path: path.to_path_buf(),
            });
        }
        let file = std::fs::File::open(path)?;
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        Ok(Blob {
            data: StoreData::Mmap(mmap),
        })
    }

    /// Create a blob over owned bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Blob {
            data: StoreData::Owned(data),
        }
    }

    /// The whole blob
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }

    /// A bounds-checked slice of the blob
    pub fn slice(&self, offset: u32, length: u16) -> Option<&[u8]> {
        let start = offset as usize;
        let end = start + length as usize;
        self.data.as_bytes().get(start..end)
    }
}
