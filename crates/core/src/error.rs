//! Error types for the geodex lookup engine
//!
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! A search that finds nothing is not an error: the search path returns
//! `Option` or an empty collection. Errors here are reserved for bad
//! input (`MalformedKey`, `InvalidPattern`), missing or damaged store
//! files, and the nearest-neighbour widening cap.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for geodex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the geodex lookup engine
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input key failed postcode validation
    #[error("Malformed postcode key: {key:?}")]
    MalformedKey {
        /// The offending key as supplied
        key: String,
    },

    /// A required input file for a build step does not exist
    #[error("Missing source file: {path}")]
    MissingSourceFile {
        /// Path of the missing file
        path: PathBuf,
    },

    /// Store file size is not a whole number of records
    #[error(
        "Index corrupt: {path} is {file_size} bytes, not a multiple of the {record_size}-byte record size"
    )]
    IndexCorrupt {
        /// Path of the damaged file
        path: PathBuf,
        /// Observed file size in bytes
        file_size: u64,
        /// Expected fixed record size in bytes
        record_size: usize,
    },

    /// Gazetteer search pattern failed to compile
    #[error("Invalid search pattern {pattern:?}: {message}")]
    InvalidPattern {
        /// The pattern as supplied
        pattern: String,
        /// Compiler diagnostic
        message: String,
    },

    /// Nearest-neighbour widening retries exhausted without a result
    #[error("Search space exhausted after {retries} widenings (final margin {margin})")]
    SearchExhausted {
        /// Number of margin doublings attempted
        retries: u32,
        /// Margin in effect when the cap was hit
        margin: f64,
    },
}
