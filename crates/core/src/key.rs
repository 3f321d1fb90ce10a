//! Postcode key type
//!
//! The record store is keyed by UK postcodes normalized to a fixed
//! 7-character form: the outward code padded with spaces to 4 characters,
//! followed by the 3-character inward code. "AB1 2CD" and "ab12cd" both
//! normalize to `"AB1 2CD"`.
//!
//! Normalization is the only place key validation happens; a key that
//! does not match the postcode pattern is rejected with
//! [`Error::MalformedKey`] and never reaches a store.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Length of a normalized postcode key
pub const POSTCODE_LEN: usize = 7;

/// Outward (area + district) and inward (sector + unit) parts of a UK
/// postcode, uppercased, with any spacing between them ignored.
static POSTCODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][A-Z]?(?:\d\d?|\d[A-Z])) ? ?(\d\d?[A-Z][A-Z])").expect("postcode pattern")
});

/// Normalized 7-character postcode key
///
/// Total order over `Postcode` is plain byte order of the normalized
/// form, which is the sort order of the record store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Postcode(String);

impl Postcode {
    /// Parse and normalize a postcode from user or ingestion input
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] if the input does not match the
    /// postcode pattern.
    pub fn parse(input: &str) -> Result<Self> {
        let upper = input.trim().to_ascii_uppercase();
        let caps = POSTCODE_PATTERN
            .captures(&upper)
            .ok_or_else(|| Error::MalformedKey {
                key: input.to_string(),
            })?;

        let outward = &caps[1];
        let inward = &caps[2];
        if inward.len() != 3 {
            return Err(Error::MalformedKey {
                key: input.to_string(),
            });
        }

        let mut key = String::with_capacity(POSTCODE_LEN);
        key.push_str(outward);
        for _ in outward.len()..4 {
            key.push(' ');
        }
        key.push_str(inward);
        debug_assert_eq!(key.len(), POSTCODE_LEN);
        Ok(Postcode(key))
    }

    /// Reconstruct a key from its stored form, trusting the builder
    ///
    /// Used when decoding records read back from a built store; the
    /// builder only ever writes keys produced by [`Postcode::parse`].
    pub fn from_stored(key: impl Into<String>) -> Self {
        Postcode(key.into())
    }

    /// The normalized key as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key bytes as stored on disk (before padding to the field width)
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl AsRef<str> for Postcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
