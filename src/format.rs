//! Buffer format identifiers.
//!
//! Every transform consumes buffers of one format and produces buffers of
//! another. Libraries report those formats as plain string ids such as
//! `"ArrayFormatF"` or `"SingleFormatF"`. The id [`FormatId::IDENTITY`] is a
//! wildcard: it is compatible with every other format.
//!
//! ```rust
//! use sound_feature_extraction::format::FormatId;
//!
//! let array = FormatId::new("ArrayFormatF");
//! assert!(array.is_compatible(&FormatId::new("ArrayFormatF")));
//! assert!(array.is_compatible(&FormatId::identity()));
//! assert!(!array.is_compatible(&FormatId::new("SingleFormatF")));
//! ```

use std::fmt;

/// Identifier of a buffer format.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatId(String);

impl FormatId {
    /// Id of the format that matches any other format.
    pub const IDENTITY: &'static str = "identity";

    /// Wrap a format id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The wildcard format.
    pub fn identity() -> Self {
        Self(Self::IDENTITY.to_string())
    }

    /// Get the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this is the wildcard format.
    pub fn is_identity(&self) -> bool {
        self.0 == Self::IDENTITY
    }

    /// Check whether buffers of this format can be fed where `other` is expected.
    ///
    /// Formats are compatible if either side is the identity format or the
    /// ids are equal.
    pub fn is_compatible(&self, other: &FormatId) -> bool {
        self.is_identity() || other.is_identity() || self.0 == other.0
    }
}

impl fmt::Display for FormatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for FormatId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
