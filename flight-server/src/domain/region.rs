//! Country and continent codes.

use std::fmt;

/// Error returned when parsing an invalid region code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid region code: {reason}")]
pub struct InvalidRegionCode {
    reason: &'static str,
}

/// A two-letter region code.
///
/// Used for both the country columns (ISO 3166 alpha-2, e.g. "US", "GB") and
/// the continent columns ("AF", "AN", "AS", "EU", "OC", "SA"). The dataset
/// never contains "NA"; it writes [`RegionCode::UNASSIGNED`] ("UA") instead.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionCode([u8; 2]);

impl RegionCode {
    /// Europe, as stored in the continent columns.
    pub const EUROPE: RegionCode = RegionCode(*b"EU");

    /// The in-dataset symbol that query values of "NA" refer to.
    pub const UNASSIGNED: RegionCode = RegionCode(*b"UA");

    /// Parse a region code: exactly 2 uppercase ASCII letters.
    pub fn parse(s: &str) -> Result<Self, InvalidRegionCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidRegionCode {
                reason: "must be exactly 2 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidRegionCode {
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(RegionCode([bytes[0], bytes[1]]))
    }

    /// Returns the region code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store valid ASCII uppercase letters
        std::str::from_utf8(&self.0).unwrap()
    }
}

impl fmt::Debug for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegionCode({})", self.as_str())
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
