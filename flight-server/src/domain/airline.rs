//! Airline designator type.

use std::fmt;

/// Error returned when parsing an invalid airline code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid airline code: {reason}")]
pub struct InvalidAirlineCode {
    reason: &'static str,
}

/// A valid airline designator: 2 or 3 uppercase ASCII letters or digits.
///
/// Two-character IATA designators may contain a digit (e.g. "B6" for JetBlue,
/// "9W" for Jet Airways); three-letter ICAO designators ("BAW") are accepted
/// as well.
///
/// # Examples
///
/// ```
/// use flight_server::domain::AirlineCode;
///
/// let ba = AirlineCode::parse("BA").unwrap();
/// assert_eq!(ba.as_str(), "BA");
///
/// assert!(AirlineCode::parse("B6").is_ok());
/// assert!(AirlineCode::parse("ba").is_err());
/// assert!(AirlineCode::parse("B").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AirlineCode {
    bytes: [u8; 3],
    len: u8,
}

impl AirlineCode {
    /// Parse an airline code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidAirlineCode> {
        let bytes = s.as_bytes();

        if !(2..=3).contains(&bytes.len()) {
            return Err(InvalidAirlineCode {
                reason: "must be 2 or 3 characters",
            });
        }

        let mut code = [0u8; 3];
        for (slot, &b) in code.iter_mut().zip(bytes) {
            if !(b.is_ascii_uppercase() || b.is_ascii_digit()) {
                return Err(InvalidAirlineCode {
                    reason: "must be uppercase ASCII letters or digits",
                });
            }
            *slot = b;
        }

        Ok(AirlineCode {
            bytes: code,
            len: bytes.len() as u8,
        })
    }

    /// Parse after trimming whitespace and converting to uppercase.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidAirlineCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the airline code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store ASCII uppercase letters and digits
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap()
    }
}

impl fmt::Debug for AirlineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AirlineCode({})", self.as_str())
    }
}

impl fmt::Display for AirlineCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
