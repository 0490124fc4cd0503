//! Airport code type.

use std::fmt;

/// Error returned when parsing an invalid airport code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid airport code: {reason}")]
pub struct InvalidAirportCode {
    reason: &'static str,
}

/// A valid airport code: 3 or 4 uppercase ASCII letters or digits.
///
/// The schedule dataset uses ICAO codes (`KJFK`, `EGLL`), but three-character
/// IATA-style codes are accepted too. Any `AirportCode` value is valid by
/// construction.
///
/// # Examples
///
/// ```
/// use flight_server::domain::AirportCode;
///
/// let jfk = AirportCode::parse("KJFK").unwrap();
/// assert_eq!(jfk.as_str(), "KJFK");
///
/// // Lowercase is rejected
/// assert!(AirportCode::parse("kjfk").is_err());
///
/// // Wrong length is rejected
/// assert!(AirportCode::parse("KJ").is_err());
/// assert!(AirportCode::parse("KJFKX").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AirportCode {
    bytes: [u8; 4],
    len: u8,
}

impl AirportCode {
    /// Parse an airport code from a string.
    ///
    /// The input must be 3 or 4 characters, each an uppercase ASCII letter
    /// or a digit.
    pub fn parse(s: &str) -> Result<Self, InvalidAirportCode> {
        let bytes = s.as_bytes();

        if !(3..=4).contains(&bytes.len()) {
            return Err(InvalidAirportCode {
                reason: "must be 3 or 4 characters",
            });
        }

        let mut code = [0u8; 4];
        for (slot, &b) in code.iter_mut().zip(bytes) {
            if !(b.is_ascii_uppercase() || b.is_ascii_digit()) {
                return Err(InvalidAirportCode {
                    reason: "must be uppercase ASCII letters or digits",
                });
            }
            *slot = b;
        }

        Ok(AirportCode {
            bytes: code,
            len: bytes.len() as u8,
        })
    }

    /// Parse after trimming whitespace and converting to uppercase.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidAirportCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the airport code as a string slice.
    pub fn as_str(&self) -> &str {
        // SAFETY: We only store ASCII uppercase letters and digits
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap()
    }
}

impl fmt::Debug for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AirportCode({})", self.as_str())
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(AirportCode::parse("KJFK").is_ok());
        assert!(AirportCode::parse("EGLL").is_ok());
        assert!(AirportCode::parse("VHHH").is_ok());
        assert!(AirportCode::parse("JFK").is_ok());
        assert!(AirportCode::parse("K1G4").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(AirportCode::parse("kjfk").is_err());
        assert!(AirportCode::parse("Kjfk").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(AirportCode::parse("").is_err());
        assert!(AirportCode::parse("K").is_err());
        assert!(AirportCode::parse("KJ").is_err());
        assert!(AirportCode::parse("KJFKX").is_err());
    }

    #[test]
    fn reject_punctuation() {
        assert!(AirportCode::parse("K-FK").is_err());
        assert!(AirportCode::parse("K FK").is_err());
        assert!(AirportCode::parse("KÖF").is_err());
    }

    #[test]
    fn normalized_parse() {
        let code = AirportCode::parse_normalized(" egll ").unwrap();
        assert_eq!(code.as_str(), "EGLL");
    }

    #[test]
    fn three_letter_code_roundtrip() {
        let code = AirportCode::parse("LHR").unwrap();
        assert_eq!(code.as_str(), "LHR");
        assert_eq!(format!("{}", code), "LHR");
        assert_eq!(format!("{:?}", code), "AirportCode(LHR)");
    }

    #[test]
    fn equality_distinguishes_length() {
        let a = AirportCode::parse("ABC").unwrap();
        let b = AirportCode::parse("ABCD").unwrap();
        assert_ne!(a, b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[A-Z0-9]{3,4}") {
            let code = AirportCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Lowercase letters are always rejected
        #[test]
        fn lowercase_rejected(s in "[a-z]{3,4}") {
            prop_assert!(AirportCode::parse(&s).is_err());
        }

        /// Wrong-length strings are always rejected
        #[test]
        fn wrong_length_rejected(s in "[A-Z]{0,2}|[A-Z]{5,10}") {
            prop_assert!(AirportCode::parse(&s).is_err());
        }
    }
}
