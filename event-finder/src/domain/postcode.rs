//! Postcode types.

use std::fmt;

/// Error returned when parsing an invalid postcode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPostcode {
    /// Nothing but whitespace was entered.
    #[error("please enter a postcode")]
    Missing,

    /// The input can't be a UK postcode.
    #[error("invalid postcode: {0}")]
    Malformed(&'static str),
}

/// A normalized UK postcode.
///
/// Normalization strips all whitespace and uppercases the input, which is
/// the form postcodes.io accepts as a path segment and the form used for
/// export filenames. Only the shape is checked here; whether the postcode
/// actually exists is decided by the geocoder.
///
/// # Examples
///
/// ```
/// use event_finder::domain::Postcode;
///
/// let postcode = Postcode::parse(" sw1a 1aa ").unwrap();
/// assert_eq!(postcode.as_str(), "SW1A1AA");
/// assert_eq!(postcode.csv_filename(), "SW1A1AA.csv");
///
/// assert!(Postcode::parse("   ").is_err());
/// assert!(Postcode::parse("SW1A-1AA").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Postcode(String);

impl Postcode {
    /// Shortest normalized postcode, e.g. `M11AE`.
    pub const MIN_LEN: usize = 5;

    /// Longest normalized postcode, e.g. `SW1A1AA`.
    pub const MAX_LEN: usize = 7;

    /// Parse and normalize a postcode from free text.
    pub fn parse(s: &str) -> Result<Self, InvalidPostcode> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if normalized.is_empty() {
            return Err(InvalidPostcode::Missing);
        }

        if !normalized.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidPostcode::Malformed(
                "must contain only letters and digits",
            ));
        }

        if !(Self::MIN_LEN..=Self::MAX_LEN).contains(&normalized.len()) {
            return Err(InvalidPostcode::Malformed("must be 5 to 7 characters"));
        }

        Ok(Postcode(normalized))
    }

    /// Returns the normalized postcode.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filename for this postcode's CSV export.
    pub fn csv_filename(&self) -> String {
        format!("{}.csv", self.0)
    }
}

impl fmt::Debug for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Postcode({})", self.0)
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
