//! Geographic search inputs.

use std::fmt;

/// A latitude/longitude pair as returned by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The `lat,lon` form used by the Ticketmaster `latlong` parameter.
    pub fn latlong(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Error returned for a radius outside the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search radius must be between 1 and 100 miles, got {value}")]
pub struct InvalidRadius {
    value: u32,
}

/// Search radius in miles, always within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchRadius(u8);

impl SearchRadius {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;
    pub const DEFAULT: u8 = 25;

    pub fn new(miles: u32) -> Result<Self, InvalidRadius> {
        if miles < u32::from(Self::MIN) || miles > u32::from(Self::MAX) {
            return Err(InvalidRadius { value: miles });
        }
        Ok(SearchRadius(miles as u8))
    }

    pub fn miles(self) -> u8 {
        self.0
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        SearchRadius(Self::DEFAULT)
    }
}

impl fmt::Display for SearchRadius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
