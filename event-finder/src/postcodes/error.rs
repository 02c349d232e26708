//! Geocoder error types.

use crate::domain::Postcode;

/// Errors that can occur when resolving a postcode.
#[derive(Debug, thiserror::Error)]
pub enum PostcodeError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The lookup found no location for the postcode
    #[error("invalid postcode: no location found for {postcode}")]
    InvalidLocation { postcode: Postcode },

    /// API returned an error status
    #[error("postcode lookup error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },
}
