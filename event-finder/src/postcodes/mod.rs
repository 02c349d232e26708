//! postcodes.io geocoding.
//!
//! Resolves a normalized UK postcode to latitude/longitude. This runs once
//! per search; an unknown postcode ends the search before any event queries.

mod client;
mod error;
mod types;

pub use client::{Geocode, PostcodeClient, PostcodeClientConfig};
pub use error::PostcodeError;
pub use types::{LookupResponse, LookupResult};
