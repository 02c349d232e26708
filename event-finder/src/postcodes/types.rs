//! postcodes.io response DTOs.

use serde::Deserialize;

/// Response from `GET /postcodes/{postcode}`.
///
/// Unknown postcodes come back with `result` absent and an `error` message.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    pub result: Option<LookupResult>,
    pub error: Option<String>,
}

/// The resolved postcode. Terminated postcodes may lack coordinates.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResult {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
