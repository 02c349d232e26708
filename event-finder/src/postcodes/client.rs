//! postcodes.io lookup client.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::domain::{Coordinates, Postcode};

use super::error::PostcodeError;
use super::types::LookupResponse;

/// Default base URL for postcodes.io.
const DEFAULT_BASE_URL: &str = "https://api.postcodes.io";

/// Resolves a postcode to coordinates.
///
/// This abstraction allows the finder to be tested without network access.
pub trait Geocode {
    /// Look up the coordinates of `postcode`.
    ///
    /// Fails with [`PostcodeError::InvalidLocation`] when the postcode is
    /// unknown.
    fn locate(
        &self,
        postcode: &Postcode,
    ) -> impl Future<Output = Result<Coordinates, PostcodeError>> + Send;
}

/// Configuration for the postcode client.
#[derive(Debug, Clone)]
pub struct PostcodeClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl PostcodeClientConfig {
    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for PostcodeClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Client for postcodes.io.
#[derive(Debug, Clone)]
pub struct PostcodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl PostcodeClient {
    pub fn new(config: PostcodeClientConfig) -> Result<Self, PostcodeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Geocode for PostcodeClient {
    async fn locate(&self, postcode: &Postcode) -> Result<Coordinates, PostcodeError> {
        let url = format!("{}/postcodes/{}", self.base_url, postcode.as_str());
        debug!(%postcode, "looking up postcode");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        // postcodes.io answers unknown postcodes with a 404 and no result
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PostcodeError::InvalidLocation {
                postcode: postcode.clone(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PostcodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_lookup(postcode, &body)
    }
}

/// Extract coordinates from a lookup response body.
fn parse_lookup(postcode: &Postcode, body: &str) -> Result<Coordinates, PostcodeError> {
    let response: LookupResponse = serde_json::from_str(body).map_err(|e| PostcodeError::Json {
        message: e.to_string(),
    })?;

    let invalid = || PostcodeError::InvalidLocation {
        postcode: postcode.clone(),
    };

    let Some(result) = response.result else {
        debug!(%postcode, error = ?response.error, "postcode lookup returned no result");
        return Err(invalid());
    };
    match (result.latitude, result.longitude) {
        (Some(latitude), Some(longitude)) => Ok(Coordinates::new(latitude, longitude)),
        _ => Err(invalid()),
    }
}
