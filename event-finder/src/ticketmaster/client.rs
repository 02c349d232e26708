//! Ticketmaster Discovery HTTP client.
//!
//! Issues one event search request per call. Paging, windowing and
//! rate-limit backoff are the caller's job; this client only reports a 429
//! as [`TicketmasterError::RateLimited`].

use std::future::Future;
use std::time::Duration;

use tracing::trace;

use crate::config::{ApiKey, DEFAULT_TIMEOUT_SECS};
use crate::domain::{Coordinates, DateWindow, SearchRadius};

use super::error::TicketmasterError;
use super::types::SearchResponse;

/// Default base URL for the Discovery API.
const DEFAULT_BASE_URL: &str = "https://app.ticketmaster.com/discovery/v2";

/// Maximum characters of an unparseable body kept for diagnostics.
const BODY_EXCERPT_CHARS: usize = 500;

/// One page of an event search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchQuery {
    pub coordinates: Coordinates,
    pub radius: SearchRadius,
    pub window: DateWindow,
    /// Zero-based page index.
    pub page: u32,
    /// Results per page.
    pub size: u32,
}

impl SearchQuery {
    /// Query parameters, excluding the API key.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("latlong", self.coordinates.latlong()),
            ("radius", self.radius.to_string()),
            ("unit", "miles".to_string()),
            ("countryCode", "GB".to_string()),
            ("size", self.size.to_string()),
            ("page", self.page.to_string()),
            ("startDateTime", self.window.start_param()),
            ("endDateTime", self.window.end_param()),
        ]
    }
}

/// Runs a single page of an event search.
///
/// This abstraction allows the finder to be tested with scripted responses.
pub trait EventSearch {
    fn search_page(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<SearchResponse, TicketmasterError>> + Send;
}

/// Configuration for the Ticketmaster client.
#[derive(Debug, Clone)]
pub struct TicketmasterConfig {
    /// Discovery API key
    pub api_key: ApiKey,
    /// Base URL for the API (defaults to production)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TicketmasterConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: ApiKey) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

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

/// Ticketmaster Discovery API client.
#[derive(Debug, Clone)]
pub struct TicketmasterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: ApiKey,
}

impl TicketmasterClient {
    /// Create a new client with the given configuration.
    pub fn new(config: TicketmasterConfig) -> Result<Self, TicketmasterError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }
}

impl EventSearch for TicketmasterClient {
    async fn search_page(&self, query: &SearchQuery) -> Result<SearchResponse, TicketmasterError> {
        let url = format!("{}/events.json", self.base_url);
        trace!(page = query.page, window = %query.window, "searching events");

        let response = self
            .http
            .get(&url)
            .query(&[("apikey", self.api_key.expose())])
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TicketmasterError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TicketmasterError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TicketmasterError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_EXCERPT_CHARS).collect()),
        })
    }
}
