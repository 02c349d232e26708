//! Ticketmaster client error types.

use std::fmt;

/// Errors from the Ticketmaster HTTP client.
#[derive(Debug)]
pub enum TicketmasterError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned a non-success status other than 429
    Api { status: u16, body: String },

    /// Rate limited by the API (HTTP 429)
    RateLimited,
}

impl fmt::Display for TicketmasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketmasterError::Http(e) => write!(f, "HTTP error: {e}"),
            TicketmasterError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            TicketmasterError::Api { status, body } => {
                write!(f, "Ticketmaster error {status}: {body}")
            }
            TicketmasterError::RateLimited => write!(f, "rate limited by Ticketmaster API"),
        }
    }
}

impl std::error::Error for TicketmasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TicketmasterError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TicketmasterError {
    fn from(err: reqwest::Error) -> Self {
        TicketmasterError::Http(err)
    }
}
