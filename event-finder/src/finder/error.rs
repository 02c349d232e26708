//! Finder error types.

use crate::config::ConfigError;
use crate::domain::InvalidWindowPlan;
use crate::export::ExportError;
use crate::postcodes::PostcodeError;
use crate::ticketmaster::TicketmasterError;

/// Errors that end a search run. No partial results survive any of them.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// Geocoding failed, including unknown postcodes
    #[error(transparent)]
    Geocode(#[from] PostcodeError),

    /// Event search failed with something other than a 429
    #[error(transparent)]
    Search(#[from] TicketmasterError),

    /// Still rate limited after every retry
    #[error("rate limited by Ticketmaster: gave up after {retries} retries")]
    RateLimitExhausted { retries: u32 },

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Window(#[from] InvalidWindowPlan),

    /// The progress observer stopped the run
    #[error("search cancelled")]
    Cancelled,
}

impl FinderError {
    /// Whether the postcode resolved to no location.
    pub fn is_invalid_location(&self) -> bool {
        matches!(
            self,
            FinderError::Geocode(PostcodeError::InvalidLocation { .. })
        )
    }
}
