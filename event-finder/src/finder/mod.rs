//! Event search orchestration.
//!
//! Ties the geocoder and the Ticketmaster search together:
//! postcode → coordinates → date windows → pages → deduplicated events → CSV.
//!
//! Everything within a run is sequential, with fixed pauses between pages
//! acting as a client-side throttle.

mod collector;
mod config;
mod error;
mod progress;
mod search;

pub use collector::{EventCollection, PageSummary};
pub use config::FinderConfig;
pub use error::FinderError;
pub use progress::{LogProgress, Progress, percent_complete};
pub use search::{EventFinder, RunOutcome};
