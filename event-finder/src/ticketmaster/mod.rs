//! Ticketmaster Discovery API client.
//!
//! Provides a single-page event search over HTTP, the DTOs it returns, and
//! conversion of search results into [`EventRecord`](crate::domain::EventRecord)s.
//!
//! Key characteristics of the Discovery API:
//! - Deep paging is capped, so large result sets must be split by date
//! - `page.totalPages` is reported on every page
//! - HTTP 429 signals the per-second quota; retrying later succeeds

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{EventSearch, SearchQuery, TicketmasterClient, TicketmasterConfig};
pub use convert::{ConversionError, convert_event};
pub use error::TicketmasterError;
pub use mock::{MockReply, MockTicketmasterClient};
pub use types::{
    Classification, EmbeddedEvents, EventDates, EventEmbedded, EventItem, Named, PageInfo,
    SaleStatus, SearchResponse, StartDate, Venue,
};
