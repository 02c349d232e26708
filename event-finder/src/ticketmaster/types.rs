//! Ticketmaster Discovery API response DTOs.
//!
//! These types map directly to the `events.json` search response. They use
//! `Option` liberally because Ticketmaster omits fields rather than sending
//! nulls, and an event may lack almost anything except its ID.

use serde::Deserialize;

/// Response from `GET /discovery/v2/events.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Matching events. Absent entirely when there are no results.
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedEvents>,

    /// Paging metadata.
    pub page: Option<PageInfo>,
}

impl SearchResponse {
    /// Total number of pages the API reports, defaulting to 1.
    pub fn total_pages(&self) -> u32 {
        self.page
            .as_ref()
            .and_then(|p| p.total_pages)
            .unwrap_or(1)
    }

    /// Total matching events the API reports, if it says.
    pub fn total_elements(&self) -> Option<u64> {
        self.page.as_ref().and_then(|p| p.total_elements)
    }

    /// Consume the response, yielding its events.
    pub fn into_events(self) -> Vec<EventItem> {
        self.embedded.map(|e| e.events).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmbeddedEvents {
    #[serde(default)]
    pub events: Vec<EventItem>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Matching events across all pages, including any past the paging limit.
    pub total_elements: Option<u64>,
    pub total_pages: Option<u32>,
}

/// A single event in the search results.
#[derive(Debug, Clone, Deserialize)]
pub struct EventItem {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub dates: Option<EventDates>,

    /// Classifications, most specific first.
    #[serde(default)]
    pub classifications: Vec<Classification>,

    /// Linked venues and attractions.
    #[serde(rename = "_embedded")]
    pub embedded: Option<EventEmbedded>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDates {
    pub start: Option<StartDate>,
    pub status: Option<SaleStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartDate {
    /// Venue-local date, `YYYY-MM-DD`.
    pub local_date: Option<String>,
    /// Venue-local time, `HH:MM:SS`. Absent for date-only events.
    pub local_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SaleStatus {
    /// e.g. "onsale", "offsale", "cancelled", "rescheduled".
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Classification {
    pub segment: Option<Named>,
}

/// Any `{ "name": ... }` object (segments, cities).
#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventEmbedded {
    #[serde(default)]
    pub venues: Vec<Venue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Venue {
    pub name: Option<String>,
    pub city: Option<Named>,
}
