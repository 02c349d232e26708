//! The event record exported to CSV.

use serde::Serialize;

/// One bookable event occurrence.
///
/// Field order is the CSV column order. Date and time are kept exactly as
/// Ticketmaster reports them (venue-local, no timezone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Ticketmaster event ID, unique per event.
    pub id: String,

    pub name: Option<String>,

    /// Classification segment, e.g. "Music" or "Sports".
    pub event_type: Option<String>,

    /// Sale status code, e.g. "onsale" or "offsale".
    pub sale_status: Option<String>,

    /// Local date, `YYYY-MM-DD`.
    pub date: Option<String>,

    /// Local time, `HH:MM:SS`.
    pub time: Option<String>,

    pub venue: Option<String>,

    pub city: Option<String>,

    pub url: Option<String>,
}

impl EventRecord {
    /// Create a record with only an ID set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            event_type: None,
            sale_status: None,
            date: None,
            time: None,
            venue: None,
            city: None,
            url: None,
        }
    }
}
