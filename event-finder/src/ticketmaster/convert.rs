//! Conversion from Ticketmaster DTOs to event records.

use crate::domain::EventRecord;

use super::types::EventItem;

/// Why a search result couldn't become an [`EventRecord`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// No ID, so nothing to deduplicate on
    #[error("event has no id")]
    MissingId,

    /// No linked venue; the listing is unusable without one
    #[error("event {0} has no venue")]
    MissingVenue(String),
}

/// Convert a search result into an event record.
///
/// Takes the first linked venue and the first classification's segment.
pub fn convert_event(item: EventItem) -> Result<EventRecord, ConversionError> {
    let id = item.id.ok_or(ConversionError::MissingId)?;

    let venue = match item.embedded.and_then(|e| e.venues.into_iter().next()) {
        Some(venue) => venue,
        None => return Err(ConversionError::MissingVenue(id)),
    };

    let (date, time, sale_status) = match item.dates {
        Some(dates) => {
            let (date, time) = dates
                .start
                .map(|s| (s.local_date, s.local_time))
                .unwrap_or_default();
            (date, time, dates.status.and_then(|s| s.code))
        }
        None => (None, None, None),
    };

    let event_type = item
        .classifications
        .into_iter()
        .next()
        .and_then(|c| c.segment)
        .and_then(|s| s.name);

    Ok(EventRecord {
        id,
        name: item.name,
        event_type,
        sale_status,
        date,
        time,
        venue: venue.name,
        city: venue.city.and_then(|c| c.name),
        url: item.url,
    })
}
