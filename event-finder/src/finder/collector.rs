//! Deduplicating event accumulator.

use std::collections::HashMap;

use tracing::trace;

use crate::domain::EventRecord;
use crate::ticketmaster::{ConversionError, EventItem, convert_event};

/// What happened to one page of results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSummary {
    /// Events seen for the first time.
    pub added: usize,
    /// Events that overwrote an earlier sighting.
    pub replaced: usize,
    /// Entries dropped for lacking an ID or venue.
    pub skipped: usize,
}

/// Event records keyed by event ID.
///
/// At most one record per ID survives; a later sighting overwrites the
/// earlier one in place. Iteration follows first-sighting order.
#[derive(Debug, Clone, Default)]
pub struct EventCollection {
    records: Vec<EventRecord>,
    index: HashMap<String, usize>,
}

impl EventCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any record with the same ID.
    ///
    /// Returns `true` if a record was replaced.
    pub fn insert(&mut self, record: EventRecord) -> bool {
        match self.index.get(&record.id) {
            Some(&slot) => {
                self.records[slot] = record;
                true
            }
            None => {
                self.index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
                false
            }
        }
    }

    /// Convert and insert one page of search results.
    ///
    /// Entries without an ID or venue are skipped, never failing the page.
    pub fn absorb(&mut self, items: Vec<EventItem>) -> PageSummary {
        let mut summary = PageSummary::default();

        for item in items {
            match convert_event(item) {
                Ok(record) => {
                    if self.insert(record) {
                        summary.replaced += 1;
                    } else {
                        summary.added += 1;
                    }
                }
                Err(ConversionError::MissingVenue(id)) => {
                    trace!(%id, "skipping event without venue");
                    summary.skipped += 1;
                }
                Err(ConversionError::MissingId) => {
                    trace!("skipping event without id");
                    summary.skipped += 1;
                }
            }
        }

        summary
    }

    pub fn get(&self, id: &str) -> Option<&EventRecord> {
        self.index.get(id).map(|&slot| &self.records[slot])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }

    /// Consume the collection, yielding its records.
    pub fn into_records(self) -> Vec<EventRecord> {
        self.records
    }
}
