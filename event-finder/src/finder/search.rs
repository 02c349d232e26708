//! Windowed, paged event search.
//!
//! A run geocodes the postcode once, then walks the date windows in order.
//! Within a window, pages are fetched one at a time until the API reports no
//! more pages or the page cap is hit. Every page's events are folded into an
//! [`EventCollection`] that is threaded through each step by value.

use std::ops::ControlFlow;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::{Coordinates, DateWindow, Postcode, SearchRadius, WindowPlan};
use crate::export::{CsvExport, ExportError, export_csv};
use crate::postcodes::Geocode;
use crate::ticketmaster::{EventSearch, SearchQuery, SearchResponse, TicketmasterError};

use super::collector::EventCollection;
use super::config::FinderConfig;
use super::error::FinderError;
use super::progress::Progress;

/// How a completed run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// At least one event was found.
    Found(CsvExport),
    /// Every window came back without a usable event.
    NoEvents,
}

/// Runs event searches against a geocoder and an event search API.
#[derive(Debug, Clone)]
pub struct EventFinder<G, S> {
    geocoder: G,
    search: S,
    config: FinderConfig,
}

impl<G: Geocode, S: EventSearch> EventFinder<G, S> {
    /// Create a finder, rejecting an unusable configuration.
    pub fn new(geocoder: G, search: S, config: FinderConfig) -> Result<Self, FinderError> {
        config.validate()?;
        Ok(Self {
            geocoder,
            search,
            config,
        })
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Plan the date windows for a run starting now.
    pub fn plan_windows(&self) -> Result<WindowPlan, FinderError> {
        Ok(WindowPlan::new(
            Utc::now(),
            self.config.horizon(),
            self.config.window_width(),
        )?)
    }

    /// Search every window around `postcode` and export the results.
    ///
    /// An unknown postcode fails before any event search is issued.
    pub async fn run<P: Progress>(
        &self,
        postcode: &Postcode,
        radius: SearchRadius,
        progress: &mut P,
    ) -> Result<RunOutcome, FinderError> {
        info!(%postcode, radius = radius.miles(), "starting event search");

        let coordinates = self.geocoder.locate(postcode).await?;
        debug!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "postcode located"
        );

        let plan = self.plan_windows()?;
        let collection = self.collect(coordinates, radius, &plan, progress).await?;
        info!(%postcode, events = collection.len(), "event search complete");

        match export_csv(postcode, collection.into_records()) {
            Ok(export) => Ok(RunOutcome::Found(export)),
            Err(ExportError::EmptyResult) => Ok(RunOutcome::NoEvents),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch every window of `plan` into a fresh collection.
    pub async fn collect<P: Progress>(
        &self,
        coordinates: Coordinates,
        radius: SearchRadius,
        plan: &WindowPlan,
        progress: &mut P,
    ) -> Result<EventCollection, FinderError> {
        let total = plan.window_count();
        let mut collection = EventCollection::new();

        for (i, window) in plan.windows().enumerate() {
            if let ControlFlow::Break(()) = progress.window_started(i + 1, total, &window) {
                info!(window = i + 1, total, "event search cancelled");
                return Err(FinderError::Cancelled);
            }

            collection = self
                .fetch_window(collection, coordinates, radius, window, progress)
                .await?;
        }

        Ok(collection)
    }

    /// Fetch all pages of one window, up to the page cap.
    pub async fn fetch_window<P: Progress>(
        &self,
        mut collection: EventCollection,
        coordinates: Coordinates,
        radius: SearchRadius,
        window: DateWindow,
        progress: &mut P,
    ) -> Result<EventCollection, FinderError> {
        let mut page = 0;
        let mut total_pages = 1;

        while page < total_pages && page < self.config.page_cap {
            let query = SearchQuery {
                coordinates,
                radius,
                window,
                page,
                size: self.config.page_size,
            };

            let response = self.fetch_page(&query).await?;
            let reported = response.total_pages();
            let total_elements = response.total_elements();
            total_pages = reported.min(self.config.page_cap);

            let summary = collection.absorb(response.into_events());
            debug!(
                %window,
                page,
                reported_pages = reported,
                ?total_elements,
                added = summary.added,
                replaced = summary.replaced,
                skipped = summary.skipped,
                "page fetched"
            );
            if let ControlFlow::Break(()) = progress.page_fetched(page, total_pages, &summary) {
                info!(%window, page, "event search cancelled");
                return Err(FinderError::Cancelled);
            }

            page += 1;

            let delay = self.config.page_delay();
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        Ok(collection)
    }

    /// Fetch one page, backing off and retrying while rate limited.
    async fn fetch_page(&self, query: &SearchQuery) -> Result<SearchResponse, FinderError> {
        let mut retries = 0;

        loop {
            match self.search.search_page(query).await {
                Ok(response) => return Ok(response),
                Err(TicketmasterError::RateLimited) => {
                    if retries >= self.config.max_rate_limit_retries {
                        warn!(page = query.page, retries, "rate limit retries exhausted");
                        return Err(FinderError::RateLimitExhausted { retries });
                    }

                    let delay = self.config.rate_limit_backoff(retries);
                    warn!(
                        page = query.page,
                        retry = retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    retries += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
