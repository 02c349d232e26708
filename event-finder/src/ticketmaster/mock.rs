//! Scripted Ticketmaster client for testing without API access.
//!
//! Replies are served in the order they were queued. Once the script runs
//! out, every request gets an empty single-page response, so a test only
//! needs to script the pages it cares about.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use super::client::{EventSearch, SearchQuery};
use super::error::TicketmasterError;
use super::types::SearchResponse;

/// A queued reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Page(SearchResponse),
    RateLimited,
    Status { status: u16, body: String },
}

#[derive(Debug, Default)]
struct MockState {
    replies: VecDeque<MockReply>,
    requests: Vec<SearchQuery>,
}

/// Mock client that replays queued responses and records every request.
#[derive(Debug, Clone, Default)]
pub struct MockTicketmasterClient {
    state: Arc<Mutex<MockState>>,
}

impl MockTicketmasterClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a successful page.
    pub fn push_page(&self, page: SearchResponse) -> &Self {
        self.state().replies.push_back(MockReply::Page(page));
        self
    }

    /// Queue a page built from raw JSON.
    ///
    /// # Panics
    ///
    /// Panics if `value` isn't a valid search response.
    pub fn push_json(&self, value: serde_json::Value) -> &Self {
        let page = serde_json::from_value(value).expect("invalid mock search response");
        self.push_page(page)
    }

    /// Queue an HTTP 429.
    pub fn push_rate_limited(&self) -> &Self {
        self.state().replies.push_back(MockReply::RateLimited);
        self
    }

    /// Queue a non-success status.
    pub fn push_status(&self, status: u16, body: impl Into<String>) -> &Self {
        self.state().replies.push_back(MockReply::Status {
            status,
            body: body.into(),
        });
        self
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<SearchQuery> {
        self.state().requests.clone()
    }

    /// Number of queued replies not yet served.
    pub fn remaining(&self) -> usize {
        self.state().replies.len()
    }
}

impl EventSearch for MockTicketmasterClient {
    async fn search_page(&self, query: &SearchQuery) -> Result<SearchResponse, TicketmasterError> {
        let reply = {
            let mut state = self.state();
            state.requests.push(*query);
            state.replies.pop_front()
        };

        match reply {
            Some(MockReply::Page(page)) => Ok(page),
            Some(MockReply::RateLimited) => Err(TicketmasterError::RateLimited),
            Some(MockReply::Status { status, body }) => Err(TicketmasterError::Api { status, body }),
            None => Ok(SearchResponse::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, DateWindow, SearchRadius};
    use chrono::{TimeDelta, Utc};
    use serde_json::json;

    fn query(page: u32) -> SearchQuery {
        let start = Utc::now();
        SearchQuery {
            coordinates: Coordinates::new(51.5, -0.1),
            radius: SearchRadius::default(),
            window: DateWindow {
                start,
                end: start + TimeDelta::days(30),
            },
            page,
            size: 200,
        }
    }

    #[tokio::test]
    async fn replays_in_order_then_empty() {
        let client = MockTicketmasterClient::new();
        client
            .push_rate_limited()
            .push_json(json!({"page": {"totalPages": 3}}))
            .push_status(500, "boom");

        assert!(matches!(
            client.search_page(&query(0)).await,
            Err(TicketmasterError::RateLimited)
        ));
        assert_eq!(client.search_page(&query(0)).await.unwrap().total_pages(), 3);
        assert!(matches!(
            client.search_page(&query(1)).await,
            Err(TicketmasterError::Api { status: 500, .. })
        ));

        let fallback = client.search_page(&query(2)).await.unwrap();
        assert_eq!(fallback.total_pages(), 1);
        assert!(fallback.into_events().is_empty());
    }

    #[tokio::test]
    async fn records_requests() {
        let client = MockTicketmasterClient::new();
        client.search_page(&query(0)).await.unwrap();
        client.search_page(&query(1)).await.unwrap();

        let pages: Vec<u32> = client.requests().iter().map(|q| q.page).collect();
        assert_eq!(pages, vec![0, 1]);
        assert_eq!(client.remaining(), 0);
    }
}
