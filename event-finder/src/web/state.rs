//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::ExportCache;
use crate::finder::EventFinder;
use crate::postcodes::PostcodeClient;
use crate::ticketmaster::TicketmasterClient;

/// The finder used by the server, over the real HTTP clients.
pub type LiveFinder = EventFinder<PostcodeClient, TicketmasterClient>;

/// Shared application state.
///
/// Runs never share anything beyond the clients and the export cache.
#[derive(Clone)]
pub struct AppState {
    /// Event finder
    pub finder: Arc<LiveFinder>,

    /// Completed exports awaiting download
    pub exports: Arc<ExportCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(finder: LiveFinder, exports: ExportCache) -> Self {
        Self {
            finder: Arc::new(finder),
            exports: Arc::new(exports),
        }
    }
}
