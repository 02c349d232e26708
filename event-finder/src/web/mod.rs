//! Web layer for the event finder.
//!
//! A search form, a live progress page fed by server-sent events, and CSV
//! downloads of completed searches.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, NO_EVENTS_MESSAGE, StreamMessage, create_router};
pub use state::{AppState, LiveFinder};
pub use templates::*;
