//! Domain types for the event finder.
//!
//! Inputs (postcode, radius) are validated at construction, so code that
//! receives these types can trust them.

mod event;
mod location;
mod postcode;
mod window;

pub use event::EventRecord;
pub use location::{Coordinates, InvalidRadius, SearchRadius};
pub use postcode::{InvalidPostcode, Postcode};
pub use window::{DateWindow, InvalidWindowPlan, TIMESTAMP_FORMAT, WindowPlan, Windows};
