//! Date windows for bounded searches.
//!
//! Ticketmaster caps how deep a single query can page, so the search horizon
//! is split into fixed-width windows that are queried one at a time. Windows
//! are half-open: each window's end is the next window's start.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};

/// Timestamp format for `startDateTime` / `endDateTime` query parameters.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Error returned when a window plan can't be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid window plan: {reason}")]
pub struct InvalidWindowPlan {
    reason: &'static str,
}

/// A half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// `startDateTime` query value.
    pub fn start_param(&self) -> String {
        self.start.format(TIMESTAMP_FORMAT).to_string()
    }

    /// `endDateTime` query value.
    pub fn end_param(&self) -> String {
        self.end.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.start.date_naive(),
            self.end.date_naive()
        )
    }
}

/// A horizon partitioned into fixed-width windows.
///
/// The last window is not clipped and may run past the horizon.
///
/// # Examples
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use event_finder::domain::WindowPlan;
///
/// let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
/// let plan = WindowPlan::new(start, TimeDelta::days(720), TimeDelta::days(30)).unwrap();
///
/// assert_eq!(plan.window_count(), 24);
/// assert_eq!(plan.windows().count(), 24);
/// ```
#[derive(Debug, Clone)]
pub struct WindowPlan {
    start: DateTime<Utc>,
    horizon: DateTime<Utc>,
    width: TimeDelta,
}

impl WindowPlan {
    /// Plan windows of `width` covering `span` from `start`.
    pub fn new(
        start: DateTime<Utc>,
        span: TimeDelta,
        width: TimeDelta,
    ) -> Result<Self, InvalidWindowPlan> {
        if width.num_seconds() <= 0 {
            return Err(InvalidWindowPlan {
                reason: "window width must be at least one second",
            });
        }

        let horizon = start.checked_add_signed(span).ok_or(InvalidWindowPlan {
            reason: "horizon is out of range",
        })?;

        Ok(Self {
            start,
            horizon,
            width,
        })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn horizon(&self) -> DateTime<Utc> {
        self.horizon
    }

    pub fn width(&self) -> TimeDelta {
        self.width
    }

    /// Number of windows, `ceil(span / width)`, never less than 1.
    ///
    /// The floor of 1 keeps progress reporting well defined for a
    /// degenerate horizon.
    pub fn window_count(&self) -> usize {
        let span = (self.horizon - self.start).num_seconds().max(0);
        let width = self.width.num_seconds();
        let count = (span + width - 1) / width;
        (count as usize).max(1)
    }

    /// Lazily iterate the windows in order.
    pub fn windows(&self) -> Windows {
        Windows {
            next_start: self.start,
            horizon: self.horizon,
            width: self.width,
        }
    }
}

/// Iterator over the windows of a [`WindowPlan`].
#[derive(Debug, Clone)]
pub struct Windows {
    next_start: DateTime<Utc>,
    horizon: DateTime<Utc>,
    width: TimeDelta,
}

impl Iterator for Windows {
    type Item = DateWindow;

    fn next(&mut self) -> Option<DateWindow> {
        if self.next_start >= self.horizon {
            return None;
        }

        let start = self.next_start;
        let end = start.checked_add_signed(self.width)?;
        self.next_start = end;

        Some(DateWindow { start, end })
    }
}
