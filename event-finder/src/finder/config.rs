//! Search configuration for the event finder.

use std::time::Duration;

use chrono::TimeDelta;

use crate::config::ConfigError;

/// Days per month when converting the horizon to days.
const DAYS_PER_MONTH: i64 = 30;

/// Tuning parameters for a search run.
#[derive(Debug, Clone)]
pub struct FinderConfig {
    /// Maximum pages fetched per date window, whatever the API reports.
    pub page_cap: u32,

    /// Results requested per page.
    pub page_size: u32,

    /// Width of each date window (days).
    pub window_days: i64,

    /// How far ahead to search (months of 30 days).
    pub months_ahead: i64,

    /// Pause after each successful page (milliseconds).
    pub page_delay_ms: u64,

    /// First pause after an HTTP 429 (milliseconds).
    /// Doubles on each consecutive 429 for the same page.
    pub rate_limit_backoff_ms: u64,

    /// Upper bound on a single rate-limit pause (milliseconds).
    pub rate_limit_backoff_cap_ms: u64,

    /// Consecutive 429s tolerated for one page before giving up.
    pub max_rate_limit_retries: u32,
}

impl FinderConfig {
    /// Returns the window width as a TimeDelta.
    pub fn window_width(&self) -> TimeDelta {
        TimeDelta::days(self.window_days)
    }

    /// Returns the search horizon as a TimeDelta.
    pub fn horizon(&self) -> TimeDelta {
        TimeDelta::days(self.months_ahead * DAYS_PER_MONTH)
    }

    /// Returns the inter-page delay as a Duration.
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Pause before retry number `retry` (zero-based) of a rate-limited page.
    pub fn rate_limit_backoff(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        let millis = self
            .rate_limit_backoff_ms
            .saturating_mul(factor)
            .min(self.rate_limit_backoff_cap_ms);
        Duration::from_millis(millis)
    }

    /// Set the per-window page cap.
    pub fn with_page_cap(mut self, page_cap: u32) -> Self {
        self.page_cap = page_cap;
        self
    }

    /// Set the window width and horizon.
    pub fn with_horizon(mut self, months_ahead: i64, window_days: i64) -> Self {
        self.months_ahead = months_ahead;
        self.window_days = window_days;
        self
    }

    /// Set the number of rate-limit retries per page.
    pub fn with_max_rate_limit_retries(mut self, retries: u32) -> Self {
        self.max_rate_limit_retries = retries;
        self
    }

    /// Remove every pause (for tests and mock runs).
    pub fn without_delays(mut self) -> Self {
        self.page_delay_ms = 0;
        self.rate_limit_backoff_ms = 0;
        self.rate_limit_backoff_cap_ms = 0;
        self
    }

    /// Check the values describe a runnable search.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_cap == 0 {
            return Err(ConfigError::Invalid("page cap must be at least 1".into()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page size must be at least 1".into()));
        }
        if self.window_days <= 0 {
            return Err(ConfigError::Invalid(
                "window width must be at least 1 day".into(),
            ));
        }
        if self.months_ahead < 0 {
            return Err(ConfigError::Invalid(
                "months ahead must not be negative".into(),
            ));
        }
        Ok(())
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            page_cap: 5,
            page_size: 200,
            window_days: 30,
            months_ahead: 24,
            page_delay_ms: 200,
            rate_limit_backoff_ms: 1_500,
            rate_limit_backoff_cap_ms: 30_000,
            max_rate_limit_retries: 8,
        }
    }
}
