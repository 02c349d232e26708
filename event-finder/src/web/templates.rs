//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{EventRecord, Postcode, SearchRadius};
use crate::export::CsvExport;

/// Rows shown in the results preview; the CSV always has every row.
pub const PREVIEW_ROWS: usize = 50;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Home page with search form.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub postcode: String,
    pub radius: u32,
    pub warning: Option<String>,
}

impl Default for IndexTemplate {
    fn default() -> Self {
        Self {
            postcode: String::new(),
            radius: u32::from(SearchRadius::DEFAULT),
            warning: None,
        }
    }
}

/// Progress page; subscribes to the event stream of one search.
#[derive(Template)]
#[template(path = "progress.html")]
pub struct ProgressTemplate {
    pub postcode: String,
    pub radius: u8,
    pub stream_url: String,
}

impl ProgressTemplate {
    pub fn new(postcode: &Postcode, radius: SearchRadius) -> Self {
        Self {
            postcode: postcode.to_string(),
            radius: radius.miles(),
            stream_url: format!(
                "/search/events?postcode={postcode}&radius={}",
                radius.miles()
            ),
        }
    }
}

// ============================================================================
// Fragment Templates (streamed, no base.html)
// ============================================================================

/// Results table and download link.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsTemplate {
    pub count: usize,
    pub filename: String,
    pub download_url: String,
    pub rows: Vec<EventRow>,
}

impl ResultsTemplate {
    pub fn new(radius: SearchRadius, export: &CsvExport) -> Self {
        let records = export.records();
        Self {
            count: records.len(),
            filename: export.filename().to_owned(),
            download_url: format!("/export/{}?radius={}", export.filename(), radius.miles()),
            rows: records
                .iter()
                .take(PREVIEW_ROWS)
                .map(EventRow::from_record)
                .collect(),
        }
    }

    /// Whether the preview leaves rows out.
    pub fn is_truncated(&self) -> bool {
        self.count > self.rows.len()
    }
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One event in the results preview. Missing values render as blanks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub name: String,
    pub event_type: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub city: String,
    pub url: Option<String>,
}

impl EventRow {
    pub fn from_record(record: &EventRecord) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: record.name.clone().unwrap_or_else(|| record.id.clone()),
            event_type: text(&record.event_type),
            date: text(&record.date),
            time: record
                .time
                .as_deref()
                .map(short_time)
                .unwrap_or_default()
                .to_owned(),
            venue: text(&record.venue),
            city: text(&record.city),
            url: record.url.clone(),
        }
    }
}

/// "19:30:00" → "19:30"; anything else is shown as reported.
fn short_time(time: &str) -> &str {
    match time.strip_suffix(":00") {
        Some(short) if short.len() == 5 => short,
        _ => time,
    }
}
