//! HTTP route handlers.

use std::convert::Infallible;
use std::ops::ControlFlow;
use std::path::Path as FsPath;
use std::sync::Arc;

use askama::Template;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{
        Html, IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use futures::stream::{self, Stream};
use tokio::sync::mpsc::{self, UnboundedSender};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

use crate::cache::ExportCache;
use crate::domain::{DateWindow, Postcode, SearchRadius};
use crate::export::CsvExport;
use crate::finder::{EventFinder, FinderError, PageSummary, Progress, RunOutcome, percent_complete};
use crate::postcodes::Geocode;
use crate::ticketmaster::EventSearch;

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Shown when a search completes without any usable event.
pub const NO_EVENTS_MESSAGE: &str = "No events found.";

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &FsPath) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/search", get(search_page))
        .route("/search/events", get(search_events))
        .route("/export/:filename", get(download_export))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn render<T: Template>(template: &T) -> Result<String, AppError> {
    template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {e}"),
    })
}

/// Index page with search form.
async fn index_page() -> Result<Html<String>, AppError> {
    Ok(Html(render(&IndexTemplate::default())?))
}

/// Validate the form and show the progress page for the search.
///
/// Bad input re-renders the form with a warning.
async fn search_page(Query(params): Query<SearchParams>) -> Result<Response, AppError> {
    let (postcode, radius) = match params.validate() {
        Ok(valid) => valid,
        Err(e) => {
            debug!(postcode = %params.postcode, error = %e, "rejected search form");
            let form = IndexTemplate {
                postcode: params.postcode.clone(),
                radius: params.radius_or_default(),
                warning: Some(e.to_string()),
            };
            return Ok((StatusCode::BAD_REQUEST, Html(render(&form)?)).into_response());
        }
    };

    let page = ProgressTemplate::new(&postcode, radius);
    Ok(Html(render(&page)?).into_response())
}

/// Run a search and stream its progress as server-sent events.
///
/// The stream ends after exactly one `done`, `empty` or `failed` event.
/// Closing the stream stops the search before its next request.
async fn search_events(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let (postcode, radius) = params.validate()?;
    let (tx, rx) = mpsc::unbounded_channel();

    let AppState { finder, exports } = state;
    tokio::spawn(async move {
        run_search(&finder, &exports, postcode, radius, tx).await;
    });

    let stream = stream::unfold(rx, |mut rx| async move {
        let message = rx.recv().await?;
        Some((Ok::<_, Infallible>(message.into_event()), rx))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Download a completed export.
async fn download_export(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound {
        message: format!("No completed export for {filename}"),
    };

    let postcode = filename
        .strip_suffix(".csv")
        .and_then(|code| Postcode::parse(code).ok())
        .ok_or_else(not_found)?;
    let radius = params
        .radius
        .map(SearchRadius::new)
        .transpose()
        .map_err(InputError::from)?
        .unwrap_or_default();

    let export = state
        .exports
        .get(&(postcode, radius))
        .await
        .ok_or_else(not_found)?;

    Ok(csv_response(&export))
}

fn csv_response(export: &CsvExport) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", export.filename());
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        export.content().to_owned(),
    )
        .into_response()
}

// ============================================================================
// Search runs
// ============================================================================

/// Message from a running search to its event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamMessage {
    Progress(ProgressUpdate),
    /// Rendered results fragment
    Done(String),
    Empty,
    Failed(String),
}

impl StreamMessage {
    pub fn into_event(self) -> Event {
        match self {
            StreamMessage::Progress(update) => {
                let data = serde_json::to_string(&update).unwrap_or_else(|_| update.label.clone());
                sse_event("progress", &data)
            }
            StreamMessage::Done(html) => sse_event("done", &html),
            StreamMessage::Empty => sse_event("empty", NO_EVENTS_MESSAGE),
            StreamMessage::Failed(message) => sse_event("failed", &message),
        }
    }
}

/// SSE data lines cannot carry carriage returns.
fn sse_event(name: &str, data: &str) -> Event {
    Event::default().event(name).data(data.replace('\r', ""))
}

/// Forwards window progress to an event stream.
///
/// Once the stream is gone the search is stopped before its next request.
struct ChannelProgress {
    tx: UnboundedSender<StreamMessage>,
}

impl Progress for ChannelProgress {
    fn window_started(&mut self, index: usize, total: usize, window: &DateWindow) -> ControlFlow<()> {
        let update = ProgressUpdate {
            window: index,
            total,
            label: format!("Date window {index}/{total} ({window})"),
            percent: percent_complete(index, total),
        };

        match self.tx.send(StreamMessage::Progress(update)) {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => ControlFlow::Break(()),
        }
    }

    fn page_fetched(&mut self, _: u32, _: u32, _: &PageSummary) -> ControlFlow<()> {
        if self.tx.is_closed() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Run one search to completion, reporting on `tx`.
///
/// A found export is cached before `done` is sent, so the download link in
/// the fragment is live as soon as it is shown.
async fn run_search<G: Geocode, S: EventSearch>(
    finder: &EventFinder<G, S>,
    exports: &ExportCache,
    postcode: Postcode,
    radius: SearchRadius,
    tx: UnboundedSender<StreamMessage>,
) {
    let mut progress = ChannelProgress { tx: tx.clone() };

    let message = match finder.run(&postcode, radius, &mut progress).await {
        Ok(RunOutcome::Found(export)) => {
            let rendered = ResultsTemplate::new(radius, &export).render();
            match rendered {
                Ok(html) => {
                    exports.insert((postcode.clone(), radius), Arc::new(export)).await;
                    debug!(%postcode, cached = exports.entry_count(), "export cached");
                    StreamMessage::Done(html)
                }
                Err(e) => {
                    error!(%postcode, error = %e, "failed to render results");
                    StreamMessage::Failed(format!("Template error: {e}"))
                }
            }
        }
        Ok(RunOutcome::NoEvents) => StreamMessage::Empty,
        Err(FinderError::Cancelled) => {
            debug!(%postcode, "client went away, search stopped");
            return;
        }
        Err(e) => {
            warn!(%postcode, error = %e, "event search failed");
            StreamMessage::Failed(e.to_string())
        }
    };

    if tx.send(message).is_err() {
        debug!(%postcode, "client went away before the search finished");
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<InputError> for AppError {
    fn from(e: InputError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
