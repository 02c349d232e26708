//! Unit tests for the route handlers and search streaming.

use super::*;
use crate::cache::CacheConfig;
use crate::config::ApiKey;
use crate::domain::{Coordinates, EventRecord};
use crate::export::export_csv;
use crate::finder::FinderConfig;
use crate::postcodes::{PostcodeClient, PostcodeClientConfig, PostcodeError};
use crate::ticketmaster::{MockTicketmasterClient, TicketmasterClient, TicketmasterConfig};
use serde_json::json;
use tokio::sync::mpsc::UnboundedReceiver;

struct StubGeocoder {
    coordinates: Option<Coordinates>,
}

impl Geocode for StubGeocoder {
    async fn locate(&self, postcode: &Postcode) -> Result<Coordinates, PostcodeError> {
        self.coordinates
            .ok_or_else(|| PostcodeError::InvalidLocation {
                postcode: postcode.clone(),
            })
    }
}

fn postcode() -> Postcode {
    Postcode::parse("SW1A1AA").unwrap()
}

fn radius() -> SearchRadius {
    SearchRadius::new(10).unwrap()
}

fn event(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "dates": {"start": {"localDate": "2026-11-01", "localTime": "19:00:00"}},
        "_embedded": {"venues": [{"name": "Royal Albert Hall", "city": {"name": "London"}}]}
    })
}

fn page(events: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "_embedded": {"events": events},
        "page": {"totalPages": 1}
    })
}

/// A finder over two 30-day windows.
fn finder(
    found: bool,
    search: MockTicketmasterClient,
) -> EventFinder<StubGeocoder, MockTicketmasterClient> {
    let geocoder = StubGeocoder {
        coordinates: found.then(|| Coordinates::new(51.501009, -0.141588)),
    };
    let config = FinderConfig::default().with_horizon(2, 30).without_delays();
    EventFinder::new(geocoder, search, config).unwrap()
}

async fn drain(mut rx: UnboundedReceiver<StreamMessage>) -> Vec<StreamMessage> {
    let mut messages = Vec::new();
    while let Some(message) = rx.recv().await {
        messages.push(message);
    }
    messages
}

fn live_state() -> AppState {
    let geocoder = PostcodeClient::new(PostcodeClientConfig::default()).unwrap();
    let api_key = ApiKey::from_config(Some("test-key".into())).unwrap();
    let search = TicketmasterClient::new(TicketmasterConfig::new(api_key)).unwrap();
    let finder = EventFinder::new(geocoder, search, FinderConfig::default()).unwrap();
    AppState::new(finder, ExportCache::new(&CacheConfig::default()))
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn search_page_rejects_missing_postcode() {
    let params = SearchParams {
        postcode: "  ".into(),
        radius: Some(40),
    };
    let response = search_page(Query(params)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = body_text(response).await;
    assert!(html.contains("please enter a postcode"));
    assert!(html.contains("value=\"40\""));
}

#[tokio::test]
async fn search_page_rejects_radius_out_of_range() {
    let params = SearchParams {
        postcode: "SW1A1AA".into(),
        radius: Some(500),
    };
    let response = search_page(Query(params)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("between 1 and 100 miles"));
}

#[tokio::test]
async fn search_page_shows_progress_for_valid_input() {
    let params = SearchParams {
        postcode: "sw1a 1aa".into(),
        radius: None,
    };
    let response = search_page(Query(params)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("SW1A1AA"));
    assert!(html.contains("radius=25"));
}

#[tokio::test]
async fn index_page_renders_form() {
    let Html(html) = index_page().await.unwrap();
    assert!(html.contains("name=\"postcode\""));
    assert!(html.contains("type=\"range\""));
}

// ============================================================================
// Downloads
// ============================================================================

#[tokio::test]
async fn download_serves_cached_export() {
    let state = live_state();
    let export = export_csv(&postcode(), vec![EventRecord::new("a")]).unwrap();
    state.exports.insert((postcode(), radius()), Arc::new(export)).await;

    let response = download_export(
        State(state),
        Path("SW1A1AA.csv".into()),
        Query(ExportParams { radius: Some(10) }),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"SW1A1AA.csv\""
    );
    let body = body_text(response).await;
    assert!(body.starts_with("id,name,event_type,sale_status,date,time,venue,city,url\n"));
}

#[tokio::test]
async fn download_without_export_is_not_found() {
    let state = live_state();
    let export = export_csv(&postcode(), vec![EventRecord::new("a")]).unwrap();
    state.exports.insert((postcode(), radius()), Arc::new(export)).await;

    // Different radius
    let result = download_export(
        State(state.clone()),
        Path("SW1A1AA.csv".into()),
        Query(ExportParams { radius: None }),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));

    // Not a CSV name
    let result = download_export(
        State(state),
        Path("SW1A1AA".into()),
        Query(ExportParams { radius: Some(10) }),
    )
    .await;
    assert!(matches!(result, Err(AppError::NotFound { .. })));
}

#[test]
fn app_error_status_codes() {
    let response = AppError::from(InputError::Postcode(
        crate::domain::InvalidPostcode::Missing,
    ))
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = AppError::Internal {
        message: "boom".into(),
    }
    .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Search runs
// ============================================================================

#[tokio::test]
async fn run_streams_progress_then_done() {
    let search = MockTicketmasterClient::new();
    search.push_json(page(vec![event("e1", "Proms in the Park")]));
    let finder = finder(true, search);
    let exports = ExportCache::new(&CacheConfig::default());
    let (tx, rx) = mpsc::unbounded_channel();

    run_search(&finder, &exports, postcode(), radius(), tx).await;
    let messages = drain(rx).await;

    assert_eq!(messages.len(), 3);
    let StreamMessage::Progress(first) = &messages[0] else {
        panic!("expected progress, got {:?}", messages[0]);
    };
    assert_eq!((first.window, first.total, first.percent), (1, 2, 0));
    assert!(first.label.starts_with("Date window 1/2 ("));

    let StreamMessage::Progress(second) = &messages[1] else {
        panic!("expected progress, got {:?}", messages[1]);
    };
    assert_eq!(second.percent, 50);

    let StreamMessage::Done(html) = &messages[2] else {
        panic!("expected done, got {:?}", messages[2]);
    };
    assert!(html.contains("Proms in the Park"));

    let cached = exports.get(&(postcode(), radius())).await.unwrap();
    assert_eq!(cached.records().len(), 1);
}

#[tokio::test]
async fn run_without_events_reports_empty() {
    let finder = finder(true, MockTicketmasterClient::new());
    let exports = ExportCache::new(&CacheConfig::default());
    let (tx, rx) = mpsc::unbounded_channel();

    run_search(&finder, &exports, postcode(), radius(), tx).await;
    let messages = drain(rx).await;

    assert_eq!(messages.last(), Some(&StreamMessage::Empty));
    assert!(exports.get(&(postcode(), radius())).await.is_none());
}

#[tokio::test]
async fn run_with_unknown_postcode_fails_without_searching() {
    let search = MockTicketmasterClient::new();
    let finder = finder(false, search.clone());
    let exports = ExportCache::new(&CacheConfig::default());
    let (tx, rx) = mpsc::unbounded_channel();

    run_search(&finder, &exports, postcode(), radius(), tx).await;
    let messages = drain(rx).await;

    assert_eq!(
        messages,
        vec![StreamMessage::Failed(
            "invalid postcode: no location found for SW1A1AA".into()
        )]
    );
    assert!(search.requests().is_empty());
}

#[tokio::test]
async fn run_surfaces_upstream_status_and_body() {
    let search = MockTicketmasterClient::new();
    search.push_status(401, "Invalid ApiKey");
    let finder = finder(true, search);
    let exports = ExportCache::new(&CacheConfig::default());
    let (tx, rx) = mpsc::unbounded_channel();

    run_search(&finder, &exports, postcode(), radius(), tx).await;
    let messages = drain(rx).await;

    let Some(StreamMessage::Failed(message)) = messages.last() else {
        panic!("expected failure, got {messages:?}");
    };
    assert!(message.contains("401"));
    assert!(message.contains("Invalid ApiKey"));
}

#[tokio::test]
async fn run_stops_when_stream_is_dropped() {
    let search = MockTicketmasterClient::new();
    let finder = finder(true, search.clone());
    let exports = ExportCache::new(&CacheConfig::default());
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);

    run_search(&finder, &exports, postcode(), radius(), tx).await;

    assert!(search.requests().is_empty());
}

#[tokio::test]
async fn page_progress_stops_once_stream_is_gone() {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut progress = ChannelProgress { tx };
    let summary = PageSummary::default();

    assert_eq!(progress.page_fetched(0, 5, &summary), ControlFlow::Continue(()));
    drop(rx);
    assert_eq!(progress.page_fetched(1, 5, &summary), ControlFlow::Break(()));
}

// ============================================================================
// Through the router, with both upstream APIs served locally
// ============================================================================

/// Serves postcodes.io and Discovery API lookalikes. Every event search
/// returns `events`; only SW1A1AA geocodes.
async fn serve_upstream(events: Vec<serde_json::Value>) -> String {
    let body = Arc::new(page(events));
    let upstream = Router::new()
        .route(
            "/postcodes/:code",
            get(|Path(code): Path<String>| async move {
                if code == "SW1A1AA" {
                    Json(json!({"result": {"latitude": 51.501009, "longitude": -0.141588}}))
                        .into_response()
                } else {
                    (StatusCode::NOT_FOUND, Json(json!({"error": "Invalid postcode"})))
                        .into_response()
                }
            }),
        )
        .route(
            "/events.json",
            get(move || {
                let body = body.clone();
                async move { Json((*body).clone()) }
            }),
        );
    serve(upstream).await
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

/// Serves the app against `upstream`, searching two windows without delays.
async fn serve_app(upstream: &str) -> String {
    let geocoder =
        PostcodeClient::new(PostcodeClientConfig::default().with_base_url(upstream)).unwrap();
    let api_key = ApiKey::from_config(Some("test-key".into())).unwrap();
    let search =
        TicketmasterClient::new(TicketmasterConfig::new(api_key).with_base_url(upstream)).unwrap();
    let config = FinderConfig::default().with_horizon(2, 30).without_delays();
    let finder = EventFinder::new(geocoder, search, config).unwrap();
    let state = AppState::new(finder, ExportCache::new(&CacheConfig::default()));

    serve(create_router(state, FsPath::new("static"))).await
}

async fn get_text(url: String) -> (reqwest::StatusCode, String) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    (status, response.text().await.unwrap())
}

#[tokio::test]
async fn event_stream_ends_with_done_and_export_downloads() {
    let upstream = serve_upstream(vec![event("e1", "Proms in the Park")]).await;
    let app = serve_app(&upstream).await;

    // Reading to the end only returns once the stream closes
    let (status, body) = get_text(format!("{app}/search/events?postcode=sw1a1aa&radius=10")).await;
    assert_eq!(status, reqwest::StatusCode::OK);

    assert_eq!(body.matches("event: progress\n").count(), 2);
    assert!(body.contains("\"label\":\"Date window 1/2 ("));
    assert_eq!(body.matches("event: done\n").count(), 1);
    assert!(body.rfind("event: done").unwrap() > body.rfind("event: progress").unwrap());
    assert!(body.contains("data: </table>"));
    assert!(body.contains("Proms in the Park"));
    assert!(!body.contains("event: empty"));
    assert!(!body.contains("event: failed"));

    let (status, csv) = get_text(format!("{app}/export/SW1A1AA.csv?radius=10")).await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert!(csv.starts_with("id,name,event_type,sale_status,date,time,venue,city,url\n"));
    assert!(csv.contains("e1,Proms in the Park"));
}

#[tokio::test]
async fn event_stream_reports_empty_search() {
    let upstream = serve_upstream(vec![]).await;
    let app = serve_app(&upstream).await;

    let (_, body) = get_text(format!("{app}/search/events?postcode=SW1A1AA&radius=10")).await;

    assert_eq!(body.matches("event: progress\n").count(), 2);
    assert!(body.ends_with("event: empty\ndata: No events found.\n\n"));

    let (status, _) = get_text(format!("{app}/export/SW1A1AA.csv?radius=10")).await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn event_stream_reports_unknown_postcode() {
    let upstream = serve_upstream(vec![event("e1", "Proms in the Park")]).await;
    let app = serve_app(&upstream).await;

    let (_, body) = get_text(format!("{app}/search/events?postcode=ZZ999ZZ&radius=10")).await;

    assert_eq!(
        body,
        "event: failed\ndata: invalid postcode: no location found for ZZ999ZZ\n\n"
    );
}

#[tokio::test]
async fn event_stream_rejects_bad_input() {
    let upstream = serve_upstream(vec![]).await;
    let app = serve_app(&upstream).await;

    let (status, body) = get_text(format!("{app}/search/events?postcode=&radius=10")).await;

    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
    assert!(body.contains("please enter a postcode"));
}
