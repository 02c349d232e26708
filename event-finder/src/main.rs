use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use event_finder::cache::{CacheConfig, ExportCache};
use event_finder::config::{ApiKey, Cli, Command};
use event_finder::domain::{InvalidPostcode, InvalidRadius, Postcode, SearchRadius};
use event_finder::finder::{EventFinder, FinderConfig, FinderError, LogProgress, RunOutcome};
use event_finder::postcodes::{PostcodeClient, PostcodeClientConfig};
use event_finder::ticketmaster::{TicketmasterClient, TicketmasterConfig};
use event_finder::web::{AppState, LiveFinder, NO_EVENTS_MESSAGE, create_router};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "event_finder=info,tower_http=info";

#[derive(Debug, thiserror::Error)]
enum MainError {
    #[error(transparent)]
    Finder(#[from] FinderError),

    #[error(transparent)]
    Postcode(#[from] InvalidPostcode),

    #[error(transparent)]
    Radius(#[from] InvalidRadius),

    #[error("server error: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), MainError> {
    let finder = build_finder(cli.api_key, cli.timeout_secs)?;

    match cli.command {
        Command::Serve {
            address,
            static_dir,
        } => serve(finder, address, &static_dir).await,
        Command::Export {
            postcode,
            radius,
            out_dir,
        } => {
            let postcode = Postcode::parse(&postcode)?;
            let radius = SearchRadius::new(u32::from(radius))?;
            export(&finder, &postcode, radius, out_dir).await
        }
    }
}

/// Build the finder over the live APIs. A missing API key is fatal here,
/// before anything binds or fetches.
fn build_finder(api_key: Option<String>, timeout_secs: u64) -> Result<LiveFinder, FinderError> {
    let api_key = ApiKey::from_config(api_key)?;

    let geocoder =
        PostcodeClient::new(PostcodeClientConfig::default().with_timeout(timeout_secs))?;
    let search =
        TicketmasterClient::new(TicketmasterConfig::new(api_key).with_timeout(timeout_secs))?;

    EventFinder::new(geocoder, search, FinderConfig::default())
}

async fn serve(finder: LiveFinder, address: SocketAddr, static_dir: &Path) -> Result<(), MainError> {
    let exports = ExportCache::new(&CacheConfig::default());
    let app = create_router(AppState::new(finder, exports), static_dir);

    let listener = tokio::net::TcpListener::bind(address).await?;
    info!("Event Finder listening on http://{address}");
    info!("  GET  /                  - Search form");
    info!("  GET  /search            - Search progress page");
    info!("  GET  /search/events     - Search progress stream (SSE)");
    info!("  GET  /export/{{POSTCODE}}.csv - Download a completed search");
    info!("  GET  /health            - Health check");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn export(
    finder: &LiveFinder,
    postcode: &Postcode,
    radius: SearchRadius,
    out_dir: PathBuf,
) -> Result<(), MainError> {
    match finder.run(postcode, radius, &mut LogProgress).await? {
        RunOutcome::Found(export) => {
            let path = export
                .write_to_dir(&out_dir)
                .map_err(FinderError::from)?;
            info!(events = export.records().len(), path = %path.display(), "export written");
            println!("{}", path.display());
        }
        RunOutcome::NoEvents => println!("{NO_EVENTS_MESSAGE}"),
    }
    Ok(())
}
