mod routes;
mod state;
mod surface;

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use eventmap_core::config::EventMapConfig;
use eventmap_core::fetch::Fetcher;
use eventmap_core::host::MapHost;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;
use crate::surface::SharedMap;

const DEFAULT_PORT: u16 = 4097;

#[derive(Parser)]
#[command(name = "eventmap-server")]
#[command(about = "Serve event map markers and info panels to a browser map")]
struct Args {
    /// Port to listen on (127.0.0.1 only)
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Feed endpoint to use instead of the configured one
    #[arg(long)]
    feed: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = EventMapConfig::load()?;
    if let Some(feed) = args.feed {
        config.feed_url = feed;
    }

    let fetcher = Fetcher::new(&config.feed_url, config.request_timeout()?)?;
    let map = SharedMap::new();

    // A map that fails to start stays down; the API keeps serving the error.
    let host = match MapHost::start(
        map.clone(),
        &config.map_options(),
        config.filter_state(),
        fetcher,
        config.refresh_interval()?,
    ) {
        Ok((host, handle)) => {
            tokio::spawn(host.run());
            Some(handle)
        }
        Err(e) => {
            error!(error = %e, "Map failed to start; no events will be fetched");
            None
        }
    };

    let state = AppState::new(host.clone(), map);
    let app = routes::app(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    info!(feed = %config.feed_url, "eventmap-server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    if let Some(handle) = host {
        handle.shutdown().await.ok();
    }

    Ok(())
}
