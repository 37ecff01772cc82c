mod commands;
mod render;
mod terminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use eventmap_core::config::EventMapConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eventmap")]
#[command(about = "Show events from a JSON feed as map markers, filtered by weekday")]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Feed endpoint to use instead of the configured one
    #[arg(long, global = true)]
    feed: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed once and list the markers
    List {
        /// Only show events on this weekday ("all" for every day)
        #[arg(short, long)]
        weekday: Option<String>,
    },
    /// Keep the map up to date, refreshing on an interval
    Watch {
        /// Initial weekday filter ("all" for every day)
        #[arg(short, long)]
        weekday: Option<String>,

        /// Refresh interval (e.g. "60m", "30s")
        #[arg(short, long)]
        interval: Option<String>,
    },
    /// Show the config path and effective settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.verbose { "debug" } else { "info" })
        }))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut config = EventMapConfig::load()?;
    if let Some(feed) = cli.feed {
        config.feed_url = feed;
    }

    match cli.command {
        Commands::List { weekday } => {
            if let Some(weekday) = weekday {
                config.weekday = weekday;
            }
            commands::list::run(&config).await
        }
        Commands::Watch { weekday, interval } => {
            if let Some(weekday) = weekday {
                config.weekday = weekday;
            }
            if let Some(interval) = interval {
                config.refresh_interval = interval;
            }
            let refresh_interval = config.refresh_interval()?;
            commands::watch::run(&config, refresh_interval).await
        }
        Commands::Config => commands::config::run(&config),
    }
}
