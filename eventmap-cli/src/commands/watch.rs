use std::time::Duration;

use anyhow::Result;
use eventmap_core::config::EventMapConfig;
use eventmap_core::fetch::Fetcher;
use eventmap_core::host::{HostHandle, MapHost};
use eventmap_core::map::MarkerId;
use owo_colors::OwoColorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::render::Render;
use crate::terminal::TerminalMap;

/// A line typed at the watch prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Empty,
    Help,
    Quit,
    Refresh,
    Status,
    Open(u64),
    /// Anything else is a weekday selector value
    Weekday(String),
    Invalid(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let mut parts = line.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => Input::Empty,
        (Some("help"), None, _) => Input::Help,
        (Some("quit" | "exit"), None, _) => Input::Quit,
        (Some("refresh"), None, _) => Input::Refresh,
        (Some("status"), None, _) => Input::Status,
        (Some("open"), Some(id), None) => match id.parse() {
            Ok(id) => Input::Open(id),
            Err(_) => Input::Invalid(format!("'{}' is not a marker id", id)),
        },
        (Some("open"), _, _) => Input::Invalid("usage: open <id>".to_string()),
        _ => Input::Weekday(line.to_string()),
    }
}

/// Run the map host against the terminal until the user quits.
pub async fn run(config: &EventMapConfig, refresh_interval: Duration) -> Result<()> {
    let fetcher = Fetcher::new(&config.feed_url, config.request_timeout()?)?;

    let (host, handle) = MapHost::start(
        TerminalMap::new(),
        &config.map_options(),
        config.filter_state(),
        fetcher,
        refresh_interval,
    )?;
    let host_task = tokio::spawn(host.run());
    info!(
        feed = %config.feed_url,
        interval_secs = refresh_interval.as_secs(),
        "Watching feed"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed; keep refreshing until interrupted
                    tokio::signal::ctrl_c().await?;
                    break;
                };
                if !handle_input(&handle, parse_input(&line)).await? {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    handle.shutdown().await.ok();
    host_task.await?;
    Ok(())
}

/// Returns false when the user asked to quit.
async fn handle_input(handle: &HostHandle, input: Input) -> Result<bool> {
    match input {
        Input::Empty => {}
        Input::Quit => return Ok(false),
        Input::Help => print_help(),
        Input::Refresh => match handle.refresh().await {
            Ok(report) => println!("{}", report.render()),
            Err(e) => println!("{}", e.to_string().red()),
        },
        Input::Status => println!("{}", handle.snapshot().await?.render()),
        Input::Open(id) => {
            if handle.click(MarkerId(id)).await?.is_none() {
                println!("{}", format!("No marker with id {} on the map", id).red());
            }
        }
        Input::Weekday(selector) => {
            let report = handle.set_weekday(selector).await?;
            println!("{}", report.render());
        }
        Input::Invalid(msg) => println!("{}", msg.red()),
    }
    Ok(true)
}

fn print_help() {
    println!("{}", "Commands".bold());
    println!("  all            show every event");
    println!("  <weekday>      show only events on that weekday (exact match, e.g. Saturday)");
    println!("  open <id>      show details for a marker");
    println!("  refresh        fetch the feed now");
    println!("  status         show event and marker counts");
    println!("  quit           exit");
}
