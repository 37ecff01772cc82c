use anyhow::Result;
use eventmap_core::app::AppState;
use eventmap_core::config::EventMapConfig;
use eventmap_core::fetch::Fetcher;
use eventmap_core::map::{MapSurface, MemoryMap};
use owo_colors::OwoColorize;

use super::create_spinner;
use crate::render::Render;

/// Fetch the feed once and print the markers that would be shown.
pub async fn run(config: &EventMapConfig) -> Result<()> {
    let fetcher = Fetcher::new(&config.feed_url, config.request_timeout()?)?;

    let mut surface = MemoryMap::new();
    surface.create_map(&config.map_options())?;
    let mut state = AppState::new(surface, config.filter_state());

    let spinner = create_spinner("Fetching events...".to_string());
    let result = state.run_fetch_cycle(&fetcher).await;
    spinner.finish_and_clear();
    let report = result?;

    println!(
        "{} {}",
        "Weekday:".dimmed(),
        state.filters().weekday.bold()
    );

    let markers = state.surface().markers();
    if markers.is_empty() {
        println!("   {}", "No events to show".dimmed());
    }
    for marker in &markers {
        println!("   {}", marker.render());
    }

    if !report.skipped.is_empty() {
        println!();
        println!("{}", "Skipped (missing or invalid coordinates):".dimmed());
        for skipped in &report.skipped {
            println!("   {}", skipped.render());
        }
    }

    println!();
    println!(
        "{} of {} events: {}",
        state.renderer().active_count(),
        state.store().len(),
        report.render()
    );

    Ok(())
}
