//! Terminal rendering for eventmap types.
//!
//! Extension traits that add colored output to eventmap-core types using
//! owo_colors.

use eventmap_core::host::HostSnapshot;
use eventmap_core::map::MarkerView;
use eventmap_core::panel::DetailsPanel;
use eventmap_core::render::{RenderReport, SkippedEvent};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for MarkerView {
    fn render(&self) -> String {
        format!(
            "📍 {} {} {}",
            format!("[{}]", self.id).dimmed(),
            self.title.bold(),
            format!("({:.4}, {:.4})", self.position.lat, self.position.lng).dimmed()
        )
    }
}

impl Render for SkippedEvent {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            "!".yellow(),
            self.name.yellow(),
            format!("(lat: {}, lng: {})", self.lat, self.lng).dimmed()
        )
    }
}

impl Render for RenderReport {
    fn render(&self) -> String {
        let placed = format!("{} {}", self.placed, pluralize("marker", self.placed));
        if self.skipped.is_empty() {
            placed.green().to_string()
        } else {
            let skipped = format!("{} skipped", self.skipped.len());
            format!("{}, {}", placed.green(), skipped.yellow())
        }
    }
}

impl Render for DetailsPanel {
    fn render(&self) -> String {
        let mut lines = self.text.lines();
        let mut out = Vec::new();
        if let Some(title) = lines.next() {
            out.push(title.bold().to_string());
        }
        out.extend(lines.map(|l| format!("   {}", l)));
        out.join("\n")
    }
}

impl Render for HostSnapshot {
    fn render(&self) -> String {
        let updated = self
            .last_updated
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        format!(
            "{} events, {} markers, weekday {} {}",
            self.events,
            self.markers,
            self.weekday.bold(),
            format!("(updated {})", updated).dimmed()
        )
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
