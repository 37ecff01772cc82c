//! A map surface that draws to the terminal.

use eventmap_core::EventMapResult;
use eventmap_core::geo::LatLng;
use eventmap_core::map::{MapOptions, MapSurface, MarkerId, MemoryMap};
use eventmap_core::panel::DetailsPanel;
use owo_colors::OwoColorize;

use crate::render::Render;

/// Prints markers as they are placed and panels as they are opened.
#[derive(Debug, Default)]
pub struct TerminalMap {
    inner: MemoryMap,
}

impl TerminalMap {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MapSurface for TerminalMap {
    fn create_map(&mut self, options: &MapOptions) -> EventMapResult<()> {
        self.inner.create_map(options)?;
        println!(
            "{} centred on {} at zoom {}",
            "Map ready,".bold(),
            options.center,
            options.zoom
        );
        println!(
            "{}",
            "Type a weekday or \"all\" to filter, \"open <id>\" for details, \"help\" for more."
                .dimmed()
        );
        Ok(())
    }

    fn create_marker(&mut self, position: LatLng, title: &str) -> MarkerId {
        let id = self.inner.create_marker(position, title);
        if let Some(marker) = self.inner.marker(id) {
            println!("{}", marker.render());
        }
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.inner.remove_marker(id);
    }

    fn open_panel(&mut self, anchor: MarkerId, panel: &DetailsPanel) {
        self.inner.open_panel(anchor, panel);
        println!();
        println!("{}", panel.render());
        println!();
    }

    fn show_error(&mut self, message: &str) {
        self.inner.show_error(message);
        eprintln!("{}", message.red());
    }
}
