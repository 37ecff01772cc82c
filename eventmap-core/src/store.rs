//! The last successfully fetched event list.

use chrono::{DateTime, Utc};

use crate::event::Event;

/// Holds the full event list from the most recent successful fetch.
///
/// Contents are only ever replaced wholesale; there is no way to add or
/// remove individual events.
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: Vec<Event>,
    last_updated: Option<DateTime<Utc>>,
}

impl EventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents with a freshly fetched list.
    pub fn replace(&mut self, events: Vec<Event>) {
        self.events = events;
        self.last_updated = Some(Utc::now());
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// When the contents were last replaced. `None` until the first
    /// successful fetch.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let store = EventStore::new();
        assert!(store.is_empty());
        assert!(store.last_updated().is_none());
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut store = EventStore::new();
        store.replace(vec![Event::new("A"), Event::new("B")]);
        store.replace(vec![Event::new("C")]);

        let names: Vec<_> = store.events().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["C"]);
        assert!(store.last_updated().is_some());
    }

    #[test]
    fn test_replace_with_empty_clears() {
        let mut store = EventStore::new();
        store.replace(vec![Event::new("A")]);
        store.replace(vec![]);
        assert!(store.is_empty());
        assert!(store.last_updated().is_some());
    }
}
