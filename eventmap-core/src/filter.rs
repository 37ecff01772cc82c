//! Client-side filtering of the stored event list.

use std::fmt;

use tracing::info;

use crate::event::Event;
use crate::store::EventStore;

/// Selector value meaning "do not filter by weekday".
pub const ALL_WEEKDAYS: &str = "all";

/// Current value of the weekday selector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WeekdayFilter {
    #[default]
    All,
    /// Exact, case-sensitive match against `Event::weekday`
    Day(String),
}

impl WeekdayFilter {
    /// Interpret a raw selector value. Only the exact sentinel `all` means
    /// no filtering.
    pub fn from_selector(value: &str) -> Self {
        if value == ALL_WEEKDAYS {
            WeekdayFilter::All
        } else {
            WeekdayFilter::Day(value.to_string())
        }
    }

    pub fn as_selector(&self) -> &str {
        match self {
            WeekdayFilter::All => ALL_WEEKDAYS,
            WeekdayFilter::Day(day) => day,
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            WeekdayFilter::All => true,
            WeekdayFilter::Day(day) => event.weekday == *day,
        }
    }
}

impl fmt::Display for WeekdayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_selector())
    }
}

/// All UI filter selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub weekday: WeekdayFilter,
}

impl FilterState {
    pub fn new(weekday: WeekdayFilter) -> Self {
        FilterState { weekday }
    }
}

/// Derive the filtered view of the store. The store is never modified.
pub fn apply_filters(store: &EventStore, filters: &FilterState) -> Vec<Event> {
    if store.is_empty() {
        return Vec::new();
    }

    let filtered: Vec<Event> = store
        .events()
        .iter()
        .filter(|event| filters.weekday.matches(event))
        .cloned()
        .collect();

    info!(
        weekday = %filters.weekday,
        displayed = filtered.len(),
        total = store.len(),
        "Applying filters"
    );

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store_with(events: Vec<Event>) -> EventStore {
        let mut store = EventStore::new();
        store.replace(events);
        store
    }

    fn week() -> Vec<Event> {
        vec![
            Event::new("Picnic").with_weekday("Saturday"),
            Event::new("Quiz").with_weekday("Monday"),
            Event::new("Market").with_weekday("Saturday"),
            Event::new("Undated"),
        ]
    }

    #[test]
    fn test_selector_parsing() {
        assert_eq!(WeekdayFilter::from_selector("all"), WeekdayFilter::All);
        assert_eq!(
            WeekdayFilter::from_selector("All"),
            WeekdayFilter::Day("All".to_string())
        );
        assert_eq!(WeekdayFilter::from_selector("Monday").as_selector(), "Monday");
    }

    #[test]
    fn test_empty_store_gives_empty_view() {
        let store = EventStore::new();
        assert!(apply_filters(&store, &FilterState::default()).is_empty());
    }

    #[test]
    fn test_all_is_identity() {
        let store = store_with(week());
        let filtered = apply_filters(&store, &FilterState::default());
        assert_eq!(filtered, store.events().to_vec());
    }

    #[test]
    fn test_weekday_keeps_exactly_matching_events() {
        let store = store_with(week());
        let filters = FilterState::new(WeekdayFilter::from_selector("Saturday"));
        let filtered = apply_filters(&store, &filters);

        let names: Vec<_> = filtered.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Picnic", "Market"]);
        assert!(filtered.iter().all(|e| e.weekday == "Saturday"));
    }

    #[test]
    fn test_weekday_match_is_case_sensitive() {
        let store = store_with(week());
        let filters = FilterState::new(WeekdayFilter::from_selector("saturday"));
        assert!(apply_filters(&store, &filters).is_empty());
    }

    #[test]
    fn test_store_is_untouched() {
        let store = store_with(week());
        let before = store.events().to_vec();
        let _ = apply_filters(&store, &FilterState::new(WeekdayFilter::from_selector("Monday")));
        assert_eq!(store.events().to_vec(), before);
    }
}
