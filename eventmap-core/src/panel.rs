//! Details panel shown when a marker is clicked.

use serde::Serialize;

use crate::event::Event;
use crate::geo::LatLng;

const DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/?api=1&destination=";

/// Content for the info window anchored to a marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsPanel {
    pub title: String,
    pub html: String,
    /// Plain-text rendering for terminals
    pub text: String,
    pub directions_url: String,
}

impl DetailsPanel {
    /// Build the panel for an event. `position` is the marker's validated
    /// coordinate, when there is one.
    pub fn for_event(event: &Event, position: Option<LatLng>) -> Self {
        let directions_url = directions_url(event, position);

        let mut html = format!("<h3>{}</h3>", escape_html(&event.name));
        html.push_str(&format!(
            "<p><strong>Date:</strong> {} ({})</p>",
            escape_html(&event.date),
            escape_html(&event.weekday)
        ));
        html.push_str(&format!(
            "<p><strong>Time:</strong> {}</p>",
            escape_html(&event.time)
        ));
        html.push_str(&format!(
            "<p><strong>Location:</strong> {}</p>",
            escape_html(&event.location)
        ));
        html.push_str(&format!(
            "<p><a href=\"{}\" target=\"_blank\" title=\"Open directions in Google Maps\">Get Directions</a></p>",
            escape_html(&directions_url)
        ));
        if let Some(description) = event.description() {
            html.push_str(&format!(
                "<hr><p>{}</p>",
                escape_html(description).replace('\n', "<br>")
            ));
        }

        DetailsPanel {
            title: event.name.clone(),
            html,
            text: panel_text(event, &directions_url),
            directions_url,
        }
    }
}

fn panel_text(event: &Event, directions_url: &str) -> String {
    let mut lines = vec![
        event.name.clone(),
        format!("Date: {} ({})", event.date, event.weekday),
        format!("Time: {}", event.time),
        format!("Location: {}", event.location),
        format!("Directions: {}", directions_url),
    ];
    if let Some(description) = event.description() {
        lines.push(String::new());
        lines.extend(description.lines().map(String::from));
    }
    lines.join("\n")
}

/// Directions link: exact coordinates when known, otherwise a geocoding
/// query built from the free-text location.
pub fn directions_url(event: &Event, position: Option<LatLng>) -> String {
    let destination = match position {
        Some(pos) => pos.to_string(),
        None => urlencoding::encode(&event.location).into_owned(),
    };
    format!("{}{}", DIRECTIONS_BASE_URL, destination)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picnic() -> Event {
        let mut event = Event::new("Picnic")
            .with_coordinates(-33.8, 151.2)
            .with_weekday("Saturday");
        event.date = "2025-03-22".to_string();
        event.time = "11:00".to_string();
        event.location = "Centennial Park, Sydney".to_string();
        event
    }

    #[test]
    fn test_directions_prefer_coordinates() {
        let url = directions_url(&picnic(), Some(LatLng::new(-33.8, 151.2)));
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&destination=-33.8,151.2"
        );
    }

    #[test]
    fn test_directions_fall_back_to_location_text() {
        let url = directions_url(&picnic(), None);
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&destination=Centennial%20Park%2C%20Sydney"
        );
    }

    #[test]
    fn test_panel_sections_in_order() {
        let panel = DetailsPanel::for_event(&picnic(), Some(LatLng::new(-33.8, 151.2)));

        let heading = panel.html.find("<h3>Picnic</h3>").expect("heading");
        let date = panel
            .html
            .find("<strong>Date:</strong> 2025-03-22 (Saturday)")
            .expect("date");
        let time = panel.html.find("<strong>Time:</strong> 11:00").expect("time");
        let location = panel
            .html
            .find("<strong>Location:</strong> Centennial Park, Sydney")
            .expect("location");
        let link = panel.html.find("Get Directions").expect("link");

        assert!(heading < date && date < time && time < location && location < link);
        assert!(!panel.html.contains("<hr>"));
        assert_eq!(panel.title, "Picnic");
    }

    #[test]
    fn test_description_line_breaks() {
        let mut event = picnic();
        event.description = Some("Bring a rug\nand snacks".to_string());
        let panel = DetailsPanel::for_event(&event, None);
        assert!(panel.html.ends_with("<hr><p>Bring a rug<br>and snacks</p>"));
    }

    #[test]
    fn test_feed_text_is_escaped() {
        let mut event = picnic();
        event.name = "<script>alert(1)</script>".to_string();
        let panel = DetailsPanel::for_event(&event, None);
        assert!(panel.html.starts_with("<h3>&lt;script&gt;alert(1)&lt;/script&gt;</h3>"));
    }

    #[test]
    fn test_text_rendering() {
        let mut event = picnic();
        event.description = Some("Line one\nLine two".to_string());
        let panel = DetailsPanel::for_event(&event, Some(LatLng::new(-33.8, 151.2)));
        let text = &panel.text;

        assert!(text.starts_with("Picnic\nDate: 2025-03-22 (Saturday)\nTime: 11:00"));
        assert!(text.ends_with("\n\nLine one\nLine two"));
    }
}
