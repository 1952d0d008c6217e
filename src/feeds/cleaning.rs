// src/feeds/cleaning.rs
use scraper::Html;

pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const DEFAULT_LOCATION: &str = "Remote";
pub const NO_DESCRIPTION: &str = "No description available";

const KNOWN_CITIES: [&str; 6] = ["Madrid", "Barcelona", "Bilbao", "Valencia", "Sevilla", "Zaragoza"];

/// Strip markup and collapse whitespace
pub fn strip_markup(text: &str) -> String {
    let fragment = Html::parse_fragment(text);
    let plain = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&plain)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean a feed description for display and scoring, truncating long text with `...`
pub fn clean_description(raw: &str) -> String {
    let text = strip_markup(raw);
    if text.is_empty() {
        return NO_DESCRIPTION.to_string();
    }

    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        let truncated: String = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
        format!("{}...", truncated)
    } else {
        text
    }
}

/// Explicit location when the feed has one, else the first known city in the summary
pub fn extract_location(explicit: Option<&str>, summary: &str) -> String {
    if let Some(location) = explicit.map(str::trim).filter(|l| !l.is_empty()) {
        return location.to_string();
    }

    let summary = summary.to_lowercase();
    KNOWN_CITIES
        .iter()
        .find(|city| summary.contains(&city.to_lowercase()))
        .map(|city| city.to_string())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        let html = "<p>Data <b>Analyst</b></p>\n<ul><li>SQL</li><li>Python</li></ul>";
        assert_eq!(strip_markup(html), "Data Analyst SQL Python");
    }

    #[test]
    fn test_clean_description_handles_empty() {
        assert_eq!(clean_description(""), NO_DESCRIPTION);
        assert_eq!(clean_description("<br/>  "), NO_DESCRIPTION);
    }

    #[test]
    fn test_clean_description_truncates() {
        let long = "a".repeat(MAX_DESCRIPTION_CHARS + 20);
        let cleaned = clean_description(&long);
        assert!(cleaned.ends_with("..."));
        assert_eq!(cleaned.chars().count(), MAX_DESCRIPTION_CHARS + 3);
    }

    #[test]
    fn test_extract_location() {
        assert_eq!(extract_location(Some(" Bilbao "), ""), "Bilbao");
        assert_eq!(extract_location(None, "Oficina en MADRID centro"), "Madrid");
        assert_eq!(extract_location(Some(""), "Teletrabajo"), DEFAULT_LOCATION);
    }
}
