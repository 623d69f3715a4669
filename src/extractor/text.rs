//! Text normalization shared by every extracted field

use scraper::ElementRef;

/// Collapses every run of whitespace (newlines included) into a single
/// space and trims both ends
pub fn normalize_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized text content of an element and its descendants
pub fn element_text(element: &ElementRef) -> String {
    normalize_text(&element.text().collect::<String>())
}

/// Truncates to at most `max` characters without splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Length in characters rather than bytes
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
