//! Heuristic article extraction
//!
//! Given an HTML listing page and its URL, produce a deduplicated,
//! document-ordered list of [`ArticleRecord`]s without any site-specific
//! configuration.
//!
//! # Algorithm
//!
//! 1. Container selectors are tried from most to least specific. For each,
//!    every matching element goes through field extraction and records
//!    without a title or URL are dropped.
//! 2. The first selector producing at least one record decides the whole
//!    result; later selectors are never merged in.
//! 3. If no selector produces anything, fall back to link harvesting.
//!
//! Malformed markup never fails: the worst case is an empty list.

mod fields;
mod harvest;
mod record;
mod text;

pub use fields::{extract_record, MAX_DESCRIPTION_CHARS};
pub use harvest::{harvest_links, looks_like_article_url, MAX_HARVESTED};
pub use record::ArticleRecord;
pub use text::normalize_text;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Container selectors in decreasing specificity
const CONTAINER_PATTERNS: &[&str] = &[
    // Semantic
    "article",
    // Substring matches
    "[class*='article']",
    "[id*='article']",
    "[class*='news']",
    "[id*='news']",
    "[class*='post']",
    "[id*='post']",
    // Generic listing classes
    ".story",
    ".entry",
    ".card",
    ".item",
    // Tag + class
    "div[class*='story']",
    "div[class*='entry']",
    "div[class*='card']",
    "li[class*='item']",
    "li[class*='entry']",
];

static CONTAINER_SELECTORS: Lazy<Vec<(&'static str, Selector)>> = Lazy::new(|| {
    CONTAINER_PATTERNS
        .iter()
        .map(|p| (*p, Selector::parse(p).expect("hardcoded selector is valid")))
        .collect()
});

/// Extracts article records from an HTML document
///
/// # Arguments
///
/// * `html` - The page markup
/// * `base_url` - The page URL, used to resolve relative links
///
/// # Example
///
/// ```
/// use newsreel::extractor::extract_articles;
/// use url::Url;
///
/// let html = r#"<article><h2>Harbour reopens</h2><a href="/news/harbour">Read</a></article>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let articles = extract_articles(html, &base);
/// assert_eq!(articles[0].url, "https://example.com/news/harbour");
/// ```
pub fn extract_articles(html: &str, base_url: &Url) -> Vec<ArticleRecord> {
    let document = Html::parse_document(html);
    extract_from_document(&document, base_url)
}

/// Same as [`extract_articles`] for an already parsed document
pub fn extract_from_document(document: &Html, base_url: &Url) -> Vec<ArticleRecord> {
    let scraped_at = Utc::now();

    for (pattern, selector) in CONTAINER_SELECTORS.iter() {
        let records = extract_with_selector(document, selector, base_url, scraped_at);
        if !records.is_empty() {
            tracing::debug!(
                selector = *pattern,
                count = records.len(),
                "Container selector matched"
            );
            return records;
        }
    }

    let records = harvest_links(document, base_url, scraped_at);
    tracing::debug!(count = records.len(), "No container matched, harvested links");
    records
}

/// Runs field extraction over every match of one selector, keeping the
/// first record per URL
fn extract_with_selector(
    document: &Html,
    selector: &Selector,
    base_url: &Url,
    scraped_at: DateTime<Utc>,
) -> Vec<ArticleRecord> {
    let mut seen = HashSet::new();

    document
        .select(selector)
        .filter_map(|element| extract_record(element, base_url, scraped_at))
        .filter(|record| seen.insert(record.url.clone()))
        .collect()
}
