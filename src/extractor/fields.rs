//! Per-container field extraction
//!
//! Each field is read through its own ordered list of probes. Probes are
//! tried in order and the first usable value wins; a field with no usable
//! value is left empty. Only a missing title or URL rejects the container.

use crate::extractor::record::ArticleRecord;
use crate::extractor::text::{char_len, element_text, normalize_text, truncate_chars};
use crate::url::resolve_link;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use url::Url;

/// Descriptions must be longer than this to count
const MIN_DESCRIPTION_CHARS: usize = 20;

/// Descriptions are cut to this many characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

fn selectors(patterns: &[&str]) -> Vec<Selector> {
    patterns
        .iter()
        .map(|p| Selector::parse(p).expect("hardcoded selector is valid"))
        .collect()
}

static TITLE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    selectors(&[
        "h1",
        "h2",
        "h3",
        "h4",
        "[class*='title']",
        "[class*='headline']",
        ".entry-title",
    ])
});

static TITLED_ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[title]").expect("hardcoded selector is valid"));

static URL_SELECTORS: Lazy<Vec<Selector>> =
    Lazy::new(|| selectors(&["a[href]", "[href]", "link[href]"]));

static DESCRIPTION_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    selectors(&[
        "p",
        "[class*='excerpt']",
        "[class*='summary']",
        "[class*='description']",
        ".entry-summary",
    ])
});

static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("hardcoded selector is valid"));

static DATE_SELECTORS: Lazy<Vec<Selector>> =
    Lazy::new(|| selectors(&["time", "[datetime]", "[class*='date']"]));

static AUTHOR_SELECTORS: Lazy<Vec<Selector>> =
    Lazy::new(|| selectors(&["[class*='author']", "[rel='author']"]));

/// Builds a record from one matched container
///
/// Returns None when the container has no title or no resolvable URL.
pub fn extract_record(
    container: ElementRef,
    base_url: &Url,
    scraped_at: DateTime<Utc>,
) -> Option<ArticleRecord> {
    let title = extract_title(&container)?;
    let url = extract_url(&container, base_url)?;

    let mut record = ArticleRecord::new(title, &url, scraped_at);
    record.description = extract_description(&container).unwrap_or_default();
    record.image = extract_image(&container, base_url).unwrap_or_default();
    record.date = extract_date(&container).unwrap_or_default();
    record.author = extract_author(&container).unwrap_or_default();

    Some(record)
}

/// First element text across the probes that satisfies `accept`
fn first_text(
    container: &ElementRef,
    probes: &[Selector],
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    probes.iter().find_map(|selector| {
        container
            .select(selector)
            .map(|element| element_text(&element))
            .find(|text| accept(text))
    })
}

pub(crate) fn extract_title(container: &ElementRef) -> Option<String> {
    first_text(container, &TITLE_SELECTORS, |t| !t.is_empty()).or_else(|| {
        container
            .select(&TITLED_ANCHOR)
            .filter_map(|a| a.value().attr("title"))
            .map(normalize_text)
            .find(|t| !t.is_empty())
    })
}

/// The container's own href counts as its first hyperlink. Each probe only
/// looks at its first match; an unresolvable href moves on to the next probe.
pub(crate) fn extract_url(container: &ElementRef, base_url: &Url) -> Option<Url> {
    if container.value().name() == "a" {
        if let Some(url) = container
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        {
            return Some(url);
        }
    }

    URL_SELECTORS.iter().find_map(|selector| {
        container
            .select(selector)
            .next()
            .and_then(|element| element.value().attr("href"))
            .and_then(|href| resolve_link(href, base_url))
    })
}

pub(crate) fn extract_description(container: &ElementRef) -> Option<String> {
    first_text(container, &DESCRIPTION_SELECTORS, |t| {
        char_len(t) > MIN_DESCRIPTION_CHARS
    })
    .map(|t| truncate_chars(&t, MAX_DESCRIPTION_CHARS))
}

/// `src` first, then the lazy-load `data-src`
pub(crate) fn extract_image(container: &ElementRef, base_url: &Url) -> Option<String> {
    let img = container.select(&IMAGE_SELECTOR).next()?;
    let source = ["src", "data-src"]
        .iter()
        .filter_map(|attr| img.value().attr(attr))
        .find(|value| !value.trim().is_empty())?;

    resolve_link(source, base_url).map(|url| url.to_string())
}

/// The machine-readable `datetime` attribute wins over element text
pub(crate) fn extract_date(container: &ElementRef) -> Option<String> {
    DATE_SELECTORS.iter().find_map(|selector| {
        container.select(selector).find_map(|element| {
            let value = element
                .value()
                .attr("datetime")
                .map(normalize_text)
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| element_text(&element));
            (!value.is_empty()).then_some(value)
        })
    })
}

pub(crate) fn extract_author(container: &ElementRef) -> Option<String> {
    first_text(container, &AUTHOR_SELECTORS, |t| !t.is_empty())
}
