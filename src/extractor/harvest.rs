//! Link-harvesting fallback
//!
//! Used only when no container selector produced a record. Every anchor on
//! the page is screened for article-like text and an article-shaped URL.

use crate::extractor::record::ArticleRecord;
use crate::extractor::text::{char_len, element_text};
use crate::url::resolve_link;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

const MIN_ANCHOR_TEXT: usize = 15;
const MAX_ANCHOR_TEXT: usize = 200;

/// Harvested records are capped at this many
pub const MAX_HARVESTED: usize = 50;

/// Anchors whose class contains any of these are boilerplate
const CLASS_STOPLIST: &[&str] = &["nav", "menu", "footer", "header", "sidebar", "comment"];

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("hardcoded selector is valid"));

static ARTICLE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/(news|article|story|post)/|/\d{4}/\d{2}(/|$)|-(article|news)-")
        .expect("hardcoded regex is valid")
});

static EXCLUDED_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/(category|tag|author|page)/|\.(pdf|jpe?g|png|gif)$")
        .expect("hardcoded regex is valid")
});

/// Scans every hyperlink for plausible article links, in document order
pub fn harvest_links(document: &Html, base_url: &Url, scraped_at: DateTime<Utc>) -> Vec<ArticleRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let text = element_text(&anchor);
        let length = char_len(&text);
        if !(MIN_ANCHOR_TEXT..=MAX_ANCHOR_TEXT).contains(&length) {
            continue;
        }

        if let Some(class) = anchor.value().attr("class") {
            let class = class.to_lowercase();
            if CLASS_STOPLIST.iter().any(|stop| class.contains(stop)) {
                continue;
            }
        }

        let Some(url) = anchor
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        else {
            continue;
        };

        if !looks_like_article_url(&url) || !seen.insert(url.to_string()) {
            continue;
        }

        records.push(ArticleRecord::new(text, &url, scraped_at));
        if records.len() >= MAX_HARVESTED {
            break;
        }
    }

    records
}

/// Article-shaped path heuristic
///
/// Accepts known article path tokens or date segments, otherwise any path
/// at least four segments deep. Listing, taxonomy and binary-file paths are
/// always rejected.
pub fn looks_like_article_url(url: &Url) -> bool {
    let path = url.path().to_lowercase();

    if EXCLUDED_PATH.is_match(&path) {
        return false;
    }

    if ARTICLE_PATH.is_match(&path) {
        return true;
    }

    url.path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).count() >= 4)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    fn harvest(html: &str) -> Vec<ArticleRecord> {
        let document = Html::parse_document(html);
        harvest_links(&document, &url("https://site.example/"), Utc::now())
    }

    #[test]
    fn test_article_shaped_paths() {
        assert!(looks_like_article_url(&url("https://a.com/news/storm-hits")));
        assert!(looks_like_article_url(&url("https://a.com/2024/05/storm-hits")));
        assert!(looks_like_article_url(&url("https://a.com/world/storm-article-123")));
        assert!(looks_like_article_url(&url("https://a.com/a/b/c/d")));

        assert!(!looks_like_article_url(&url("https://a.com/about")));
        assert!(!looks_like_article_url(&url("https://a.com/a/b/c")));
    }

    #[test]
    fn test_excluded_paths() {
        assert!(!looks_like_article_url(&url("https://a.com/news/category/world")));
        assert!(!looks_like_article_url(&url("https://a.com/tag/politics/x/y")));
        assert!(!looks_like_article_url(&url("https://a.com/news/page/2")));
        assert!(!looks_like_article_url(&url("https://a.com/news/report.pdf")));
        assert!(!looks_like_article_url(&url("https://a.com/a/b/c/photo.JPG")));
    }

    #[test]
    fn test_harvest_filters_text_length() {
        let html = r#"
            <a href="/news/short">Too short</a>
            <a href="/news/long-enough">A headline long enough to keep</a>
        "#;
        let records = harvest(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "https://site.example/news/long-enough");
        assert_eq!(records[0].title, "A headline long enough to keep");
    }

    #[test]
    fn test_harvest_text_length_bounds_are_inclusive() {
        let html = format!(
            r#"<a href="/news/1">{}</a><a href="/news/2">{}</a>
               <a href="/news/3">{}</a><a href="/news/4">{}</a>"#,
            "a".repeat(14),
            "a".repeat(15),
            "b".repeat(200),
            "b".repeat(201)
        );
        let urls: Vec<_> = harvest(&html).into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            ["https://site.example/news/2", "https://site.example/news/3"]
        );
    }

    #[test]
    fn test_harvest_skips_stoplisted_class() {
        let html = r#"
            <a class="Main-Nav-Link" href="/news/navigation-entry">Navigation entry that is long</a>
            <a class="sidebar-item" href="/news/sidebar-entry">Sidebar entry that is long</a>
        "#;
        assert!(harvest(html).is_empty());
    }

    #[test]
    fn test_harvest_dedups_and_caps() {
        let mut html = String::new();
        html.push_str(r#"<a href="/news/dup">Duplicate headline text here</a>"#);
        html.push_str(r#"<a href="/news/dup">Duplicate headline text again</a>"#);
        for i in 0..80 {
            html.push_str(&format!(
                r#"<a href="/news/story-{i}">Headline number {i} for the harvest</a>"#
            ));
        }
        let records = harvest(&html);
        assert_eq!(records.len(), MAX_HARVESTED);
        assert_eq!(records[0].title, "Duplicate headline text here");
        assert_eq!(records[1].url, "https://site.example/news/story-0");
    }
}
