//! Next-page discovery strategies
//!
//! Tried in order by [`find_next_in_document`](super::find_next_in_document);
//! the first one to produce a URL wins.

use crate::pagination::page_number::{current_page_number, page_patterns};
use crate::url::resolve_link;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use url::Url;

/// Which strategy produced a pagination candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A link explicitly marked as "next"
    ExplicitLink,
    /// The nearest higher number in a numbered pagination widget
    NumberedLink,
    /// Page number substituted into the current URL, unverified
    UrlPattern,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExplicitLink => "explicit_link",
            Self::NumberedLink => "numbered_link",
            Self::UrlPattern => "url_pattern",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const NEXT_LINK_PATTERNS: &[&str] = &[
    "a.next",
    "a[rel='next']",
    ".pagination a.next",
    ".pagination .next",
    "[class*='pagination'] a[class*='next']",
    "[class*='paging'] a[class*='next']",
    "[class*='pagination'] [class*='next']",
    "[class*='paging'] [class*='next']",
];

static NEXT_LINK_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    NEXT_LINK_PATTERNS
        .iter()
        .map(|p| Selector::parse(p).expect("hardcoded selector is valid"))
        .collect()
});

static NUMBERED_LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("[class*='pagination'] a[href], [class*='paging'] a[href]")
        .expect("hardcoded selector is valid")
});

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("hardcoded selector is valid"));

/// Strategy 1: an element explicitly marked as the next link
///
/// A matched element without its own href (e.g. `<li class="next">`)
/// contributes its first descendant anchor instead.
pub fn explicit_next_link(document: &Html, current: &Url) -> Option<Url> {
    NEXT_LINK_SELECTORS.iter().find_map(|selector| {
        document
            .select(selector)
            .find_map(|element| usable_href(&element, current))
    })
}

fn usable_href(element: &ElementRef, current: &Url) -> Option<Url> {
    let href = match element.value().attr("href") {
        Some(href) => href,
        None => element
            .select(&ANCHOR_SELECTOR)
            .next()
            .and_then(|a| a.value().attr("href"))?,
    };

    resolve_link(href, current)
}

/// Strategy 2: the smallest page number strictly above the current one
///
/// Ordering is numeric, not by document position. Gaps in the widget are
/// jumped over rather than filled in.
pub fn numbered_next_link(document: &Html, current: &Url) -> Option<Url> {
    let current_page = current_page_number(current);

    document
        .select(&NUMBERED_LINK_SELECTOR)
        .filter_map(|anchor| {
            let number = anchor
                .text()
                .collect::<String>()
                .trim()
                .parse::<u32>()
                .ok()?;
            let url = resolve_link(anchor.value().attr("href")?, current)?;
            Some((number, url))
        })
        .filter(|(number, _)| *number > current_page)
        .min_by_key(|(number, _)| *number)
        .map(|(_, url)| url)
}

/// Strategy 3: substitute or append the next page number in the URL
///
/// Replacements are tried in the same order page numbers are read. When
/// none applies the number is appended: as a `/page/N` path segment for
/// URLs without a query string, otherwise as a `page=N` query parameter.
pub fn synthesize_next_url(current: &Url) -> Option<Url> {
    let next_page = current_page_number(current).saturating_add(1);
    let raw = current.as_str();

    let replacements = [
        format!("/page/{}", next_page),
        format!("?page={}", next_page),
        format!("&page={}", next_page),
        format!("/p/{}", next_page),
    ];

    for (pattern, replacement) in page_patterns().iter().zip(replacements.iter()) {
        let candidate = pattern.replace(raw, regex::NoExpand(replacement.as_str()));
        if candidate != raw {
            if let Ok(url) = Url::parse(&candidate) {
                return Some(url);
            }
        }
    }

    let mut url = current.clone();
    if current.query().is_none() {
        let path = current.path().trim_end_matches('/');
        url.set_path(&format!("{}/page/{}", path, next_page));
    } else {
        url.query_pairs_mut()
            .append_pair("page", &next_page.to_string());
    }

    (url != *current).then_some(url)
}
