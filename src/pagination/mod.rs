//! Pagination discovery
//!
//! Finds the "next page" of a paginated listing through a cascade of
//! strategies, and validates candidates before a crawl may follow them.
//!
//! # Strategy Cascade
//!
//! 1. Explicit next links (`a.next`, `rel="next"`, pagination containers)
//! 2. Numbered pagination links (smallest number above the current page)
//! 3. URL-pattern synthesis (`/page/N`, `?page=N`, `&page=N`, `/p/N`)
//!
//! The first strategy that yields a URL wins; results are never merged.

mod page_number;
mod strategies;
mod validate;

pub use page_number::current_page_number;
pub use strategies::{explicit_next_link, numbered_next_link, synthesize_next_url, Strategy};
pub use validate::is_valid_next;

use scraper::Html;
use url::Url;

/// A URL believed to be the next page, with the page it was found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationCandidate {
    pub url: Url,
    pub source: Url,
    pub strategy: Strategy,
}

impl PaginationCandidate {
    /// Validates this candidate against its source page
    pub fn is_valid(&self, same_domain_only: bool) -> bool {
        is_valid_next(&self.source, &self.url, same_domain_only)
    }
}

/// Finds the next-page candidate of an HTML listing
///
/// # Example
///
/// ```
/// use newsreel::pagination::{find_next_page, Strategy};
/// use url::Url;
///
/// let html = r#"<a rel="next" href="/news?page=2">Next</a>"#;
/// let current = Url::parse("https://example.com/news").unwrap();
/// let candidate = find_next_page(html, &current).unwrap();
/// assert_eq!(candidate.url.as_str(), "https://example.com/news?page=2");
/// assert_eq!(candidate.strategy, Strategy::ExplicitLink);
/// ```
pub fn find_next_page(html: &str, current: &Url) -> Option<PaginationCandidate> {
    let document = Html::parse_document(html);
    find_next_in_document(&document, current)
}

/// Same as [`find_next_page`] for an already parsed document
pub fn find_next_in_document(document: &Html, current: &Url) -> Option<PaginationCandidate> {
    let (url, strategy) = explicit_next_link(document, current)
        .map(|url| (url, Strategy::ExplicitLink))
        .or_else(|| numbered_next_link(document, current).map(|url| (url, Strategy::NumberedLink)))
        .or_else(|| synthesize_next_url(current).map(|url| (url, Strategy::UrlPattern)))?;

    tracing::debug!(%url, %strategy, "Found pagination candidate");

    Some(PaginationCandidate {
        url,
        source: current.clone(),
        strategy,
    })
}
