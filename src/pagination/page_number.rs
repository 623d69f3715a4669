//! Page numbers encoded in listing URLs

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

pub(crate) static PAGE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/page/(\d+)").expect("hardcoded regex is valid"));

pub(crate) static PAGE_QUERY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?page=(\d+)").expect("hardcoded regex is valid"));

pub(crate) static PAGE_QUERY_CONTINUED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&page=(\d+)").expect("hardcoded regex is valid"));

pub(crate) static P_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/p/(\d+)").expect("hardcoded regex is valid"));

/// The URL page-number patterns, in the order they are tried
pub(crate) fn page_patterns() -> [&'static Regex; 4] {
    [&*PAGE_SEGMENT, &*PAGE_QUERY, &*PAGE_QUERY_CONTINUED, &*P_SEGMENT]
}

/// Current page number of a listing URL, 1 when the URL carries none
///
/// # Examples
///
/// ```
/// use newsreel::pagination::current_page_number;
/// use url::Url;
///
/// let url = Url::parse("https://example.com/news/page/4").unwrap();
/// assert_eq!(current_page_number(&url), 4);
///
/// let url = Url::parse("https://example.com/news").unwrap();
/// assert_eq!(current_page_number(&url), 1);
/// ```
pub fn current_page_number(url: &Url) -> u32 {
    page_patterns()
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(url.as_str())
                .and_then(|caps| caps.get(1))
                .and_then(|digits| digits.as_str().parse::<u32>().ok())
        })
        .unwrap_or(1)
}
