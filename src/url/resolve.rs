use crate::UrlError;
use url::Url;

/// Resolves a raw `href` against a base URL
///
/// Returns None if the link cannot be used:
/// - empty or fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` pseudo-links
/// - hrefs the URL parser rejects
/// - anything that is not HTTP(S) after resolution
///
/// # Examples
///
/// ```
/// use url::Url;
/// use newsreel::url::resolve_link;
///
/// let base = Url::parse("https://example.com/news/").unwrap();
/// let url = resolve_link("story-1", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/news/story-1");
/// assert!(resolve_link("javascript:void(0)", &base).is_none());
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    base_url.join(href).ok().filter(is_http_url)
}

/// Returns true for absolute http/https URLs with a host
pub fn is_http_url(url: &Url) -> bool {
    (url.scheme() == "http" || url.scheme() == "https") && url.host_str().is_some()
}

/// Parses a user-supplied absolute URL, accepting only http and https
pub fn parse_http_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
