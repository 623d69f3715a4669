//! Candidate validation
//!
//! URL-pattern synthesis can always produce *some* URL, so every candidate
//! is checked against the page it came from before the crawl follows it.

use crate::url::same_host;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static PAGED_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(page|p)/\d+/?$").expect("hardcoded regex is valid"));

/// Decides whether `candidate` may be followed from `current`
///
/// # Rules
///
/// | Condition | Result |
/// |-----------|--------|
/// | `same_domain_only` and hosts differ | reject |
/// | candidate identical to current | reject |
/// | candidate path starts with the current listing path | accept |
/// | candidate path contains `page` | accept |
/// | candidate query contains `page` | accept |
/// | otherwise | reject |
///
/// The listing path is the current path with any trailing `/page/N` or
/// `/p/N` removed.
///
/// # Examples
///
/// ```
/// use newsreel::pagination::is_valid_next;
/// use url::Url;
///
/// let current = Url::parse("https://a.com/p/1").unwrap();
/// assert!(!is_valid_next(&current, &current, true));
///
/// let other = Url::parse("https://b.com/p/2").unwrap();
/// assert!(!is_valid_next(&current, &other, true));
/// ```
pub fn is_valid_next(current: &Url, candidate: &Url, same_domain_only: bool) -> bool {
    if same_domain_only && !same_host(current, candidate) {
        tracing::debug!(%candidate, "Rejected pagination candidate on another host");
        return false;
    }

    if candidate.as_str() == current.as_str() {
        tracing::debug!(%candidate, "Rejected pagination candidate identical to current page");
        return false;
    }

    let listing_path = PAGED_SUFFIX.replace(current.path(), "");
    let candidate_path = candidate.path();

    let related = candidate_path.starts_with(listing_path.as_ref())
        || candidate_path.contains("page")
        || candidate.query().map_or(false, |q| q.contains("page"));

    if !related {
        tracing::debug!(%candidate, %current, "Rejected unrelated pagination candidate");
    }

    related
}
