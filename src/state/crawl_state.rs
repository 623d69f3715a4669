use crate::extractor::ArticleRecord;
use crate::state::CrawlPhase;
use crate::NewsreelError;
use std::collections::HashSet;
use std::fmt;
use url::Url;

/// Why a crawl stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The last page had no next-page candidate
    NoNextPage,
    /// The configured page limit was reached
    PageLimit,
    /// The candidate failed validation
    InvalidCandidate { url: String },
    /// A page after the first could not be fetched
    FetchFailed { url: String, error: String },
    /// Pagination was switched off for this crawl
    PaginationDisabled,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoNextPage => write!(f, "no next page"),
            Self::PageLimit => write!(f, "page limit reached"),
            Self::InvalidCandidate { url } => write!(f, "rejected next page {}", url),
            Self::FetchFailed { url, error } => write!(f, "fetch of {} failed: {}", url, error),
            Self::PaginationDisabled => write!(f, "pagination disabled"),
        }
    }
}

/// Mutable state of one crawl
///
/// Owned by a single crawl for its whole lifetime and never shared. The
/// seen-URL set only grows, and `articles` keeps discovery order.
#[derive(Debug)]
pub struct CrawlState {
    current_url: Url,
    pages_visited: u32,
    seen_urls: HashSet<String>,
    articles: Vec<ArticleRecord>,
    phase: CrawlPhase,
    termination: Option<TerminationReason>,
}

impl CrawlState {
    pub fn new(start_url: Url) -> Self {
        Self {
            current_url: start_url,
            pages_visited: 0,
            seen_urls: HashSet::new(),
            articles: Vec::new(),
            phase: CrawlPhase::Init,
            termination: None,
        }
    }

    pub fn current_url(&self) -> &Url {
        &self.current_url
    }

    pub fn pages_visited(&self) -> u32 {
        self.pages_visited
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn articles(&self) -> &[ArticleRecord] {
        &self.articles
    }

    pub fn termination(&self) -> Option<&TerminationReason> {
        self.termination.as_ref()
    }

    /// Moves to `next`, refusing transitions the crawl graph does not allow
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), NewsreelError> {
        if !self.phase.can_transition_to(next) {
            return Err(NewsreelError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Counts a successfully fetched page
    pub fn record_page(&mut self) {
        self.pages_visited += 1;
    }

    /// Adds records whose URL has not been seen in this crawl
    ///
    /// Returns how many were new.
    pub fn merge(&mut self, records: Vec<ArticleRecord>) -> usize {
        let before = self.articles.len();
        for record in records {
            if self.seen_urls.insert(record.url.clone()) {
                self.articles.push(record);
            }
        }
        self.articles.len() - before
    }

    /// Points the crawl at the next page
    pub fn advance_to(&mut self, next_url: Url) {
        self.current_url = next_url;
    }

    /// Ends the crawl with the given reason
    pub fn terminate(&mut self, reason: TerminationReason) -> Result<(), NewsreelError> {
        self.transition(CrawlPhase::Terminated)?;
        self.termination = Some(reason);
        Ok(())
    }

    /// Consumes the state, yielding the accumulated articles
    pub fn into_articles(self) -> Vec<ArticleRecord> {
        self.articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(url: &str, title: &str) -> ArticleRecord {
        ArticleRecord::new(title, &Url::parse(url).unwrap(), Utc::now())
    }

    fn new_state() -> CrawlState {
        CrawlState::new(Url::parse("https://a.com/news").unwrap())
    }

    #[test]
    fn test_new_state() {
        let state = new_state();
        assert_eq!(state.phase(), CrawlPhase::Init);
        assert_eq!(state.pages_visited(), 0);
        assert!(state.articles().is_empty());
        assert!(state.termination().is_none());
    }

    #[test]
    fn test_merge_drops_duplicates_across_pages() {
        let mut state = new_state();
        let first = state.merge(vec![
            record("https://a.com/news/1", "One"),
            record("https://a.com/news/2", "Two"),
        ]);
        let second = state.merge(vec![
            record("https://a.com/news/2", "Two again"),
            record("https://a.com/news/3", "Three"),
        ]);

        assert_eq!(first, 2);
        assert_eq!(second, 1);
        let titles: Vec<_> = state.articles().iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two", "Three"]);
    }

    #[test]
    fn test_transition_rejects_illegal_move() {
        let mut state = new_state();
        let err = state.transition(CrawlPhase::Delaying).unwrap_err();
        assert!(matches!(
            err,
            NewsreelError::InvalidTransition {
                from: CrawlPhase::Init,
                to: CrawlPhase::Delaying
            }
        ));
        assert_eq!(state.phase(), CrawlPhase::Init);
    }

    #[test]
    fn test_terminate_records_reason() {
        let mut state = new_state();
        state.transition(CrawlPhase::FetchingPage).unwrap();
        state.transition(CrawlPhase::Extracting).unwrap();
        state.transition(CrawlPhase::DiscoveringNext).unwrap();
        state.terminate(TerminationReason::PageLimit).unwrap();

        assert_eq!(state.phase(), CrawlPhase::Terminated);
        assert_eq!(state.termination(), Some(&TerminationReason::PageLimit));
        assert!(state.terminate(TerminationReason::NoNextPage).is_err());
    }

    #[test]
    fn test_advance_to() {
        let mut state = new_state();
        state.record_page();
        state.advance_to(Url::parse("https://a.com/news/page/2").unwrap());
        assert_eq!(state.current_url().as_str(), "https://a.com/news/page/2");
        assert_eq!(state.pages_visited(), 1);
    }
}
