//! Crawler coordinator - the page-by-page crawl loop
//!
//! One crawl starts at a listing URL and repeats, strictly in sequence:
//! fetch the page, extract articles, merge them into the crawl's
//! accumulator, discover and validate the next page, pause, and continue.
//! Page N+1 is never fetched before page N is fully processed.
//!
//! # Termination
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | First page fetch fails | `Err(NewsreelError::Fetch)` |
//! | Later page fetch fails | `Ok`, articles so far, `FetchFailed` |
//! | Page limit reached | `Ok`, `PageLimit` |
//! | No candidate found | `Ok`, `NoNextPage` |
//! | Candidate rejected by validation | `Ok`, `InvalidCandidate` |
//! | Pagination disabled | `Ok` after one page, `PaginationDisabled` |

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::extractor::{extract_from_document, ArticleRecord};
use crate::pagination::{find_next_in_document, PaginationCandidate};
use crate::state::{CrawlPhase, CrawlState, TerminationReason};
use crate::NewsreelError;
use scraper::Html;
use url::Url;

/// The result of one completed crawl
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    /// Where the crawl started
    pub start_url: Url,
    /// Every distinct article found, in discovery order
    pub articles: Vec<ArticleRecord>,
    /// Pages fetched successfully
    pub pages_visited: u32,
    pub termination: TerminationReason,
}

impl CrawlOutcome {
    /// True when a later page failed and the corpus may be partial
    pub fn stopped_early(&self) -> bool {
        matches!(self.termination, TerminationReason::FetchFailed { .. })
    }
}

/// Main crawl coordinator
pub struct Coordinator<F> {
    fetcher: F,
    config: CrawlerConfig,
}

impl<F: Fetcher + Sync> Coordinator<F> {
    /// Creates a coordinator around a fetcher and crawl settings
    pub fn new(fetcher: F, config: CrawlerConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Runs one crawl from `start_url`
    ///
    /// Each call owns a fresh [`CrawlState`], so concurrent crawls on the
    /// same coordinator share nothing mutable.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlOutcome)` - The crawl ended, possibly early after a
    ///   later page failed
    /// * `Err(NewsreelError)` - The first page could not be fetched
    pub async fn crawl(&self, start_url: Url) -> Result<CrawlOutcome, NewsreelError> {
        let max_pages = self.config.max_pages.max(1);
        let mut state = CrawlState::new(start_url.clone());

        tracing::info!(
            url = %start_url,
            max_pages,
            paginate = self.config.paginate,
            "Starting crawl"
        );

        loop {
            state.transition(CrawlPhase::FetchingPage)?;
            let url = state.current_url().clone();

            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) if state.pages_visited() == 0 => {
                    tracing::error!(url = %url, error = %e, "First page fetch failed");
                    state.transition(CrawlPhase::Terminated)?;
                    return Err(e.into());
                }
                Err(e) => {
                    tracing::warn!(
                        url = %url,
                        error = %e,
                        "Page fetch failed, keeping articles collected so far"
                    );
                    state.terminate(TerminationReason::FetchFailed {
                        url: url.to_string(),
                        error: e.to_string(),
                    })?;
                    break;
                }
            };
            state.record_page();

            state.transition(CrawlPhase::Extracting)?;
            let (records, candidate) = scan_page(&html, &url, self.config.paginate);
            let found = records.len();
            let added = state.merge(records);

            tracing::info!(
                page = state.pages_visited(),
                url = %url,
                found,
                added,
                total = state.articles().len(),
                "Processed page"
            );

            if !self.config.paginate {
                state.terminate(TerminationReason::PaginationDisabled)?;
                break;
            }

            state.transition(CrawlPhase::DiscoveringNext)?;

            if state.pages_visited() >= max_pages {
                tracing::info!(max_pages, "Page limit reached");
                state.terminate(TerminationReason::PageLimit)?;
                break;
            }

            let Some(candidate) = candidate else {
                tracing::info!(url = %url, "No next page found");
                state.terminate(TerminationReason::NoNextPage)?;
                break;
            };

            if !candidate.is_valid(self.config.same_domain_only) {
                tracing::info!(
                    candidate = %candidate.url,
                    strategy = %candidate.strategy,
                    "Next page candidate rejected"
                );
                state.terminate(TerminationReason::InvalidCandidate {
                    url: candidate.url.to_string(),
                })?;
                break;
            }

            state.transition(CrawlPhase::Delaying)?;
            let delay = self.config.delay();
            if !delay.is_zero() {
                tracing::debug!(delay_ms = delay.as_millis() as u64, "Waiting before next page");
                tokio::time::sleep(delay).await;
            }

            tracing::debug!(next = %candidate.url, strategy = %candidate.strategy, "Following next page");
            state.advance_to(candidate.url);
        }

        let termination = state
            .termination()
            .cloned()
            .unwrap_or(TerminationReason::NoNextPage);
        let pages_visited = state.pages_visited();
        let articles = state.into_articles();

        tracing::info!(
            url = %start_url,
            pages = pages_visited,
            articles = articles.len(),
            reason = %termination,
            "Crawl finished"
        );

        Ok(CrawlOutcome {
            start_url,
            articles,
            pages_visited,
            termination,
        })
    }
}

/// Parses a page once and runs both engines over it
///
/// Kept synchronous so the parsed document never lives across an await.
fn scan_page(
    html: &str,
    url: &Url,
    paginate: bool,
) -> (Vec<ArticleRecord>, Option<PaginationCandidate>) {
    let document = Html::parse_document(html);
    let records = extract_from_document(&document, url);
    let candidate = if paginate {
        find_next_in_document(&document, url)
    } else {
        None
    };
    (records, candidate)
}
