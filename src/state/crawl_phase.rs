/// Crawl phase definitions
///
/// This module defines the states a single crawl moves through and which
/// moves between them are legal.
use std::fmt;

/// The current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Nothing fetched yet
    Init,

    /// Fetching the current page
    FetchingPage,

    /// Pulling article records out of the fetched markup
    Extracting,

    /// Looking for and validating the next page
    DiscoveringNext,

    /// Politeness pause before the next fetch
    Delaying,

    /// The crawl is over
    Terminated,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// `FetchingPage -> Terminated` covers fetch failures and
    /// `Extracting -> Terminated` covers single-page crawls.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::FetchingPage)
                | (Self::FetchingPage, Self::Extracting)
                | (Self::FetchingPage, Self::Terminated)
                | (Self::Extracting, Self::DiscoveringNext)
                | (Self::Extracting, Self::Terminated)
                | (Self::DiscoveringNext, Self::Delaying)
                | (Self::DiscoveringNext, Self::Terminated)
                | (Self::Delaying, Self::FetchingPage)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::FetchingPage => "fetching_page",
            Self::Extracting => "extracting",
            Self::DiscoveringNext => "discovering_next",
            Self::Delaying => "delaying",
            Self::Terminated => "terminated",
        }
    }

    /// Returns all crawl phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Init,
            Self::FetchingPage,
            Self::Extracting,
            Self::DiscoveringNext,
            Self::Delaying,
            Self::Terminated,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
