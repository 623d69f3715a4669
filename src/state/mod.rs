//! Crawl state tracking
//!
//! This module defines the phases a crawl moves through and the state one
//! crawl owns while it runs.

pub mod crawl_phase;
pub mod crawl_state;

pub use crawl_phase::CrawlPhase;
pub use crawl_state::{CrawlState, TerminationReason};
