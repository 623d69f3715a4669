//! Crawler module for multi-page article harvesting
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching of listing pages
//! - The sequential page-by-page crawl loop
//! - Interval jobs that rerun crawls and persist their output

mod coordinator;
mod fetcher;
mod scheduler;

pub use coordinator::{Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, fetch_url, Fetcher, HttpFetcher};
pub use scheduler::{JobHandle, JobRegistry};

use crate::config::{validate, Config, CrawlerConfig, OutputConfig};
use crate::output::write_articles;
use crate::url::parse_http_url;
use crate::NewsreelError;
use std::path::Path;
use std::sync::Arc;

/// Runs one crawl from a user-supplied URL
///
/// # Arguments
///
/// * `start_url` - The first listing page, must be absolute http(s)
/// * `config` - Crawler and fetcher settings
///
/// # Returns
///
/// * `Ok(CrawlOutcome)` - The crawl ended, see its termination reason
/// * `Err(NewsreelError)` - The URL is invalid or the first page failed
pub async fn crawl(start_url: &str, config: &Config) -> Result<CrawlOutcome, NewsreelError> {
    let start_url = parse_http_url(start_url)?;
    let fetcher = HttpFetcher::new(&config.fetcher)?;
    let coordinator = Coordinator::new(fetcher, config.crawler.clone());

    coordinator.crawl(start_url).await
}

/// Registers every `[[job]]` from the configuration
///
/// The configuration is validated first, so a config built in code gets the
/// same checks as one loaded from a file. All jobs share one HTTP client. Each run crawls with the job's
/// overrides applied and appends to the job's output file.
pub fn schedule_jobs(registry: &mut JobRegistry, config: &Config) -> Result<(), NewsreelError> {
    validate(config)?;
    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);

    for job in &config.jobs {
        let start_url = parse_http_url(&job.url)?;
        let crawler = job.crawler_config(&config.crawler);
        let output = job.output_config(&config.output);
        let fetcher = Arc::clone(&fetcher);
        let id = job.id().to_string();

        registry.schedule(job.id(), job.interval(), move || {
            run_job(
                id.clone(),
                Arc::clone(&fetcher),
                crawler.clone(),
                output.clone(),
                start_url.clone(),
            )
        })?;
    }

    Ok(())
}

/// One scheduled run: crawl, then persist
///
/// Failures are logged and never stop the job; the next tick tries again.
async fn run_job<F: Fetcher + Sync>(
    id: String,
    fetcher: F,
    crawler: CrawlerConfig,
    output: OutputConfig,
    start_url: url::Url,
) {
    let coordinator = Coordinator::new(fetcher, crawler);

    let outcome = match coordinator.crawl(start_url).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(job = %id, error = %e, "Scheduled crawl failed");
            return;
        }
    };

    match write_articles(
        Path::new(&output.path),
        &outcome.articles,
        output.format,
        output.append,
    ) {
        Ok(total) => tracing::info!(
            job = %id,
            found = outcome.articles.len(),
            total,
            reason = %outcome.termination,
            "Scheduled crawl saved"
        ),
        Err(e) => tracing::error!(job = %id, error = %e, "Failed to write scheduled crawl output"),
    }
}
