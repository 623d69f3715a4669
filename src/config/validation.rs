use crate::config::types::{Config, CrawlerConfig, FetcherConfig, JobConfig, OutputConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    validate_jobs(&config.jobs)?;
    Ok(())
}

/// Validates crawl loop settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // delay_between_pages >= 0 is always true for u64

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Header values cannot carry control characters
    if config.user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent contains control characters: '{}'",
            config.user_agent.escape_debug()
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates scheduled job entries
fn validate_jobs(jobs: &[JobConfig]) -> Result<(), ConfigError> {
    let mut ids = HashSet::new();

    for job in jobs {
        validate_start_url(&job.url)?;

        if job.interval_secs < 1 {
            return Err(ConfigError::Validation(format!(
                "Job '{}' interval_secs must be >= 1",
                job.id()
            )));
        }

        if job.max_pages == Some(0) {
            return Err(ConfigError::Validation(format!(
                "Job '{}' max_pages must be >= 1",
                job.id()
            )));
        }

        if job.output.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "Job '{}' output path cannot be empty",
                job.id()
            )));
        }

        if job.id().trim().is_empty() {
            return Err(ConfigError::Validation("Job name cannot be empty".to_string()));
        }

        if !ids.insert(job.id()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate job name '{}'",
                job.id()
            )));
        }
    }

    Ok(())
}

/// Validates a crawl start URL: absolute, http or https
pub(crate) fn validate_start_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid URL '{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "URL '{}' must use http or https",
            raw
        )));
    }

    Ok(url)
}
