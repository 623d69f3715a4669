use crate::output::OutputFormat;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure for Newsreel
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "job")]
    pub jobs: Vec<JobConfig>,
}

/// Crawl loop behavior
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of listing pages fetched in one crawl
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Politeness pause between consecutive pages (milliseconds)
    #[serde(rename = "delay-between-pages", default = "default_delay")]
    pub delay_between_pages: u64,

    /// Refuse pagination candidates on a different host
    #[serde(rename = "same-domain-only", default = "default_true")]
    pub same_domain_only: bool,

    /// Follow "next page" links at all
    #[serde(default = "default_true")]
    pub paginate: bool,
}

impl CrawlerConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_between_pages)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            delay_between_pages: default_delay(),
            same_domain_only: true,
            paginate: true,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Destination file
    #[serde(default = "default_output_path")]
    pub path: String,

    /// Merge into an existing file instead of overwriting it
    #[serde(default)]
    pub append: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            path: default_output_path(),
            append: false,
        }
    }
}

impl OutputConfig {
    /// Changes the format; a default destination takes the new extension
    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
        if self.has_default_path() {
            self.path = Path::new(&self.path)
                .with_extension(format.as_str())
                .display()
                .to_string();
        }
    }

    fn has_default_path(&self) -> bool {
        Path::new(&self.path).with_extension("json") == Path::new(&default_output_path())
    }
}

/// A crawl that runs on a fixed interval
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Registry key; defaults to the URL
    #[serde(default)]
    pub name: Option<String>,

    /// Listing page to start from
    pub url: String,

    /// Seconds between runs
    #[serde(rename = "interval-secs")]
    pub interval_secs: u64,

    /// Overrides `crawler.max-pages` for this job
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Overrides `crawler.paginate` for this job
    #[serde(default)]
    pub paginate: Option<bool>,

    /// Overrides `output.path` for this job
    #[serde(default)]
    pub output: Option<String>,
}

impl JobConfig {
    pub fn id(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Output settings for this job, always in append mode so repeated
    /// runs accumulate instead of overwriting each other
    pub fn output_config(&self, base: &OutputConfig) -> OutputConfig {
        OutputConfig {
            path: self.output.clone().unwrap_or_else(|| base.path.clone()),
            append: true,
            ..base.clone()
        }
    }

    /// Applies this job's overrides on top of the shared crawler settings
    pub fn crawler_config(&self, base: &CrawlerConfig) -> CrawlerConfig {
        CrawlerConfig {
            max_pages: self.max_pages.unwrap_or(base.max_pages),
            paginate: self.paginate.unwrap_or(base.paginate),
            ..base.clone()
        }
    }
}

fn default_max_pages() -> u32 {
    5
}

fn default_delay() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (compatible; newsreel/{})",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_timeout() -> u64 {
    30
}

fn default_output_path() -> String {
    "articles.json".to_string()
}
