//! Newsreel main entry point
//!
//! This is the command-line interface for the Newsreel article harvester.

use anyhow::Context;
use clap::Parser;
use newsreel::config::{load_config, validate, Config};
use newsreel::crawler::{crawl, schedule_jobs, JobRegistry};
use newsreel::output::{write_articles, OutputFormat};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Newsreel: a heuristic news-article harvester
///
/// Newsreel extracts article records from news listing pages without any
/// site-specific configuration and follows the site's pagination to build
/// a deduplicated article list across pages.
#[derive(Parser, Debug)]
#[command(name = "newsreel")]
#[command(version = "1.0.0")]
#[command(about = "A heuristic news-article harvester", long_about = None)]
struct Cli {
    /// Listing page to start from
    #[arg(value_name = "URL", required_unless_present = "schedule")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to crawl
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pages: Option<u32>,

    /// Only process the first page
    #[arg(long)]
    no_paginate: bool,

    /// Pause between pages in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Follow next-page links onto other hosts
    #[arg(long)]
    allow_cross_domain: bool,

    /// Output format (json or csv)
    #[arg(short, long, value_name = "FORMAT")]
    format: Option<OutputFormat>,

    /// Output file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Merge into the existing output file
    #[arg(long)]
    append: bool,

    /// Run the configured [[job]] entries until interrupted
    #[arg(long, requires = "config", conflicts_with = "url")]
    schedule: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };
    apply_overrides(&mut config, &cli);
    validate(&config).context("invalid settings")?;

    if cli.schedule {
        return run_scheduled(&config).await;
    }

    // clap guarantees a URL when not scheduling
    let url = cli.url.as_deref().unwrap_or_default();
    run_once(url, &config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("newsreel=info,warn"),
            1 => EnvFilter::new("newsreel=debug,info"),
            2 => EnvFilter::new("newsreel=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Command-line flags win over the configuration file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(pages) = cli.pages {
        config.crawler.max_pages = pages;
    }
    if cli.no_paginate {
        config.crawler.paginate = false;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_between_pages = delay;
    }
    if cli.allow_cross_domain {
        config.crawler.same_domain_only = false;
    }
    if let Some(format) = cli.format {
        config.output.set_format(format);
    }
    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }
    if cli.append {
        config.output.append = true;
    }
}

/// Crawls one URL and writes the result
async fn run_once(url: &str, config: &Config, quiet: bool) -> anyhow::Result<()> {
    let outcome = match crawl(url, config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let path = Path::new(&config.output.path);
    let total = write_articles(
        path,
        &outcome.articles,
        config.output.format,
        config.output.append,
    )
    .with_context(|| format!("failed to write {}", path.display()))?;

    if !quiet {
        println!("=== Newsreel Crawl Summary ===\n");
        println!("Start URL:     {}", outcome.start_url);
        println!("Pages crawled: {}", outcome.pages_visited);
        println!("Articles:      {}", outcome.articles.len());
        println!("Stopped:       {}", outcome.termination);
        println!("\n✓ {} articles in {} ({})", total, path.display(), config.output.format);
    }

    Ok(())
}

/// Runs every configured job until Ctrl-C
async fn run_scheduled(config: &Config) -> anyhow::Result<()> {
    if config.jobs.is_empty() {
        anyhow::bail!("no [[job]] entries in configuration");
    }

    let mut registry = JobRegistry::new();
    schedule_jobs(&mut registry, config)?;
    tracing::info!(jobs = ?registry.job_ids(), "Scheduler running, press Ctrl-C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;

    tracing::info!("Shutting down {} jobs", registry.len());
    registry.shutdown();

    Ok(())
}
