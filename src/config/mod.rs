//! Configuration module for Newsreel
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to their defaults.
//!
//! # Example
//!
//! ```no_run
//! use newsreel::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("newsreel.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FetcherConfig, JobConfig, OutputConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
