//! Output format traits and types
//!
//! This module defines the interface every output format implements and the
//! JSON document shape shared by writers and readers.

use crate::extractor::ArticleRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed CSV: {0}")]
    Csv(String),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Supported output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }
}

/// The persisted JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBatch {
    pub scraped_at: DateTime<Utc>,
    pub total_articles: usize,
    pub articles: Vec<ArticleRecord>,
}

impl ArticleBatch {
    pub fn new(articles: Vec<ArticleRecord>) -> Self {
        Self {
            scraped_at: Utc::now(),
            total_articles: articles.len(),
            articles,
        }
    }
}

/// A file format articles can be saved to and loaded back from
pub trait ArticleStore {
    /// Writes `articles` to `path`, replacing any existing content
    fn save(&self, path: &Path, articles: &[ArticleRecord]) -> OutputResult<()>;

    /// Reads a previously saved batch; a missing file is an empty batch
    fn load(&self, path: &Path) -> OutputResult<Vec<ArticleRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_batch_counts_articles() {
        let batch = ArticleBatch::new(vec![]);
        assert_eq!(batch.total_articles, 0);
    }

    #[test]
    fn test_batch_serializes_camel_case() {
        let json = serde_json::to_value(ArticleBatch::new(vec![])).unwrap();
        assert!(json.get("scrapedAt").is_some());
        assert_eq!(json["totalArticles"], 0);
        assert!(json["articles"].as_array().unwrap().is_empty());
    }
}
