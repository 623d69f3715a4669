//! Output module for persisting harvested articles
//!
//! This module handles:
//! - Writing article batches as JSON documents or CSV tables
//! - Append mode, which merges a new batch into a previously written one
//!   using the article URL as identity

mod csv;
mod json;
mod traits;

pub use self::csv::{format_csv, CsvStore, CSV_HEADER};
pub use self::json::JsonStore;
pub use traits::{ArticleBatch, ArticleStore, OutputError, OutputFormat, OutputResult};

use crate::extractor::ArticleRecord;
use std::collections::HashSet;
use std::path::Path;

/// Returns the store implementation for a format
pub fn store_for(format: OutputFormat) -> &'static dyn ArticleStore {
    match format {
        OutputFormat::Json => &JsonStore,
        OutputFormat::Csv => &CsvStore,
    }
}

/// Merges a new batch into a prior one
///
/// Prior records are kept as they are, in their order. New records follow,
/// skipping any URL already present.
pub fn merge_batches(prior: Vec<ArticleRecord>, new: &[ArticleRecord]) -> Vec<ArticleRecord> {
    let mut seen: HashSet<String> = prior.iter().map(|a| a.url.clone()).collect();
    let mut merged = prior;

    for article in new {
        if seen.insert(article.url.clone()) {
            merged.push(article.clone());
        }
    }

    merged
}

/// Writes articles to `path` in the requested format
///
/// # Arguments
///
/// * `path` - Destination file
/// * `articles` - The crawl result
/// * `format` - JSON document or CSV table
/// * `append` - Merge with what is already in the file instead of replacing it
///
/// # Returns
///
/// * `Ok(usize)` - Number of articles now in the file
/// * `Err(OutputError)` - Reading the prior batch or writing failed
pub fn write_articles(
    path: &Path,
    articles: &[ArticleRecord],
    format: OutputFormat,
    append: bool,
) -> OutputResult<usize> {
    let store = store_for(format);

    let batch = if append {
        let prior = store.load(path)?;
        let prior_count = prior.len();
        let merged = merge_batches(prior, articles);
        tracing::info!(
            path = %path.display(),
            prior = prior_count,
            added = merged.len() - prior_count,
            "Appending to existing output"
        );
        merged
    } else {
        articles.to_vec()
    };

    store.save(path, &batch)?;
    tracing::info!(path = %path.display(), format = %format, count = batch.len(), "Wrote articles");

    Ok(batch.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;
    use url::Url;

    fn record(url: &str, title: &str) -> ArticleRecord {
        ArticleRecord::new(title, &Url::parse(url).unwrap(), Utc::now())
    }

    #[test]
    fn test_merge_keeps_prior_and_skips_known_urls() {
        let prior = vec![record("https://a.com/1", "Old one"), record("https://a.com/2", "Old two")];
        let new = vec![
            record("https://a.com/2", "New two"),
            record("https://a.com/3", "New three"),
            record("https://a.com/3", "New three again"),
        ];

        let merged = merge_batches(prior, &new);
        let titles: Vec<_> = merged.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Old one", "Old two", "New three"]);
    }

    #[test]
    fn test_overwrite_mode_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        write_articles(&path, &[record("https://a.com/1", "One")], OutputFormat::Json, false).unwrap();
        let count =
            write_articles(&path, &[record("https://a.com/2", "Two")], OutputFormat::Json, false).unwrap();

        assert_eq!(count, 1);
        assert_eq!(JsonStore.load(&path).unwrap()[0].title, "Two");
    }

    #[test]
    fn test_append_mode_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        write_articles(&path, &[record("https://a.com/1", "One")], OutputFormat::Json, true).unwrap();
        let count = write_articles(
            &path,
            &[record("https://a.com/1", "One again"), record("https://a.com/2", "Two")],
            OutputFormat::Json,
            true,
        )
        .unwrap();

        assert_eq!(count, 2);
        let loaded = JsonStore.load(&path).unwrap();
        assert_eq!(loaded[0].title, "One");
        assert_eq!(loaded[1].title, "Two");
    }

    #[test]
    fn test_append_mode_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        write_articles(&path, &[record("https://a.com/1", "One")], OutputFormat::Csv, true).unwrap();
        let count = write_articles(
            &path,
            &[record("https://a.com/2", "Two"), record("https://a.com/1", "Dup")],
            OutputFormat::Csv,
            true,
        )
        .unwrap();

        assert_eq!(count, 2);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 3);
        assert!(!content.contains("Dup"));
    }
}
