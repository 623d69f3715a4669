//! JSON output
//!
//! Writes `{ scrapedAt, totalArticles, articles[] }` documents.

use crate::extractor::ArticleRecord;
use crate::output::traits::{ArticleBatch, ArticleStore, OutputResult};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStore;

impl ArticleStore for JsonStore {
    fn save(&self, path: &Path, articles: &[ArticleRecord]) -> OutputResult<()> {
        let batch = ArticleBatch::new(articles.to_vec());
        let json = serde_json::to_string_pretty(&batch)?;
        fs::write(path, json)?;
        Ok(())
    }

    fn load(&self, path: &Path) -> OutputResult<Vec<ArticleRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let batch: ArticleBatch = serde_json::from_str(&content)?;
        Ok(batch.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;
    use url::Url;

    fn record(url: &str) -> ArticleRecord {
        let mut record = ArticleRecord::new("Title", &Url::parse(url).unwrap(), Utc::now());
        record.author = "Desk".to_string();
        record
    }

    #[test]
    fn test_save_document_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");

        JsonStore.save(&path, &[record("https://a.com/1")]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["totalArticles"], 1);
        assert_eq!(value["articles"][0]["url"], "https://a.com/1");
        assert_eq!(value["articles"][0]["author"], "Desk");
        assert!(value["articles"][0]["scrapedAt"].is_string());
    }

    #[test]
    fn test_load_saved_batch() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let articles = vec![record("https://a.com/1"), record("https://a.com/2")];

        JsonStore.save(&path, &articles).unwrap();
        assert_eq!(JsonStore.load(&path).unwrap(), articles);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let loaded = JsonStore.load(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_invalid_json_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(JsonStore.load(&path).is_err());
    }
}
