//! The article record produced by extraction

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// One article discovered on a listing page
///
/// A record only exists with a non-empty `title` and an absolute http(s)
/// `url`; every other field may be empty. `url` is the identity used for
/// deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    /// Raw date as found in the markup, never parsed
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub author: String,
    pub scraped_at: DateTime<Utc>,
}

impl ArticleRecord {
    /// Creates a record with only the mandatory fields set
    pub fn new(title: impl Into<String>, url: &Url, scraped_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            url: url.to_string(),
            description: String::new(),
            image: String::new(),
            date: String::new(),
            author: String::new(),
            scraped_at,
        }
    }
}
