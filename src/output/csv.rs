//! CSV output
//!
//! One row per article under a fixed header. Quoting follows RFC 4180:
//! fields containing a quote, comma, CR or LF are wrapped in quotes and
//! inner quotes are doubled.

use crate::extractor::ArticleRecord;
use crate::output::traits::{ArticleStore, OutputError, OutputResult};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::Path;

pub const CSV_HEADER: [&str; 7] = [
    "Title",
    "URL",
    "Description",
    "Image URL",
    "Date",
    "Author",
    "Scraped At",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvStore;

impl ArticleStore for CsvStore {
    fn save(&self, path: &Path, articles: &[ArticleRecord]) -> OutputResult<()> {
        fs::write(path, format_csv(articles))?;
        Ok(())
    }

    fn load(&self, path: &Path) -> OutputResult<Vec<ArticleRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        let mut rows = parse_rows(&content)?.into_iter();

        match rows.next() {
            Some(header) if header == CSV_HEADER => {}
            Some(header) => {
                return Err(OutputError::Csv(format!(
                    "unexpected header: {}",
                    header.join(",")
                )))
            }
            None => return Ok(Vec::new()),
        }

        rows.enumerate()
            .map(|(idx, row)| row_to_record(idx + 2, row))
            .collect()
    }
}

/// Formats articles as CSV text, header included
pub fn format_csv(articles: &[ArticleRecord]) -> String {
    let mut csv = String::new();
    push_row(&mut csv, CSV_HEADER.iter().copied());

    for article in articles {
        let scraped_at = article.scraped_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        push_row(
            &mut csv,
            [
                article.title.as_str(),
                article.url.as_str(),
                article.description.as_str(),
                article.image.as_str(),
                article.date.as_str(),
                article.author.as_str(),
                scraped_at.as_str(),
            ],
        );
    }

    csv
}

fn push_row<'a>(csv: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let escaped: Vec<String> = fields.into_iter().map(escape_field).collect();
    csv.push_str(&escaped.join(","));
    csv.push_str("\r\n");
}

fn escape_field(field: &str) -> String {
    if field.contains(['"', ',', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Splits CSV text into rows of unescaped fields
fn parse_rows(content: &str) -> OutputResult<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => row.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(OutputError::Csv("unterminated quoted field".to_string()));
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}

fn row_to_record(line: usize, row: Vec<String>) -> OutputResult<ArticleRecord> {
    let [title, url, description, image, date, author, scraped_at]: [String; 7] =
        row.try_into().map_err(|row: Vec<String>| {
            OutputError::Csv(format!("row {} has {} fields, expected 7", line, row.len()))
        })?;

    // Rows from other tools may carry no usable timestamp
    let scraped_at = DateTime::parse_from_rfc3339(&scraped_at)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    Ok(ArticleRecord {
        title,
        url,
        description,
        image,
        date,
        author,
        scraped_at,
    })
}
