// Batch file parsing for CSV and JSON idea uploads

use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ideon_agent::submission::IdeaSubmission;
use serde::Deserialize;
use std::collections::HashMap;

/// Parse an uploaded batch file into idea submissions.
///
/// Supported formats, selected by file extension:
/// - `.csv` with a header row. Column aliases are accepted:
///   `idea title`/`title`, `description`, `name`/`author`,
///   `domain`/`category`, `timestamp`.
/// - `.json` holding an array of submission objects.
///
/// Rows without a description are skipped.
pub fn parse_ideas_file(filename: &str, bytes: &[u8]) -> Result<Vec<IdeaSubmission>, ApiError> {
    let extension = filename
        .rsplit('.')
        .next()
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => parse_csv(bytes),
        "json" => parse_json(bytes),
        other => Err(ApiError::Validation(format!(
            "Unsupported file type: .{} (expected .csv or .json)",
            other
        ))),
    }
}

fn parse_csv(bytes: &[u8]) -> Result<Vec<IdeaSubmission>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ApiError::Validation(format!("Invalid CSV header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();

    let column = |aliases: &[&str]| -> Option<usize> {
        headers
            .iter()
            .position(|h| aliases.contains(&h.as_str()))
    };

    let title_col = column(&["idea title", "title"]);
    let description_col = column(&["description"])
        .ok_or_else(|| ApiError::Validation("CSV is missing a 'description' column".to_string()))?;
    let author_col = column(&["name", "author"]);
    let category_col = column(&["domain", "category"]);
    let timestamp_col = column(&["timestamp"]);

    let mut submissions = Vec::new();

    for record in reader.records() {
        let record =
            record.map_err(|e| ApiError::Validation(format!("Invalid CSV row: {}", e)))?;

        let field = |col: Option<usize>| -> Option<String> {
            col.and_then(|i| record.get(i))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let Some(description) = field(Some(description_col)) else {
            continue;
        };

        let mut submission = IdeaSubmission::from_description(description);
        if let Some(title) = field(title_col) {
            submission.title = title;
        }
        if let Some(author) = field(author_col) {
            submission.author = author;
        }
        if let Some(category) = field(category_col) {
            submission.category = category;
        }
        submission.timestamp = field(timestamp_col).and_then(|raw| parse_timestamp(&raw));

        submissions.push(submission);
    }

    Ok(submissions)
}

#[derive(Debug, Deserialize)]
struct JsonRow {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(flatten)]
    _extra: HashMap<String, serde_json::Value>,
}

fn parse_json(bytes: &[u8]) -> Result<Vec<IdeaSubmission>, ApiError> {
    let rows: Vec<JsonRow> = serde_json::from_slice(bytes)
        .map_err(|e| ApiError::Validation(format!("Invalid JSON array: {}", e)))?;

    let mut submissions = Vec::new();

    for row in rows {
        let Some(description) = row
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
        else {
            continue;
        };

        let mut submission = IdeaSubmission::from_description(description);
        if let Some(title) = row.title.filter(|t| !t.trim().is_empty()) {
            submission.title = title.trim().to_string();
        }
        if let Some(author) = row.author.or(row.name).filter(|a| !a.trim().is_empty()) {
            submission.author = author.trim().to_string();
        }
        if let Some(category) = row
            .category
            .or(row.domain)
            .filter(|c| !c.trim().is_empty())
        {
            submission.category = category.trim().to_string();
        }
        submission.timestamp = row.timestamp.and_then(|raw| parse_timestamp(raw.trim()));

        submissions.push(submission);
    }

    Ok(submissions)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
