//! Input sources - builds the ordered URL list for a run
//!
//! The single `--url` value comes first, followed by file rows in file order.
//! A row contributes its first comma-separated field when that field starts
//! with `http://` or `https://`; every other row is skipped without notice.

use crate::error::{AppError, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

const URL_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Gather candidate URLs from a single value and/or a delimited file
pub fn collect_urls(url: Option<&str>, file: Option<&Path>) -> Result<Vec<String>> {
    let url = url.filter(|u| !u.is_empty());
    if url.is_none() && file.is_none() {
        return Err(AppError::NoInputProvided);
    }

    let mut urls = Vec::new();
    if let Some(url) = url {
        urls.push(url.to_string());
    }

    if let Some(path) = file {
        let contents = std::fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
        let rows = parse_url_rows(&contents);
        debug!(path = %path.display(), accepted = rows.len(), "Read URL file");
        urls.extend(rows);
    }

    if urls.is_empty() {
        return Err(AppError::EmptyUrlList);
    }
    Ok(urls)
}

/// Extract candidate URLs from delimited text, one per row
pub fn parse_url_rows(contents: &str) -> Vec<String> {
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    contents
        .lines()
        .filter_map(first_field)
        .filter(|field| URL_PREFIXES.iter().any(|p| field.starts_with(p)))
        .map(|field| field.trim().to_string())
        .collect()
}

/// Keep the first occurrence of every URL, preserving order
pub fn dedupe_in_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// First field of a row, unquoting `"..."` with `""` escapes
fn first_field(line: &str) -> Option<String> {
    let line = line.trim_end_matches('\r');
    if line.is_empty() {
        return None;
    }

    let Some(quoted) = line.strip_prefix('"') else {
        return Some(line.split(',').next().unwrap_or_default().to_string());
    };

    let mut field = String::new();
    let mut chars = quoted.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '"' {
            if chars.peek() == Some(&'"') {
                chars.next();
                field.push('"');
            } else {
                break;
            }
        } else {
            field.push(c);
        }
    }
    Some(field)
}
