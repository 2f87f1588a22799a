//! CSV parsing for trade datasets.
//!
//! Two strategies share the helpers below:
//! - [`fixed`] reads the two known lifecycle datasets by column position;
//! - [`generic`] reads arbitrary uploaded sheets by matching header names.

pub mod fixed;
pub mod generic;

use crate::domain::error::DomainError;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::warn;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Header plus every non-blank data row. Whole-file problems are errors;
/// unreadable rows are logged and skipped.
pub(crate) fn read_sheet(text: &str) -> Result<(StringRecord, Vec<StringRecord>), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::EmptyInput);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.trim_start_matches('\u{feff}').as_bytes());

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        match result {
            Ok(record) if is_blank(&record) => {}
            Ok(record) => rows.push(record),
            Err(e) => warn!(row = i + 1, error = %e, "skipping unreadable CSV row"),
        }
    }

    if rows.is_empty() {
        return Err(DomainError::NoData);
    }
    Ok((headers, rows))
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|f| f.is_empty())
}

/// Calendar date from the formats seen in trade extracts. Timestamps keep their date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let date_part = raw
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Numeric cell, tolerating thousands separators and a leading currency symbol.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '£' | '€' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}
