//! Date helpers for spreadsheet date cells

use chrono::{DateTime, NaiveDate};

/// Calendar part of a date cell (`2024-03-01T21:00:00.000Z` -> `2024-03-01`)
pub fn date_part(raw: &str) -> &str {
    let raw = raw.trim();
    raw.split('T').next().unwrap_or(raw)
}

/// Parse a date cell in any of the formats the sheet produces
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    let day = date_part(raw);
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(day, fmt) {
            return Some(date);
        }
    }
    None
}

/// Display form used by the record and release tables (`dd/mm/yyyy`)
pub fn display_date(raw: &str) -> String {
    if raw.trim().is_empty() {
        return "--".to_string();
    }
    match parse_date(raw) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => raw.to_string(),
    }
}
