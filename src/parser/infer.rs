//! Type inference for text cells.

use crate::model::Cell;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;

/// Turns raw CSV text into typed cells.
///
/// Numbers keep their source text so values like `02139` can be restored
/// later. Detection order is boolean, number, date, text.
#[derive(Debug, Clone)]
pub struct CellInference {
    number_regex: Regex,
    date_formats: Vec<String>,
}

impl CellInference {
    /// Create an inference pass with the given date layouts.
    pub fn new(date_formats: &[String]) -> Self {
        Self {
            number_regex: Regex::new(r"^[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?$").unwrap(),
            date_formats: date_formats.to_vec(),
        }
    }

    /// Infer a cell from one field of text.
    pub fn infer(&self, text: &str) -> Cell {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }

        if trimmed.eq_ignore_ascii_case("true") {
            return Cell::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Cell::Bool(false);
        }

        if self.number_regex.is_match(trimmed) {
            if let Ok(value) = trimmed.parse::<f64>() {
                if value.is_finite() {
                    return Cell::number_with_text(value, trimmed);
                }
            }
        }

        if let Some(value) = parse_date(trimmed, &self.date_formats) {
            return Cell::date(value, trimmed);
        }

        Cell::string(text)
    }
}

/// Parse text as a date or date-time using the first matching layout.
///
/// Date-only layouts produce midnight of that day. A `%Y` layout does not
/// claim two-digit years (`3/5/24`), leaving them to a `%y` layout.
pub fn parse_date(text: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let text = text.trim();
    formats.iter().find_map(|format| {
        let parsed = NaiveDateTime::parse_from_str(text, format).ok().or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
        if format.contains("%Y") && parsed.year() < 1000 {
            return None;
        }
        Some(parsed)
    })
}
