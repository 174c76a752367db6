//! Row normalization.
//!
//! Converts [`RawRow`]s into [`NormalizedRow`]s whose values can be compared
//! directly against the schema's declared types:
//!
//! - every date cell becomes an ISO `YYYY-MM-DD` string built from its
//!   calendar fields (no timezone conversion);
//! - fields listed in the [`NormalizationTable`] get their specific
//!   [`Coercion`];
//! - everything else passes through unchanged.
//!
//! Missing fields are never an error here. They stay absent and the
//! validator reports them.

mod rules;

pub use rules::{Coercion, NormalizationTable};

use crate::model::{Cell, NormalizedRow, Page, RawRow};
use crate::parser::{parse_date, DEFAULT_DATE_FORMATS};
use chrono::NaiveDateTime;
use regex::Regex;
use serde_json::{Number, Value};

/// Applies a [`NormalizationTable`] to extracted rows.
#[derive(Debug, Clone)]
pub struct Normalizer {
    table: NormalizationTable,
    date_formats: Vec<String>,
    bare_time_regex: Regex,
}

impl Normalizer {
    /// Create a normalizer for a table.
    pub fn new(table: NormalizationTable) -> Self {
        Self {
            table,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
            bare_time_regex: Regex::new(r"^\d{1,2}:\d{2}$").unwrap(),
        }
    }

    /// Set the layouts tried for [`Coercion::CalendarDate`] text.
    pub fn with_date_formats(mut self, formats: Vec<String>) -> Self {
        self.date_formats = formats;
        self
    }

    /// Get the coercion table.
    pub fn table(&self) -> &NormalizationTable {
        &self.table
    }

    /// Extract and normalize every data row of a page.
    pub fn normalize_page(&self, page: &Page, skip_blank_rows: bool) -> Vec<NormalizedRow> {
        let rows = page.rows(skip_blank_rows);
        log::debug!("Normalizing {} rows from sheet '{}'", rows.len(), page.name);
        self.normalize_rows(&rows)
    }

    /// Normalize a sequence of rows, preserving order.
    pub fn normalize_rows(&self, rows: &[RawRow]) -> Vec<NormalizedRow> {
        rows.iter().map(|row| self.normalize_row(row)).collect()
    }

    /// Normalize one row.
    pub fn normalize_row(&self, row: &RawRow) -> NormalizedRow {
        let mut normalized = NormalizedRow::new(row.index, row.source_line);

        for (field, cell) in row.iter() {
            if let Cell::Date { value, .. } = cell {
                normalized.originals.insert(field.to_string(), *value);
            }
            if let Some(value) = self.coerce(field, cell) {
                normalized.values.insert(field.to_string(), value);
            }
        }

        normalized
    }

    /// Coerce one cell. `None` means the field stays absent.
    fn coerce(&self, field: &str, cell: &Cell) -> Option<Value> {
        let value = match (self.table.rule(field), cell) {
            (_, Cell::Empty) => return None,

            (Some(Coercion::TimeWithSeconds), Cell::String(s)) if self.bare_time_regex.is_match(s.trim()) => {
                Value::String(format!("{}:00", s.trim()))
            }
            (Some(Coercion::TimeWithSeconds), Cell::Date { value, .. }) => {
                Value::String(value.format("%H:%M:%S").to_string())
            }

            (Some(Coercion::CalendarDate), Cell::String(s)) => match parse_date(s, &self.date_formats) {
                Some(date) => Value::String(iso_date(&date)),
                None => Value::String(s.clone()),
            },

            (Some(Coercion::Text), Cell::Number { text, .. }) => Value::String(text.clone()),
            (Some(Coercion::Text), Cell::Bool(b)) => Value::String(b.to_string()),

            (_, Cell::Date { value, .. }) => Value::String(iso_date(value)),
            (_, Cell::String(s)) => Value::String(s.clone()),
            (_, Cell::Number { value, .. }) => number_value(*value),
            (_, Cell::Bool(b)) => Value::Bool(*b),
        };

        Some(value)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizationTable::default())
    }
}

/// Render the calendar fields of a date as `YYYY-MM-DD`.
pub fn iso_date(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d").to_string()
}

/// Convert a float to a JSON number, using an integer when it is whole.
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        Value::Number(Number::from(value as i64))
    } else {
        Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
