//! Cell values.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Cell {
    /// No value
    Empty,

    /// Text
    String(String),

    /// Numeric value with the text it was read from.
    ///
    /// `text` is the source representation when the container has one
    /// (CSV keeps `02139`), otherwise the shortest decimal form of `value`.
    Number { value: f64, text: String },

    /// Boolean
    Bool(bool),

    /// Date or date-time.
    ///
    /// `value` holds the calendar fields as read, without any timezone.
    /// `display` is how the source showed it.
    Date {
        value: NaiveDateTime,
        display: String,
    },
}

impl Cell {
    /// Create a text cell.
    pub fn string(text: impl Into<String>) -> Self {
        Cell::String(text.into())
    }

    /// Create a number cell whose text is derived from the value.
    pub fn number(value: f64) -> Self {
        Cell::Number {
            value,
            text: format_number(value),
        }
    }

    /// Create a number cell that remembers its source text.
    pub fn number_with_text(value: f64, text: impl Into<String>) -> Self {
        Cell::Number {
            value,
            text: text.into(),
        }
    }

    /// Create a date cell.
    pub fn date(value: NaiveDateTime, display: impl Into<String>) -> Self {
        Cell::Date {
            value,
            display: display.into(),
        }
    }

    /// Check if the cell holds no value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text shown for this cell (header names, plain rendering).
    pub fn display_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::String(s) => s.clone(),
            Cell::Number { text, .. } => text.clone(),
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
            Cell::Date { display, .. } => display.clone(),
        }
    }

    /// Short type name, used in debug logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Empty => "empty",
            Cell::String(_) => "string",
            Cell::Number { .. } => "number",
            Cell::Bool(_) => "boolean",
            Cell::Date { .. } => "date",
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

/// Format a float the way a spreadsheet shows a general-format number.
///
/// Integral values drop the fractional part (`2139.0` → `2139`).
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
