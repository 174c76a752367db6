//! Row records before and after normalization.

use super::Cell;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One data row keyed by column name, as extracted from a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// 0-based position in the row sequence
    pub index: usize,

    /// 1-based spreadsheet line the row was read from
    pub source_line: usize,

    /// Non-empty cells in header order
    pub cells: Vec<(String, Cell)>,
}

impl RawRow {
    /// Create an empty row.
    pub fn new(index: usize, source_line: usize) -> Self {
        Self {
            index,
            source_line,
            cells: Vec::new(),
        }
    }

    /// Add a cell, replacing any previous value for the column.
    pub fn insert(&mut self, column: impl Into<String>, cell: Cell) {
        let column = column.into();
        if let Some(slot) = self.cells.iter_mut().find(|(name, _)| *name == column) {
            slot.1 = cell;
        } else {
            self.cells.push((column, cell));
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, column: impl Into<String>, cell: Cell) -> Self {
        self.insert(column, cell);
        self
    }

    /// Get a cell by column name.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }

    /// Iterate over (column, cell) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(name, cell)| (name.as_str(), cell))
    }

    /// Number of values in the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no values.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// A row after field coercions, ready for validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// 0-based position in the row sequence
    pub index: usize,

    /// 1-based spreadsheet line the row was read from
    pub source_line: usize,

    /// Values compared against the schema
    pub values: Map<String, Value>,

    /// Temporal values of date cells, kept for display only
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub originals: BTreeMap<String, NaiveDateTime>,
}

impl NormalizedRow {
    /// Create an empty normalized row.
    pub fn new(index: usize, source_line: usize) -> Self {
        Self {
            index,
            source_line,
            values: Map::new(),
            originals: BTreeMap::new(),
        }
    }

    /// Create a row from an existing JSON object.
    pub fn from_values(index: usize, values: Map<String, Value>) -> Self {
        Self {
            index,
            source_line: index + 2,
            values,
            originals: BTreeMap::new(),
        }
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Get a value as text, if it is a JSON string.
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.values.get(column).and_then(Value::as_str)
    }
}

/// Collect rows into the JSON array handed to the validator.
pub fn rows_to_instance(rows: &[NormalizedRow]) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| Value::Object(row.values.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_row_insert_replaces() {
        let mut row = RawRow::new(0, 2);
        row.insert("zipcode", Cell::string("02139"));
        row.insert("zipcode", Cell::string("60601"));
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("zipcode"), Some(&Cell::string("60601")));
    }

    #[test]
    fn test_rows_to_instance() {
        let mut values = Map::new();
        values.insert("zipcode".into(), json!("02139"));
        let rows = vec![NormalizedRow::from_values(0, values)];

        assert_eq!(rows_to_instance(&rows), json!([{ "zipcode": "02139" }]));
        assert_eq!(rows[0].source_line, 2);
        assert_eq!(rows[0].get_str("zipcode"), Some("02139"));
    }
}
