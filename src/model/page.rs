//! Page (sheet) types.

use super::{Cell, RawRow};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One named sheet: a grid of cells with the header in row 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Sheet name
    pub name: String,

    /// Cells by row, then column. Rows may have different lengths.
    pub grid: Vec<Vec<Cell>>,
}

impl Page {
    /// Create an empty page.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            grid: Vec::new(),
        }
    }

    /// Create a page from a grid.
    pub fn with_grid(name: impl Into<String>, grid: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.grid.push(row);
    }

    /// Number of grid rows, header included.
    pub fn row_count(&self) -> usize {
        self.grid.len()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.grid.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Get a cell by 0-based row and column.
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.grid.get(row).and_then(|r| r.get(col))
    }

    /// Get a cell by A1-style address (e.g. `"B2"`).
    pub fn cell_at(&self, address: &str) -> Option<&Cell> {
        let (row, col) = parse_address(address)?;
        self.cell(row, col)
    }

    /// Column names taken from the header row.
    ///
    /// Blank header cells are named `__EMPTY`, `__EMPTY_1`, ... and
    /// repeated names get the first unused `_1`, `_2`, ... suffix, so every
    /// column has a distinct key.
    pub fn headers(&self) -> Vec<String> {
        let width = self.column_count();
        let header_row = self.grid.first();
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut used: HashSet<String> = HashSet::with_capacity(width);
        let mut headers = Vec::with_capacity(width);

        for col in 0..width {
            let base = header_row
                .and_then(|r| r.get(col))
                .map(Cell::display_text)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "__EMPTY".to_string());

            let count = seen.entry(base.clone()).or_insert(0);
            let mut name = base.clone();
            while used.contains(&name) {
                *count += 1;
                name = format!("{}_{}", base, count);
            }
            used.insert(name.clone());
            headers.push(name);
        }

        headers
    }

    /// Data rows keyed by header name, in file order.
    ///
    /// Empty cells are left out of a row. When `skip_blank_rows` is set,
    /// rows with no values at all are dropped and do not consume an index.
    pub fn rows(&self, skip_blank_rows: bool) -> Vec<RawRow> {
        let headers = self.headers();
        let mut rows = Vec::new();

        for (grid_index, cells) in self.grid.iter().enumerate().skip(1) {
            let mut row = RawRow::new(rows.len(), grid_index + 1);
            for (col, cell) in cells.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                if let Some(name) = headers.get(col) {
                    row.insert(name.clone(), cell.clone());
                }
            }

            if row.is_empty() && skip_blank_rows {
                continue;
            }
            rows.push(row);
        }

        rows
    }

    /// Check if the page has no data rows.
    pub fn is_empty(&self) -> bool {
        self.grid.len() <= 1
    }
}

/// Parse an A1-style address into 0-based (row, column).
pub fn parse_address(address: &str) -> Option<(usize, usize)> {
    let address = address.trim().to_ascii_uppercase();
    let split = address.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = address.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }

    let mut col = 0usize;
    for c in letters.chars() {
        col = col
            .checked_mul(26)?
            .checked_add(c as usize - 'A' as usize + 1)?;
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }

    Some((row - 1, col - 1))
}

/// Convert a 0-based column index to letters (A, B, ..., Z, AA, ...).
pub fn column_letter(index: usize) -> String {
    let mut result = String::new();
    let mut n = index + 1;

    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }

    result
}
