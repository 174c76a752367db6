//! Diagnostic extraction.

use super::ValidationIssue;
use serde::{Deserialize, Serialize};

/// Keyword whose violations are never reported.
///
/// A failing `if` only means the conditional rule does not apply.
pub const SUPPRESSED_KEYWORD: &str = "if";

/// A user-facing (line, column, message) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticRecord {
    /// 1-based display line; the first data row is line 2
    pub line_number: usize,

    /// Column name, blank when the violation has none
    pub column: String,

    /// Validator message
    pub message: String,
}

impl DiagnosticRecord {
    /// Create a record.
    pub fn new(line_number: usize, column: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line_number,
            column: column.into(),
            message: message.into(),
        }
    }

    /// Build the record for one issue, or `None` when it is suppressed.
    pub fn from_issue(issue: &ValidationIssue) -> Option<Self> {
        if issue.keyword == SUPPRESSED_KEYWORD {
            return None;
        }

        let column = issue
            .column
            .clone()
            .or_else(|| issue.missing_property.clone())
            .or_else(|| issue.first_param.clone())
            .unwrap_or_default();

        Some(Self {
            line_number: display_line(issue.row_index),
            column,
            message: issue.message.clone(),
        })
    }

    /// Check if the record names a column.
    pub fn has_column(&self) -> bool {
        !self.column.is_empty()
    }
}

/// Map a 0-based row index to its display line.
///
/// Line 1 is the header row, so violations of the row array itself land there.
pub fn display_line(row_index: Option<usize>) -> usize {
    match row_index {
        Some(index) => index + 2,
        None => 1,
    }
}

/// Turn validator issues into diagnostics, keeping validator order.
pub fn extract_diagnostics(issues: &[ValidationIssue]) -> Vec<DiagnosticRecord> {
    issues.iter().filter_map(DiagnosticRecord::from_issue).collect()
}
