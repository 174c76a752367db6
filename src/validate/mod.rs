//! Schema validation of normalized rows.
//!
//! Validation runs in two phases. The [`Canonicalizer`] rewrites rows into
//! the shape the schema expects, then a freshly compiled validator checks
//! the row array and every error is collected. Errors are flattened into
//! [`ValidationIssue`]s and finally [`DiagnosticRecord`]s.

mod diagnostics;
mod issue;

pub use diagnostics::{
    display_line, extract_diagnostics, DiagnosticRecord, SUPPRESSED_KEYWORD,
};
pub use issue::{keyword_of, split_pointer, ValidationIssue};

use crate::error::Result;
use crate::model::{rows_to_instance, NormalizedRow, Page};
use crate::normalize::Normalizer;
use crate::schema::{Canonicalizer, Schema};
use serde::{Deserialize, Serialize};

/// Result of validating one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// Name of the validated page
    pub page: String,

    /// Number of data rows validated
    pub row_count: usize,

    /// True when no diagnostics were produced
    pub valid: bool,

    /// Diagnostics in validator order
    pub diagnostics: Vec<DiagnosticRecord>,
}

impl ValidationOutcome {
    /// Create an outcome; `valid` follows from the diagnostics.
    pub fn new(page: impl Into<String>, row_count: usize, diagnostics: Vec<DiagnosticRecord>) -> Self {
        Self {
            page: page.into(),
            row_count,
            valid: diagnostics.is_empty(),
            diagnostics,
        }
    }

    /// Number of diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Diagnostics reported for one display line.
    pub fn diagnostics_for_line(&self, line_number: usize) -> Vec<&DiagnosticRecord> {
        self.diagnostics
            .iter()
            .filter(|d| d.line_number == line_number)
            .collect()
    }
}

/// A compiled validator paired with its canonicalization pass.
pub struct RowValidator {
    validator: jsonschema::Validator,
    canonicalizer: Canonicalizer,
}

impl RowValidator {
    /// Compile a validator for a schema.
    pub fn new(schema: &Schema) -> Result<Self> {
        Ok(Self {
            validator: schema.compile()?,
            canonicalizer: schema.canonicalizer(),
        })
    }

    /// Canonicalize rows and collect every violation.
    pub fn issues(&self, rows: Vec<NormalizedRow>) -> Vec<ValidationIssue> {
        let rows = self.canonicalizer.canonicalize(rows);
        let instance = rows_to_instance(&rows);
        self.validator
            .iter_errors(&instance)
            .map(|error| ValidationIssue::from_error(&error))
            .collect()
    }

    /// Validate rows and build the outcome for a page.
    pub fn validate(&self, page: &str, rows: Vec<NormalizedRow>) -> ValidationOutcome {
        let row_count = rows.len();
        let issues = self.issues(rows);
        let diagnostics = extract_diagnostics(&issues);

        log::debug!(
            "Sheet '{}': {} rows, {} issues, {} diagnostics",
            page,
            row_count,
            issues.len(),
            diagnostics.len()
        );

        ValidationOutcome::new(page, row_count, diagnostics)
    }
}

/// Validate normalized rows with a freshly compiled validator.
pub fn validate_rows(schema: &Schema, page: &str, rows: Vec<NormalizedRow>) -> Result<ValidationOutcome> {
    Ok(RowValidator::new(schema)?.validate(page, rows))
}

/// Normalize and validate one page.
pub fn validate_page(
    schema: &Schema,
    normalizer: &Normalizer,
    page: &Page,
    skip_blank_rows: bool,
) -> Result<ValidationOutcome> {
    let rows = normalizer.normalize_page(page, skip_blank_rows);
    validate_rows(schema, &page.name, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn schema() -> Schema {
        Schema::from_value(json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "zipcode": { "type": "string", "pattern": "^[0-9]{5}$" },
                    "sex": {
                        "type": "string",
                        "enum": ["Male", "Female"],
                        "case_insensitive_enums": true
                    },
                    "flow_rate": { "type": ["number", "null"], "units": "MGD" },
                    "method": { "type": "number", "format": "integer" },
                    "time": { "type": "string", "format": "time-of-day" }
                },
                "required": ["zipcode"]
            }
        }))
        .unwrap()
    }

    fn rows(values: Value) -> Vec<NormalizedRow> {
        values
            .as_array()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let map: Map<String, Value> = v.as_object().cloned().unwrap();
                NormalizedRow::from_values(i, map)
            })
            .collect()
    }

    #[test]
    fn test_valid_rows() {
        let outcome = validate_rows(
            &schema(),
            "Sheet1",
            rows(json!([
                { "zipcode": "02139", "sex": "MALE", "flow_rate": "41.5", "method": 3, "time": "23:04:00" }
            ])),
        )
        .unwrap();
        assert!(outcome.valid);
        assert_eq!(outcome.row_count, 1);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_enum_mismatch_reported_once() {
        let outcome =
            validate_rows(&schema(), "Sheet1", rows(json!([{ "zipcode": "02139", "sex": "Man" }]))).unwrap();
        assert!(!outcome.valid);
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.diagnostics[0].column, "sex");
        assert_eq!(outcome.diagnostics[0].line_number, 2);
    }

    #[test]
    fn test_all_violations_collected() {
        let outcome = validate_rows(
            &schema(),
            "Sheet1",
            rows(json!([
                { "zipcode": "2139", "method": 2.5, "time": "25:00" }
            ])),
        )
        .unwrap();
        assert_eq!(outcome.error_count(), 3);

        let mut columns: Vec<&str> = outcome.diagnostics.iter().map(|d| d.column.as_str()).collect();
        columns.sort_unstable();
        assert_eq!(columns, vec!["method", "time", "zipcode"]);
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.message == "2.5 is not an integer"));
    }

    #[test]
    fn test_required_uses_missing_property() {
        let outcome =
            validate_rows(&schema(), "Sheet1", rows(json!([{ "zipcode": "02139" }, {}]))).unwrap();
        assert_eq!(outcome.error_count(), 1);
        assert_eq!(outcome.diagnostics[0].line_number, 3);
        assert_eq!(outcome.diagnostics[0].column, "zipcode");
        assert_eq!(outcome.diagnostics_for_line(3).len(), 1);
    }

    #[test]
    fn test_empty_page_is_valid() {
        let outcome = validate_rows(&schema(), "Sheet1", Vec::new()).unwrap();
        assert!(outcome.valid);
        assert_eq!(outcome.row_count, 0);
    }

    #[test]
    fn test_validate_page_normalizes_first() {
        use crate::model::Cell;

        let page = Page::with_grid(
            "Samples",
            vec![
                vec![Cell::string("zipcode"), Cell::string("sex")],
                vec![Cell::number_with_text(2139.0, "02139"), Cell::string("female")],
            ],
        );
        let outcome = validate_page(&schema(), &Normalizer::default(), &page, true).unwrap();
        assert_eq!(outcome.page, "Samples");
        assert!(outcome.valid, "{:?}", outcome.diagnostics);
    }
}
