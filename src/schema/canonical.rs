//! Canonicalization pre-pass run before validation.
//!
//! Two rewrites, both driven by the row schema's property declarations:
//!
//! - a numeric-looking string in a field typed `number`/`integer` (and not
//!   `string`) becomes a JSON number;
//! - a string in a field with `"case_insensitive_enums": true` becomes the
//!   `enum` entry it equals case-insensitively.
//!
//! Rows are consumed and returned; the validator only ever reads them.

use super::keywords::CASE_INSENSITIVE_ENUMS;
use super::{declared_types, Schema};
use crate::model::NormalizedRow;
use crate::normalize::number_value;
use serde_json::Value;
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Default, PartialEq)]
struct FieldPlan {
    numeric: bool,
    // canonical string entries of a case-insensitive enum
    canonical: Vec<String>,
}

impl FieldPlan {
    fn from_property(node: &Value) -> Self {
        let types = declared_types(node);
        let numeric = types.iter().any(|t| *t == "number" || *t == "integer")
            && !types.contains(&"string");

        let case_insensitive = node
            .get(CASE_INSENSITIVE_ENUMS)
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let canonical = match node.get("enum").and_then(Value::as_array) {
            Some(entries) if case_insensitive => entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };

        Self { numeric, canonical }
    }

    fn is_noop(&self) -> bool {
        !self.numeric && self.canonical.is_empty()
    }
}

/// Rewrites row values into the canonical form the schema expects.
#[derive(Debug, Clone, Default)]
pub struct Canonicalizer {
    fields: HashMap<String, FieldPlan>,
}

impl Canonicalizer {
    /// Build the rewrite plan for a schema's row properties.
    pub fn from_schema(schema: &Schema) -> Self {
        let fields: HashMap<String, FieldPlan> = schema
            .row_properties()
            .into_iter()
            .map(|(name, node)| (name.to_string(), FieldPlan::from_property(node)))
            .filter(|(_, plan)| !plan.is_noop())
            .collect();

        log::debug!("Canonicalizer covers {} fields", fields.len());
        Self { fields }
    }

    /// Number of fields with at least one rewrite.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Canonicalize every row.
    pub fn canonicalize(&self, rows: Vec<NormalizedRow>) -> Vec<NormalizedRow> {
        rows.into_iter().map(|row| self.canonicalize_row(row)).collect()
    }

    /// Canonicalize one row.
    pub fn canonicalize_row(&self, mut row: NormalizedRow) -> NormalizedRow {
        for (field, value) in row.values.iter_mut() {
            if let Some(rewritten) = self.canonicalize_value(field, value) {
                *value = rewritten;
            }
        }
        row
    }

    /// The canonical form of one value, or `None` when it is kept as is.
    pub fn canonicalize_value(&self, field: &str, value: &Value) -> Option<Value> {
        let plan = self.fields.get(field)?;
        let text = value.as_str()?;

        if plan.numeric {
            if let Some(number) = coerce_numeric(text) {
                return Some(number);
            }
        }
        match_case_insensitive(text, &plan.canonical).map(|entry| Value::String(entry.to_string()))
    }
}

/// Parse a numeric-looking string into a JSON number.
///
/// Surrounding whitespace is ignored. Non-finite values are rejected.
pub fn coerce_numeric(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    let parsed: f64 = trimmed.parse().ok()?;
    parsed.is_finite().then(|| number_value(parsed))
}

/// Find the entry equal to `value` ignoring case, after NFC normalization.
///
/// An exact match wins over a case-insensitive one.
pub fn match_case_insensitive<'a>(value: &str, entries: &'a [String]) -> Option<&'a str> {
    if let Some(exact) = entries.iter().find(|entry| *entry == value) {
        return Some(exact);
    }
    let folded = fold(value);
    entries
        .iter()
        .find(|entry| fold(entry) == folded)
        .map(String::as_str)
}

fn fold(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}
