//! Declarative per-field coercion rules.

use std::collections::HashMap;

/// A coercion applied to one named field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercion {
    /// Render dates, and text in a recognized date layout, as `YYYY-MM-DD`.
    CalendarDate,

    /// Append `:00` to a bare `H:MM`/`HH:MM` time; render date cells as `HH:MM:SS`.
    TimeWithSeconds,

    /// Keep the value as text; numbers use their source representation.
    Text,
}

/// Field name → coercion mapping.
///
/// Fields without an entry pass through with only the generic date rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationTable {
    rules: HashMap<String, Coercion>,
}

impl NormalizationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Table for the bundled water-sample schema.
    pub fn water_sample() -> Self {
        Self::new()
            .with_rule("sample_collect_date", Coercion::CalendarDate)
            .with_rule("test_result_date", Coercion::CalendarDate)
            .with_rule("sample_collect_time", Coercion::TimeWithSeconds)
            .with_rule("num_no_target_control", Coercion::Text)
            .with_rule("zipcode", Coercion::Text)
    }

    /// Add or replace the rule for a field.
    pub fn with_rule(mut self, field: impl Into<String>, coercion: Coercion) -> Self {
        self.rules.insert(field.into(), coercion);
        self
    }

    /// Remove the rule for a field.
    pub fn without_rule(mut self, field: &str) -> Self {
        self.rules.remove(field);
        self
    }

    /// Get the rule for a field.
    pub fn rule(&self, field: &str) -> Option<Coercion> {
        self.rules.get(field).copied()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for NormalizationTable {
    fn default() -> Self {
        Self::water_sample()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_sample_table() {
        let table = NormalizationTable::default();
        assert_eq!(table.rule("zipcode"), Some(Coercion::Text));
        assert_eq!(table.rule("num_no_target_control"), Some(Coercion::Text));
        assert_eq!(
            table.rule("sample_collect_time"),
            Some(Coercion::TimeWithSeconds)
        );
        assert_eq!(table.rule("flow_rate"), None);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_with_and_without_rule() {
        let table = NormalizationTable::new()
            .with_rule("lab_id", Coercion::Text)
            .with_rule("zipcode", Coercion::Text)
            .without_rule("zipcode");
        assert_eq!(table.rule("lab_id"), Some(Coercion::Text));
        assert_eq!(table.rule("zipcode"), None);
        assert!(!table.is_empty());
    }
}
