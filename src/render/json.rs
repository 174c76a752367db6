//! JSON rendering for validation outcomes.

use crate::error::{Error, Result};
use crate::validate::ValidationOutcome;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outcome to JSON.
pub fn to_json(outcome: &ValidationOutcome, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(outcome),
        JsonFormat::Compact => serde_json::to_string(outcome),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
