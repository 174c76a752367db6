//! Validation errors flattened into owned records.

use jsonschema::error::{TypeKind, ValidationErrorKind};
use jsonschema::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One schema violation reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// 0-based row index, absent for violations of the row array itself
    pub row_index: Option<usize>,

    /// Column named by the instance path
    pub column: Option<String>,

    /// Property named by a `required` violation
    pub missing_property: Option<String>,

    /// First auxiliary parameter of the violation
    pub first_param: Option<String>,

    /// Validator message
    pub message: String,

    /// Keyword that produced the violation
    pub keyword: String,

    /// Instance location as a JSON pointer
    pub instance_path: String,
}

impl ValidationIssue {
    /// Build an issue from a validator error.
    pub fn from_error(error: &ValidationError<'_>) -> Self {
        let instance_path = error.instance_path.as_str().to_string();
        let segments = split_pointer(&instance_path);

        let row_index = segments.first().and_then(|s| s.parse::<usize>().ok());
        let column = segments.get(1).cloned();

        let missing_property = match &error.kind {
            ValidationErrorKind::Required { property } => Some(value_text(property)),
            _ => None,
        };

        Self {
            row_index,
            column,
            missing_property,
            first_param: first_param(&error.kind),
            message: error.to_string(),
            keyword: keyword_of(error.schema_path.as_str()),
            instance_path,
        }
    }
}

/// Split a JSON pointer into unescaped segments.
///
/// `~1` becomes `/` and `~0` becomes `~`, in that order.
pub fn split_pointer(pointer: &str) -> Vec<String> {
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer
        .trim_start_matches('/')
        .split('/')
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// The keyword a schema path ends in.
pub fn keyword_of(schema_path: &str) -> String {
    split_pointer(schema_path).pop().unwrap_or_default()
}

/// The first parameter a violation carries, as text.
///
/// Kinds without parameters (`anyOf`, `uniqueItems`, ...) give `None`.
pub fn first_param(kind: &ValidationErrorKind) -> Option<String> {
    use ValidationErrorKind as Kind;

    match kind {
        Kind::Required { property } => Some(value_text(property)),
        Kind::AdditionalProperties { unexpected }
        | Kind::UnevaluatedItems { unexpected }
        | Kind::UnevaluatedProperties { unexpected } => unexpected.first().cloned(),
        Kind::AdditionalItems { limit } => Some(limit.to_string()),
        Kind::MaxItems { limit }
        | Kind::MaxLength { limit }
        | Kind::MaxProperties { limit }
        | Kind::MinItems { limit }
        | Kind::MinLength { limit }
        | Kind::MinProperties { limit } => Some(limit.to_string()),
        Kind::Maximum { limit }
        | Kind::Minimum { limit }
        | Kind::ExclusiveMaximum { limit }
        | Kind::ExclusiveMinimum { limit } => Some(value_text(limit)),
        Kind::Constant { expected_value } => Some(value_text(expected_value)),
        Kind::Enum { options } => Some(value_text(options)),
        Kind::Not { schema } => Some(value_text(schema)),
        Kind::MultipleOf { multiple_of } => Some(multiple_of.to_string()),
        Kind::Pattern { pattern } => Some(pattern.clone()),
        Kind::Format { format } => Some(format.clone()),
        Kind::ContentEncoding { content_encoding } => Some(content_encoding.clone()),
        Kind::ContentMediaType { content_media_type } => Some(content_media_type.clone()),
        Kind::Type { kind } => Some(type_text(kind)),
        Kind::PropertyNames { error } => Some(value_text(&error.instance)),
        _ => None,
    }
}

fn type_text(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Single(primitive) => primitive.to_string(),
        TypeKind::Multiple(types) => (*types)
            .into_iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
