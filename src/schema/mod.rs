//! Row schema loading and compilation.
//!
//! A [`Schema`] wraps a Draft 7 JSON-Schema document describing an array
//! of row objects. The row schema is found either directly under `items`
//! or through a local `$ref` into `definitions`.
//!
//! Compilation registers the custom formats and keywords in
//! [`formats`] and [`keywords`], and produces a fresh
//! [`jsonschema::Validator`] every time it is called.

mod canonical;
pub mod formats;
pub mod keywords;

pub use canonical::{coerce_numeric, match_case_insensitive, Canonicalizer};

use crate::error::{Error, Result};
use jsonschema::Draft;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

/// Bundled water-sample schema source.
pub const BUNDLED_SCHEMA: &str = include_str!("../../schema/water_sample.schema.json");

/// Longest chain of local `$ref`s followed before giving up.
const MAX_REF_DEPTH: usize = 16;

/// A validated JSON-Schema document for an array of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    document: Value,
}

impl Schema {
    /// Load the bundled water-sample schema.
    pub fn bundled() -> Result<Self> {
        BUNDLED_SCHEMA.parse()
    }

    /// Load a schema from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading schema from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Wrap a schema document.
    ///
    /// Fails with [`Error::InvalidSchema`] when the document does not
    /// describe an array of objects or cannot be compiled.
    pub fn from_value(document: Value) -> Result<Self> {
        let schema = Self { document };
        if schema.row_schema().is_none() {
            return Err(Error::InvalidSchema(
                "schema must describe an array of row objects".to_string(),
            ));
        }
        schema.compile()?;
        Ok(schema)
    }

    /// The schema document as authored.
    pub fn as_value(&self) -> &Value {
        &self.document
    }

    /// The schema applied to each row, with local `$ref`s resolved.
    pub fn row_schema(&self) -> Option<&Value> {
        let root = self.resolve(&self.document)?;
        let items = root.get("items")?;
        let row = self.resolve(items)?;
        row.is_object().then_some(row)
    }

    /// Property schemas of the row schema, each with `$ref`s resolved.
    pub fn row_properties(&self) -> Vec<(&str, &Value)> {
        let properties = self
            .row_schema()
            .and_then(|row| row.get("properties"))
            .and_then(Value::as_object);

        match properties {
            Some(map) => map
                .iter()
                .filter_map(|(name, node)| Some((name.as_str(), self.resolve(node)?)))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Names listed in the row schema's `required` array.
    pub fn required_fields(&self) -> Vec<&str> {
        self.row_schema()
            .and_then(|row| row.get("required"))
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Follow local `$ref`s (`#/...`) until a concrete node is reached.
    pub fn resolve<'a>(&'a self, node: &'a Value) -> Option<&'a Value> {
        let mut current = node;
        for _ in 0..MAX_REF_DEPTH {
            match current.get("$ref").and_then(Value::as_str) {
                Some(reference) => {
                    let pointer = reference.strip_prefix('#')?;
                    current = self.document.pointer(pointer)?;
                }
                None => return Some(current),
            }
        }
        None
    }

    /// Compile a validator with the custom formats and keywords.
    pub fn compile(&self) -> Result<jsonschema::Validator> {
        let mut document = self.document.clone();
        keywords::lower_integer_format(&mut document);

        jsonschema::options()
            .with_draft(Draft::Draft7)
            .should_validate_formats(true)
            .with_format(formats::TIME_OF_DAY, formats::is_time_of_day)
            .with_keyword(keywords::UNITS, keywords::annotation_factory)
            .with_keyword(keywords::ENUM_NAMES, keywords::annotation_factory)
            .with_keyword(keywords::CASE_INSENSITIVE_ENUMS, keywords::annotation_factory)
            .with_keyword(keywords::WHOLE_NUMBER, keywords::whole_number_factory)
            .build(&document)
            .map_err(|e| Error::InvalidSchema(e.to_string()))
    }

    /// Build the canonicalization pre-pass for this schema.
    pub fn canonicalizer(&self) -> Canonicalizer {
        Canonicalizer::from_schema(self)
    }
}

impl FromStr for Schema {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let document: Value =
            serde_json::from_str(text).map_err(|e| Error::InvalidSchema(e.to_string()))?;
        Self::from_value(document)
    }
}

/// Declared `type` names of a property schema.
pub(crate) fn declared_types(node: &Value) -> Vec<&str> {
    match node.get("type") {
        Some(Value::String(name)) => vec![name.as_str()],
        Some(Value::Array(names)) => names.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows_schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "array",
            "items": { "$ref": "#/definitions/row" },
            "definitions": {
                "row": {
                    "type": "object",
                    "properties": {
                        "zipcode": { "type": "string", "pattern": "^[0-9]{5}$" },
                        "flow": { "$ref": "#/definitions/flow" }
                    },
                    "required": ["zipcode"]
                },
                "flow": { "type": ["number", "null"], "units": "MGD" }
            }
        })
    }

    #[test]
    fn test_bundled_schema_loads() {
        let schema = Schema::bundled().unwrap();
        assert!(schema.row_schema().is_some());
        assert!(schema
            .row_properties()
            .iter()
            .any(|(name, _)| *name == "zipcode"));
        assert!(schema.required_fields().contains(&"sample_id"));
    }

    #[test]
    fn test_row_schema_through_ref() {
        let schema = Schema::from_value(rows_schema()).unwrap();
        let properties = schema.row_properties();
        assert_eq!(properties.len(), 2);

        let flow = properties.iter().find(|(name, _)| *name == "flow").unwrap().1;
        assert_eq!(declared_types(flow), vec!["number", "null"]);
        assert_eq!(schema.required_fields(), vec!["zipcode"]);
    }

    #[test]
    fn test_rejects_non_array_schema() {
        let result = Schema::from_value(json!({ "type": "object" }));
        assert!(matches!(result, Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_rejects_invalid_json() {
        let result = "{ not json".parse::<Schema>();
        assert!(matches!(result, Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_rejects_uncompilable_schema() {
        let result = Schema::from_value(json!({
            "type": "array",
            "items": { "type": "object", "properties": { "a": { "type": 12 } } }
        }));
        assert!(matches!(result, Err(Error::InvalidSchema(_))));
    }

    #[test]
    fn test_ref_cycle_does_not_resolve() {
        let schema = Schema {
            document: json!({
                "type": "array",
                "items": { "$ref": "#/definitions/a" },
                "definitions": {
                    "a": { "$ref": "#/definitions/b" },
                    "b": { "$ref": "#/definitions/a" }
                }
            }),
        };
        assert!(schema.row_schema().is_none());
    }

    #[test]
    fn test_compiled_validator_checks_formats() {
        let schema = Schema::from_value(json!({
            "type": "array",
            "items": {
                "type": "object",
                "properties": {
                    "time": { "type": "string", "format": "time-of-day" },
                    "method": { "type": "number", "format": "integer" },
                    "kind": { "enum": ["a"], "enumNames": ["A"], "case_insensitive_enums": true }
                }
            }
        }))
        .unwrap();
        let validator = schema.compile().unwrap();

        assert!(validator.is_valid(&json!([{ "time": "8:15", "method": 2, "kind": "a" }])));
        assert!(!validator.is_valid(&json!([{ "time": "25:00" }])));
        assert!(!validator.is_valid(&json!([{ "method": 2.5 }])));
    }
}
