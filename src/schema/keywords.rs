//! Custom keywords registered with the validator.
//!
//! `units`, `enumNames` and `case_insensitive_enums` are annotations: they
//! compile and always pass. Case-insensitive matching itself happens before
//! validation, in [`Canonicalizer`](super::Canonicalizer).
//!
//! `"format": "integer"` is compiled as the [`WHOLE_NUMBER`] keyword, since
//! standard formats only ever inspect strings.

use jsonschema::paths::{LazyLocation, Location};
use jsonschema::{Keyword, ValidationError};
use serde_json::{Map, Number, Value};

/// Unit annotation (e.g. `"Million gallons per day (MGD)"`).
pub const UNITS: &str = "units";

/// Enumeration value → display name annotation.
pub const ENUM_NAMES: &str = "enumNames";

/// Marks an `enum` as matched case-insensitively.
pub const CASE_INSENSITIVE_ENUMS: &str = "case_insensitive_enums";

/// Whole-number check substituted for `"format": "integer"`.
pub const WHOLE_NUMBER: &str = "whole_number";

struct Annotation;

impl Keyword for Annotation {
    fn validate<'i>(
        &self,
        _instance: &'i Value,
        _location: &LazyLocation,
    ) -> Result<(), ValidationError<'i>> {
        Ok(())
    }

    fn is_valid(&self, _instance: &Value) -> bool {
        true
    }
}

/// Factory for annotation keywords. Any value is accepted.
pub fn annotation_factory<'a>(
    _parent: &'a Map<String, Value>,
    _value: &'a Value,
    _path: Location,
) -> Result<Box<dyn Keyword>, ValidationError<'a>> {
    Ok(Box::new(Annotation))
}

struct WholeNumber {
    location: Location,
}

impl Keyword for WholeNumber {
    fn validate<'i>(
        &self,
        instance: &'i Value,
        location: &LazyLocation,
    ) -> Result<(), ValidationError<'i>> {
        if self.is_valid(instance) {
            Ok(())
        } else {
            Err(ValidationError::custom(
                self.location.clone(),
                location.into(),
                instance,
                format!("{} is not an integer", instance),
            ))
        }
    }

    // Non-numbers are left to the `type` keyword.
    fn is_valid(&self, instance: &Value) -> bool {
        match instance {
            Value::Number(n) => is_whole(n),
            _ => true,
        }
    }
}

/// Factory for [`WHOLE_NUMBER`]. The keyword value must be `true`.
pub fn whole_number_factory<'a>(
    _parent: &'a Map<String, Value>,
    value: &'a Value,
    path: Location,
) -> Result<Box<dyn Keyword>, ValidationError<'a>> {
    if value.as_bool() == Some(true) {
        Ok(Box::new(WholeNumber { location: path }))
    } else {
        Err(ValidationError::custom(
            Location::new(),
            path,
            value,
            format!("the '{}' keyword must be set to true", WHOLE_NUMBER),
        ))
    }
}

/// Check that a JSON number has no fractional part.
pub fn is_whole(n: &Number) -> bool {
    if n.is_i64() || n.is_u64() {
        return true;
    }
    n.as_f64().map_or(false, |f| f.is_finite() && f.fract() == 0.0)
}

/// Replace every `"format": "integer"` with `"whole_number": true`.
pub fn lower_integer_format(schema: &mut Value) {
    match schema {
        Value::Object(map) => {
            if map.get("format").and_then(Value::as_str) == Some("integer") {
                map.remove("format");
                map.insert(WHOLE_NUMBER.to_string(), Value::Bool(true));
            }
            for value in map.values_mut() {
                lower_integer_format(value);
            }
        }
        Value::Array(items) => {
            for item in items {
                lower_integer_format(item);
            }
        }
        _ => {}
    }
}
