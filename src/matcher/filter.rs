use jsonschema::JSONSchema;
use serde_json::Value as Json;
use time::{macros::format_description, Date};
use tracing::debug;

/// Validates an extracted value against a field `filter`.
///
/// Implementations must not fail: a filter that cannot be compiled or
/// applied is reported as `false`.
pub trait SchemaValidation {
    fn is_valid(&self, value: &Json, filter: &Json) -> bool;
}

impl<T: SchemaValidation + ?Sized> SchemaValidation for &T {
    fn is_valid(&self, value: &Json, filter: &Json) -> bool {
        (**self).is_valid(value, filter)
    }
}

/// JSON Schema validation backed by the `jsonschema` crate.
///
/// Built without the crate's file and HTTP resolvers: a filter whose `$ref`
/// points outside the filter itself never validates.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonSchemaValidation;

impl SchemaValidation for JsonSchemaValidation {
    fn is_valid(&self, value: &Json, filter: &Json) -> bool {
        let schema = match JSONSchema::compile(filter) {
            Ok(schema) => schema,
            Err(error) => {
                debug!("Filter is not a valid JSON Schema: {error}");
                return false;
            }
        };

        if let Err(errors) = schema.validate(value) {
            for error in errors {
                debug!("Field did not pass filter validation: {error}");
            }
            return false;
        }

        true
    }
}

/// Decides whether an extracted value satisfies a field filter.
///
/// A filter with `"format": "date"` is checked by parsing the value as a
/// `YYYY-MM-DD` calendar date; every other filter goes to the
/// [SchemaValidation] capability.
#[derive(Clone, Debug, Default)]
pub struct FilterEvaluator<V> {
    validation: V,
}

impl<V: SchemaValidation> FilterEvaluator<V> {
    pub fn new(validation: V) -> Self {
        Self { validation }
    }

    pub fn accepts(&self, value: &Json, filter: Option<&Json>) -> bool {
        let Some(filter) = filter else {
            return true;
        };

        if filter.get("format").and_then(Json::as_str) == Some("date") {
            return value.as_str().is_some_and(is_valid_date);
        }

        self.validation.is_valid(value, filter)
    }
}

/// Return whether `value` is a valid calendar date in `YYYY-MM-DD` form.
pub fn is_valid_date(value: &str) -> bool {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).is_ok()
}
