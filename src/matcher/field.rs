use super::{
    evaluation::CandidateField,
    filter::{FilterEvaluator, SchemaValidation},
    query::DocumentQuery,
};
use crate::core::{claim::Claim, input_descriptor::ConstraintsField};

use serde_json::Value as Json;
use tracing::trace;

/// Matches a single field constraint against a claim document.
pub struct FieldMatcher<'a, Q, V> {
    query: &'a Q,
    filter: &'a FilterEvaluator<V>,
}

impl<'a, Q: DocumentQuery, V: SchemaValidation> FieldMatcher<'a, Q, V> {
    pub fn new(query: &'a Q, filter: &'a FilterEvaluator<V>) -> Self {
        Self { query, filter }
    }

    /// Try each path of `field` in declared order and return the first value
    /// accepted by the field filter.
    ///
    /// Only the first non-null result of a path is inspected. It must be a
    /// string, number or boolean; objects and arrays never match.
    pub fn match_field(&self, claim: &Claim, field: &ConstraintsField) -> CandidateField {
        for path in field.path() {
            let Some(value) = self
                .query
                .query(claim.document(), path)
                .into_iter()
                .find(|value| !value.is_null())
            else {
                continue;
            };

            let Some(content) = scalar_content(value) else {
                trace!(claim = %claim.id(), path = %path, "Value at path is not a scalar");
                continue;
            };

            if self.filter.accepts(value, field.filter()) {
                return CandidateField::Found {
                    path: path.clone(),
                    content,
                };
            }

            trace!(claim = %claim.id(), path = %path, "Value at path rejected by filter");
        }

        if field.is_optional() {
            CandidateField::OptionalFieldNotFound
        } else {
            CandidateField::RequiredFieldNotFound
        }
    }
}

fn scalar_content(value: &Json) -> Option<String> {
    match value {
        Json::String(string) => Some(string.clone()),
        Json::Number(number) => Some(number.to_string()),
        Json::Bool(boolean) => Some(boolean.to_string()),
        Json::Null | Json::Array(_) | Json::Object(_) => None,
    }
}
