use super::{
    evaluation::{FieldMatch, FieldMatches, InputDescriptorEvaluation},
    field::FieldMatcher,
    filter::SchemaValidation,
    query::DocumentQuery,
};
use crate::core::{
    claim::Claim,
    credential_format::{ClaimFormatDesignation, ClaimFormatMap},
    input_descriptor::InputDescriptor,
};

/// Evaluates one input descriptor against one claim.
pub struct DescriptorEvaluator<'a, Q, V> {
    fields: FieldMatcher<'a, Q, V>,
}

impl<'a, Q: DocumentQuery, V: SchemaValidation> DescriptorEvaluator<'a, Q, V> {
    pub fn new(fields: FieldMatcher<'a, Q, V>) -> Self {
        Self { fields }
    }

    /// Check the claim format first, then every field constraint.
    ///
    /// Field constraints are not evaluated for an unsupported format.
    pub fn evaluate(
        &self,
        input_descriptor: &InputDescriptor,
        claim: &Claim,
        definition_formats: Option<&ClaimFormatMap>,
    ) -> InputDescriptorEvaluation {
        if !is_format_supported(input_descriptor, definition_formats, claim.format()) {
            return InputDescriptorEvaluation::UnsupportedFormat;
        }

        let matches: FieldMatches = input_descriptor
            .constraints()
            .fields()
            .iter()
            .map(|field| FieldMatch {
                field: field.clone(),
                outcome: self.fields.match_field(claim, field),
            })
            .collect();

        if matches.has_required_miss() {
            InputDescriptorEvaluation::NotMatchedFieldConstraints
        } else {
            InputDescriptorEvaluation::CandidateClaim { matches }
        }
    }
}

/// The descriptor's own formats take precedence over the definition's. With
/// neither present, every format is accepted.
pub fn is_format_supported(
    input_descriptor: &InputDescriptor,
    definition_formats: Option<&ClaimFormatMap>,
    claim_format: &ClaimFormatDesignation,
) -> bool {
    match input_descriptor
        .formats()
        .or(definition_formats.filter(|formats| !formats.is_empty()))
    {
        Some(formats) => formats.contains_key(claim_format),
        None => true,
    }
}
