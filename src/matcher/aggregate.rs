use super::evaluation::{
    ClaimsEvaluation, InputDescriptorEvaluation, InputDescriptorEvaluationPerClaim,
};
use crate::core::presentation_definition::PresentationDefinition;

use indexmap::IndexMap;

/// Re-index per-claim evaluations by input descriptor.
///
/// Returns `(candidates, near_misses)`. `candidates` holds the claims that
/// satisfy each descriptor; `near_misses` the claims that had an accepted
/// format but failed on a required field. Format mismatches appear in
/// neither. Descriptors without any entry are omitted from a map rather than
/// mapped to an empty one.
pub fn split(
    definition: &PresentationDefinition,
    mut claims_evaluation: ClaimsEvaluation,
) -> (
    InputDescriptorEvaluationPerClaim,
    InputDescriptorEvaluationPerClaim,
) {
    let mut candidates = InputDescriptorEvaluationPerClaim::new();
    let mut near_misses = InputDescriptorEvaluationPerClaim::new();

    for input_descriptor in definition.input_descriptors() {
        let mut candidate_claims = IndexMap::new();
        let mut not_matching_claims = IndexMap::new();

        for (claim_id, per_descriptor) in claims_evaluation.iter_mut() {
            match per_descriptor.shift_remove(input_descriptor.id()) {
                Some(evaluation @ InputDescriptorEvaluation::CandidateClaim { .. }) => {
                    candidate_claims.insert(claim_id.clone(), evaluation);
                }
                Some(evaluation @ InputDescriptorEvaluation::NotMatchedFieldConstraints) => {
                    not_matching_claims.insert(claim_id.clone(), evaluation);
                }
                Some(InputDescriptorEvaluation::UnsupportedFormat) | None => {}
            }
        }

        if !candidate_claims.is_empty() {
            candidates.insert(input_descriptor.id().to_owned(), candidate_claims);
        }
        if !not_matching_claims.is_empty() {
            near_misses.insert(input_descriptor.id().to_owned(), not_matching_claims);
        }
    }

    (candidates, near_misses)
}
