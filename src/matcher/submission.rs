use super::evaluation::InputDescriptorEvaluationPerClaim;
use crate::core::presentation_definition::{
    PresentationDefinition, SubmissionRequirement, SubmissionRequirementBase,
};

use std::collections::HashSet;

use tracing::trace;

/// Decides whether the candidate claims satisfy the submission requirements
/// of a presentation definition.
///
/// An input descriptor counts as satisfied when it has at least one
/// candidate claim.
pub struct SubmissionEvaluator<'a> {
    definition: &'a PresentationDefinition,
    candidates: &'a InputDescriptorEvaluationPerClaim,
}

impl<'a> SubmissionEvaluator<'a> {
    pub fn new(
        definition: &'a PresentationDefinition,
        candidates: &'a InputDescriptorEvaluationPerClaim,
    ) -> Self {
        Self {
            definition,
            candidates,
        }
    }

    /// Return whether every requirement in `submission_requirements` holds.
    pub fn satisfies_all(&self, submission_requirements: &[SubmissionRequirement]) -> bool {
        submission_requirements
            .iter()
            .all(|requirement| self.is_satisfied(requirement))
    }

    /// `all` needs every selected item satisfied, and at least one item.
    /// `pick` needs enough satisfied items to make a selection of `count`,
    /// or at least `min`, items. Satisfied items beyond `max` are fine since
    /// the holder submits only some of them.
    ///
    /// The items are the input descriptors of the `from` group, or the
    /// nested requirements of `from_nested`.
    pub fn is_satisfied(&self, requirement: &SubmissionRequirement) -> bool {
        let (satisfied, total) = match requirement.base() {
            SubmissionRequirementBase::From { from, .. } => {
                let members: Vec<_> = self.definition.input_descriptors_in_group(from).collect();
                let satisfied = members
                    .iter()
                    .filter(|input_descriptor| self.candidates.contains_key(input_descriptor.id()))
                    .count();
                (satisfied, members.len())
            }
            SubmissionRequirementBase::FromNested { from_nested, .. } => {
                let satisfied = from_nested
                    .iter()
                    .filter(|nested| self.is_satisfied(nested))
                    .count();
                (satisfied, from_nested.len())
            }
        };

        let verdict = match requirement {
            SubmissionRequirement::All(_) => total > 0 && satisfied == total,
            SubmissionRequirement::Pick(pick) => pick.accepts(satisfied as u64),
        };

        trace!(
            requirement = requirement.name().map(String::as_str).unwrap_or_default(),
            satisfied,
            total,
            verdict,
            "Evaluated submission requirement"
        );

        verdict
    }

    /// Return the ids of the input descriptors reachable from the given
    /// requirements through their groups.
    pub fn referenced_input_descriptors(
        &self,
        submission_requirements: &[SubmissionRequirement],
    ) -> HashSet<&'a str> {
        let groups: HashSet<_> = submission_requirements
            .iter()
            .flat_map(SubmissionRequirement::groups)
            .collect();

        let definition = self.definition;
        definition
            .input_descriptors()
            .iter()
            .filter(|input_descriptor| {
                input_descriptor
                    .groups()
                    .iter()
                    .any(|group| groups.contains(group))
            })
            .map(|input_descriptor| input_descriptor.id())
            .collect()
    }
}
