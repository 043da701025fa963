use crate::core::{
    claim::ClaimId,
    input_descriptor::{ConstraintsField, InputDescriptorId, JsonPath},
};

use indexmap::IndexMap;
use serde::Serialize;

/// Per-claim evaluations, keyed by claim then by input descriptor.
pub type ClaimsEvaluation =
    IndexMap<ClaimId, IndexMap<InputDescriptorId, InputDescriptorEvaluation>>;

/// Per-descriptor evaluations, keyed by input descriptor then by claim.
pub type InputDescriptorEvaluationPerClaim =
    IndexMap<InputDescriptorId, IndexMap<ClaimId, InputDescriptorEvaluation>>;

/// The outcome of one field constraint against one claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CandidateField {
    /// A value at `path` passed the field filter. `content` is the value in
    /// string form.
    Found { path: JsonPath, content: String },
    OptionalFieldNotFound,
    RequiredFieldNotFound,
}

impl CandidateField {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    pub field: ConstraintsField,
    pub outcome: CandidateField,
}

/// The outcome of every field constraint of an input descriptor against one
/// claim, in the order the fields are declared.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldMatches(Vec<FieldMatch>);

impl FieldMatches {
    /// Return the outcome recorded for `field`, if it was evaluated.
    pub fn get(&self, field: &ConstraintsField) -> Option<&CandidateField> {
        self.0
            .iter()
            .find(|field_match| &field_match.field == field)
            .map(|field_match| &field_match.outcome)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldMatch> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return whether a required field found no acceptable value.
    pub fn has_required_miss(&self) -> bool {
        self.0
            .iter()
            .any(|field_match| field_match.outcome == CandidateField::RequiredFieldNotFound)
    }
}

impl FromIterator<FieldMatch> for FieldMatches {
    fn from_iter<I: IntoIterator<Item = FieldMatch>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FieldMatches {
    type Item = &'a FieldMatch;
    type IntoIter = std::slice::Iter<'a, FieldMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The outcome of one input descriptor against one claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "evaluation", rename_all = "snake_case")]
pub enum InputDescriptorEvaluation {
    /// The claim format is not accepted. Fields were not evaluated.
    UnsupportedFormat,
    /// The format is accepted but a required field found no value.
    NotMatchedFieldConstraints,
    /// The claim satisfies the descriptor.
    CandidateClaim { matches: FieldMatches },
}

impl InputDescriptorEvaluation {
    pub fn is_candidate(&self) -> bool {
        matches!(self, Self::CandidateClaim { .. })
    }
}

/// The verdict for a whole presentation definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum Match {
    /// Candidate claims for every required input descriptor.
    Matched {
        matches: InputDescriptorEvaluationPerClaim,
    },
    /// Claims that had an accepted format but failed on fields. Descriptors
    /// whose only failures were format mismatches are absent.
    NotMatched {
        details: InputDescriptorEvaluationPerClaim,
    },
}

impl Match {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}
