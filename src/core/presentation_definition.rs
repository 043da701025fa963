use super::credential_format::*;
use super::input_descriptor::*;

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Context, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// A presentation definition is a JSON object that describes the information a [Verifier](https://identity.foundation/presentation-exchange/spec/v2.0.0/#term:verifier) requires of a [Holder](https://identity.foundation/presentation-exchange/spec/v2.0.0/#term:holder).
///
/// Presentation Definitions are composed of inputs, which describe the forms and details of the
/// proofs they require, and optional sets of selection rules, to allow [Holder](https://identity.foundation/presentation-exchange/spec/v2.0.0/#term:holder)s flexibility
/// in cases where different types of proofs may satisfy an input requirement.
///
/// For more information, see: [https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-definition](https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-definition)
#[derive(Clone, Default, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresentationDefinition {
    id: String,
    input_descriptors: Vec<InputDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    submission_requirements: Option<Vec<SubmissionRequirement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<ClaimFormatMap>,
}

impl PresentationDefinition {
    /// The Presentation Definition MUST contain an id property and at least
    /// one input descriptor.
    pub fn new(id: impl Into<String>, input_descriptor: InputDescriptor) -> Self {
        Self {
            id: id.into(),
            input_descriptors: vec![input_descriptor],
            ..Default::default()
        }
    }

    /// Return the id of the presentation definition.
    pub fn id(&self) -> &String {
        &self.id
    }

    /// Add a new input descriptor to the presentation definition.
    pub fn add_input_descriptors(mut self, input_descriptor: InputDescriptor) -> Self {
        self.input_descriptors.push(input_descriptor);
        self
    }

    /// Return the input descriptors of the presentation definition, in declared order.
    pub fn input_descriptors(&self) -> &Vec<InputDescriptor> {
        &self.input_descriptors
    }

    /// Set the name of the presentation definition.
    pub fn set_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Return the name of the presentation definition.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set the purpose of the presentation definition.
    pub fn set_purpose(mut self, purpose: String) -> Self {
        self.purpose = Some(purpose);
        self
    }

    /// Return the purpose of the presentation definition.
    pub fn purpose(&self) -> Option<&String> {
        self.purpose.as_ref()
    }

    /// Attach a format to the presentation definition.
    ///
    /// The definition-level format applies to every input descriptor that
    /// does not declare a format of its own.
    ///
    /// See: [https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-definition](https://identity.foundation/presentation-exchange/spec/v2.0.0/#presentation-definition)
    pub fn set_format(mut self, format: ClaimFormatMap) -> Self {
        self.format = Some(format);
        self
    }

    /// Add a new format to the presentation definition.
    pub fn add_format(mut self, format: ClaimFormatDesignation, value: ClaimFormatPayload) -> Self {
        self.format
            .get_or_insert_with(HashMap::new)
            .insert(format, value);
        self
    }

    /// Return the format of the presentation definition.
    pub fn format(&self) -> Option<&ClaimFormatMap> {
        self.format.as_ref()
    }

    /// Return the accepted formats, or `None` when the definition does not
    /// restrict them. An empty map is treated as absent.
    pub fn formats(&self) -> Option<&ClaimFormatMap> {
        self.format.as_ref().filter(|format| !format.is_empty())
    }

    /// Set the submission requirements of the presentation definition.
    pub fn set_submission_requirements(
        mut self,
        submission_requirements: Vec<SubmissionRequirement>,
    ) -> Self {
        self.submission_requirements = Some(submission_requirements);
        self
    }

    /// Return the submission requirements of the presentation definition.
    pub fn submission_requirements(&self) -> Option<&Vec<SubmissionRequirement>> {
        self.submission_requirements.as_ref()
    }

    /// Return the input descriptors that belong to the given group.
    pub fn input_descriptors_in_group<'a>(
        &'a self,
        group: &'a str,
    ) -> impl Iterator<Item = &'a InputDescriptor> + 'a {
        self.input_descriptors
            .iter()
            .filter(move |input_descriptor| input_descriptor.is_member_of(group))
    }

    /// Check the structural invariants of the presentation definition.
    ///
    /// - input descriptor ids are unique;
    /// - every group named by a submission requirement is used by at least
    ///   one input descriptor;
    /// - `pick` bounds are consistent.
    pub fn validate(&self) -> Result<()> {
        if self.input_descriptors.is_empty() {
            bail!("Presentation definition `{}` has no input descriptors.", self.id)
        }

        let mut seen = HashSet::new();
        for input_descriptor in self.input_descriptors.iter() {
            if !seen.insert(input_descriptor.id()) {
                bail!(
                    "Duplicate input descriptor id `{}` in presentation definition `{}`.",
                    input_descriptor.id(),
                    self.id
                )
            }
        }

        for submission_requirement in self.submission_requirements.iter().flatten() {
            submission_requirement
                .validate()
                .context("Invalid submission requirement.")?;

            for group in submission_requirement.groups() {
                if self.input_descriptors_in_group(group).next().is_none() {
                    bail!("Submission requirement references unknown group `{group}`.")
                }
            }
        }

        Ok(())
    }
}

impl TryFrom<Json> for PresentationDefinition {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        let definition: Self = serde_json::from_value(value)
            .context("Failed to deserialize presentation definition.")?;
        definition.validate()?;
        Ok(definition)
    }
}

/// Human-readable metadata shared by every submission requirement.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct SubmissionRequirementObject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// The source a submission requirement selects from: a group of input
/// descriptors, or a list of nested submission requirements.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SubmissionRequirementBase {
    From {
        from: GroupId,
        #[serde(flatten)]
        submission_requirement_base: SubmissionRequirementObject,
    },
    FromNested {
        from_nested: Vec<SubmissionRequirement>,
        #[serde(flatten)]
        submission_requirement_base: SubmissionRequirementObject,
    },
}

impl SubmissionRequirementBase {
    /// Select from the input descriptors of a group.
    pub fn from_group(group: impl Into<GroupId>) -> Self {
        Self::From {
            from: group.into(),
            submission_requirement_base: SubmissionRequirementObject::default(),
        }
    }

    /// Select from nested submission requirements.
    pub fn from_nested(from_nested: Vec<SubmissionRequirement>) -> Self {
        Self::FromNested {
            from_nested,
            submission_requirement_base: SubmissionRequirementObject::default(),
        }
    }

    /// Return the name and purpose of the requirement.
    pub fn object(&self) -> &SubmissionRequirementObject {
        match self {
            Self::From {
                submission_requirement_base,
                ..
            }
            | Self::FromNested {
                submission_requirement_base,
                ..
            } => submission_requirement_base,
        }
    }
}

/// A submission requirement selects which input descriptors must be
/// satisfied, by `rule`: `all` of them, or a `pick` bounded by
/// `count`/`min`/`max`.
///
/// See: [https://identity.foundation/presentation-exchange/spec/v2.0.0/#submission-requirements](https://identity.foundation/presentation-exchange/spec/v2.0.0/#submission-requirements)
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SubmissionRequirement {
    All(SubmissionRequirementBase),
    Pick(SubmissionRequirementPick),
}

impl SubmissionRequirement {
    /// Return the source this requirement selects from.
    pub fn base(&self) -> &SubmissionRequirementBase {
        match self {
            Self::All(base) => base,
            Self::Pick(pick) => &pick.submission_requirement,
        }
    }

    /// Return the name of the requirement, if any.
    pub fn name(&self) -> Option<&String> {
        self.base().object().name.as_ref()
    }

    /// Return every group referenced by this requirement, including nested ones.
    pub fn groups(&self) -> Vec<&GroupId> {
        match self.base() {
            SubmissionRequirementBase::From { from, .. } => vec![from],
            SubmissionRequirementBase::FromNested { from_nested, .. } => from_nested
                .iter()
                .flat_map(SubmissionRequirement::groups)
                .collect(),
        }
    }

    fn validate(&self) -> Result<()> {
        if let Self::Pick(pick) = self {
            if let (Some(min), Some(max)) = (pick.min, pick.max) {
                if min > max {
                    bail!("Pick requirement has min {min} greater than max {max}.")
                }
            }
            if let (Some(count), Some(max)) = (pick.count, pick.max) {
                if count > max {
                    bail!("Pick requirement has count {count} greater than max {max}.")
                }
            }
        }

        if let SubmissionRequirementBase::FromNested { from_nested, .. } = self.base() {
            if from_nested.is_empty() {
                bail!("Nested submission requirement list is empty.")
            }
            for nested in from_nested {
                nested.validate()?;
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SubmissionRequirementPick {
    #[serde(flatten)]
    pub submission_requirement: SubmissionRequirementBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl SubmissionRequirementPick {
    pub fn new(submission_requirement: SubmissionRequirementBase) -> Self {
        Self {
            submission_requirement,
            count: None,
            min: None,
            max: None,
        }
    }

    pub fn set_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    pub fn set_min(mut self, min: u64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn set_max(mut self, max: u64) -> Self {
        self.max = Some(max);
        self
    }

    /// The number of items a submission must include: `count` when present,
    /// else `min`, else one.
    pub fn required(&self) -> u64 {
        self.count.or(self.min).unwrap_or(1)
    }

    /// Return whether a selection obeying the rule can be made from
    /// `available` satisfied items.
    ///
    /// `max` caps how many items are submitted, not how many the holder may
    /// have, so a surplus never fails the rule.
    pub fn accepts(&self, available: u64) -> bool {
        available >= self.required()
    }
}
