pub mod aggregate;
pub mod descriptor;
pub mod evaluation;
pub mod field;
pub mod filter;
pub mod query;
pub mod submission;

pub use evaluation::{
    CandidateField, ClaimsEvaluation, FieldMatch, FieldMatches, InputDescriptorEvaluation,
    InputDescriptorEvaluationPerClaim, Match,
};
pub use filter::{FilterEvaluator, JsonSchemaValidation, SchemaValidation};
pub use query::{DocumentQuery, JsonPathQuery};

use self::{descriptor::DescriptorEvaluator, field::FieldMatcher, submission::SubmissionEvaluator};
use crate::{
    config::{MatcherConfig, SubmissionRequirementsPolicy},
    core::{claim::Claim, presentation_definition::PresentationDefinition},
};

use indexmap::IndexMap;
use tracing::{debug, trace};

/// Matches a holder's claims against a presentation definition.
///
/// Path queries and schema validation are capabilities: the defaults are
/// [JsonPathQuery] and [JsonSchemaValidation], and
/// [PresentationMatcher::with_capabilities] swaps in other implementations.
///
/// Matching is pure. The same claims and definition always produce the same
/// [Match].
#[derive(Clone, Debug)]
pub struct PresentationMatcher<Q = JsonPathQuery, V = JsonSchemaValidation> {
    query: Q,
    filter: FilterEvaluator<V>,
    config: MatcherConfig,
}

impl PresentationMatcher {
    pub fn new() -> Self {
        Self::with_capabilities(JsonPathQuery, JsonSchemaValidation)
    }

    pub fn from_config(config: MatcherConfig) -> Self {
        Self::new().with_config(config)
    }
}

impl Default for PresentationMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: DocumentQuery, V: SchemaValidation> PresentationMatcher<Q, V> {
    pub fn with_capabilities(query: Q, validation: V) -> Self {
        Self {
            query,
            filter: FilterEvaluator::new(validation),
            config: MatcherConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Evaluate every claim against every input descriptor of `definition`.
    ///
    /// The result is keyed by claim id in input order, then by input
    /// descriptor id in definition order. Claims sharing an id collapse into
    /// the last one evaluated.
    pub fn evaluate_claims(
        &self,
        claims: &[Claim],
        definition: &PresentationDefinition,
    ) -> ClaimsEvaluation {
        let evaluator = DescriptorEvaluator::new(FieldMatcher::new(&self.query, &self.filter));
        let definition_formats = definition.formats();

        claims
            .iter()
            .map(|claim| {
                let per_descriptor: IndexMap<_, _> = definition
                    .input_descriptors()
                    .iter()
                    .map(|input_descriptor| {
                        let evaluation =
                            evaluator.evaluate(input_descriptor, claim, definition_formats);
                        trace!(
                            claim = %claim.id(),
                            input_descriptor = %input_descriptor.id(),
                            ?evaluation,
                            "Evaluated input descriptor"
                        );
                        (input_descriptor.id().to_owned(), evaluation)
                    })
                    .collect();
                (claim.id().clone(), per_descriptor)
            })
            .collect()
    }

    /// Decide whether `claims` satisfy `definition`.
    ///
    /// Never fails: unsupported formats, missing fields and rejected filters
    /// are all reported through the returned [Match].
    pub fn match_claims(&self, claims: &[Claim], definition: &PresentationDefinition) -> Match {
        let claims_evaluation = self.evaluate_claims(claims, definition);
        let (candidates, near_misses) = aggregate::split(definition, claims_evaluation);
        let verdict = self.evaluate(definition, candidates, near_misses);

        debug!(
            definition = %definition.id(),
            claims = claims.len(),
            matched = verdict.is_matched(),
            "Matched claims against presentation definition"
        );

        verdict
    }

    /// Turn the per-descriptor candidates into a verdict for the whole
    /// definition.
    ///
    /// An empty list of submission requirements is treated like an absent
    /// one. Under submission requirements both the matches and the near
    /// misses are limited to the input descriptors the requirements select.
    pub fn evaluate(
        &self,
        definition: &PresentationDefinition,
        candidates: InputDescriptorEvaluationPerClaim,
        near_misses: InputDescriptorEvaluationPerClaim,
    ) -> Match {
        let submission_requirements = definition
            .submission_requirements()
            .filter(|requirements| !requirements.is_empty());

        let Some(submission_requirements) = submission_requirements else {
            let complete = definition
                .input_descriptors()
                .iter()
                .all(|input_descriptor| candidates.contains_key(input_descriptor.id()));

            return if complete {
                Match::Matched {
                    matches: candidates,
                }
            } else {
                Match::NotMatched {
                    details: near_misses,
                }
            };
        };

        match self.config.submission_requirements {
            SubmissionRequirementsPolicy::Reject => {
                debug!(
                    definition = %definition.id(),
                    "Rejecting presentation definition with submission requirements"
                );
                Match::NotMatched {
                    details: InputDescriptorEvaluationPerClaim::new(),
                }
            }
            SubmissionRequirementsPolicy::Evaluate => {
                let evaluator = SubmissionEvaluator::new(definition, &candidates);
                let referenced = evaluator.referenced_input_descriptors(submission_requirements);

                if !evaluator.satisfies_all(submission_requirements) {
                    let details = near_misses
                        .into_iter()
                        .filter(|(input_descriptor_id, _)| {
                            referenced.contains(input_descriptor_id.as_str())
                        })
                        .collect();
                    return Match::NotMatched { details };
                }

                let matches = candidates
                    .iter()
                    .filter(|(input_descriptor_id, _)| {
                        referenced.contains(input_descriptor_id.as_str())
                    })
                    .map(|(input_descriptor_id, claims)| {
                        (input_descriptor_id.clone(), claims.clone())
                    })
                    .collect();

                Match::Matched { matches }
            }
        }
    }
}
