use serde::{Deserialize, Serialize};

/// Matcher configuration.
///
/// Deserializable so it can be embedded in a host application's own
/// configuration file. Missing keys fall back to [`MatcherConfig::default`].
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct MatcherConfig {
    pub submission_requirements: SubmissionRequirementsPolicy,
}

/// How the matcher treats a presentation definition that declares
/// `submission_requirements`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionRequirementsPolicy {
    /// Evaluate `all`/`pick` rules over groups and nested requirements.
    #[default]
    Evaluate,
    /// Never match a definition with submission requirements; the verdict is
    /// `NotMatched` with no details.
    Reject,
}
