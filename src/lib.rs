//! This library matches a holder's claims against a [Presentation Exchange v2]
//! presentation definition.
//!
//! [Presentation Exchange v2]: <https://identity.foundation/presentation-exchange/spec/v2.0.0/>
//!
//! # Usage
//!
//! Build (or deserialize) a [`PresentationDefinition`], collect the holder's
//! decoded credentials as [`Claim`]s, and hand both to a
//! [`PresentationMatcher`]:
//!
//! ```ignore
//! use presentation_matcher::core::claim::Claim;
//! use presentation_matcher::core::presentation_definition::PresentationDefinition;
//! use presentation_matcher::matcher::{Match, PresentationMatcher};
//!
//! let definition = PresentationDefinition::try_from(serde_json::json!({
//!     "id": "age-check",
//!     "input_descriptors": [{
//!         "id": "adult",
//!         "format": { "jwt_vc_json": { "alg": ["ES256"] } },
//!         "constraints": {
//!             "fields": [{
//!                 "path": ["$.vc.credentialSubject.age"],
//!                 "filter": { "type": "number", "minimum": 18 }
//!             }]
//!         }
//!     }]
//! }))?;
//!
//! let claims = [Claim::new(
//!     "license",
//!     "jwt_vc_json",
//!     serde_json::json!({ "vc": { "credentialSubject": { "age": 21 } } }),
//! )];
//!
//! match PresentationMatcher::new().match_claims(&claims, &definition) {
//!     Match::Matched { matches } => {
//!         // Present the candidate claims of each input descriptor to the user.
//!     }
//!     Match::NotMatched { details } => {
//!         // `details` lists the claims that failed on field constraints.
//!     }
//! }
//! ```
//!
//! # Matching Overview
//!
//! 1. *Format gate*: a claim is only considered for an input descriptor when
//!    its format is accepted by the descriptor, or by the definition when the
//!    descriptor names no formats.
//! 2. *Field constraints*: every field of the descriptor is looked up in the
//!    claim document by path and checked against its filter. See
//!    [`matcher::field`] and [`matcher::filter`].
//! 3. *Aggregation*: the claim × descriptor outcomes are regrouped per input
//!    descriptor into candidates and near misses. See [`matcher::aggregate`].
//! 4. *Verdict*: every input descriptor needs a candidate, unless the
//!    definition declares submission requirements, which are then evaluated
//!    according to [`config::MatcherConfig`]. See [`matcher::submission`].
//!
//! Path queries and schema validation are pluggable through the
//! [`DocumentQuery`] and [`SchemaValidation`] traits.
//!
//! [`PresentationDefinition`]: crate::core::presentation_definition::PresentationDefinition
//! [`Claim`]: crate::core::claim::Claim
//! [`PresentationMatcher`]: crate::matcher::PresentationMatcher
//! [`DocumentQuery`]: crate::matcher::query::DocumentQuery
//! [`SchemaValidation`]: crate::matcher::filter::SchemaValidation

pub mod config;
pub mod core;
pub mod matcher;
pub mod utils;
