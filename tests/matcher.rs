use anyhow::Result;
use presentation_matcher::{
    config::{MatcherConfig, SubmissionRequirementsPolicy},
    core::{
        claim::Claim,
        input_descriptor::{Constraints, ConstraintsField, InputDescriptor},
        presentation_definition::PresentationDefinition,
    },
    matcher::{
        CandidateField, DocumentQuery, InputDescriptorEvaluation, JsonPathQuery,
        JsonSchemaValidation, Match, PresentationMatcher, SchemaValidation,
    },
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value as Json};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixture<T: DeserializeOwned>(json: &str) -> Result<T> {
    let jd = &mut serde_json::Deserializer::from_str(json);
    Ok(serde_path_to_error::deserialize(jd)?)
}

fn loan_application() -> Result<PresentationDefinition> {
    let definition: PresentationDefinition =
        fixture(include_str!("fixtures/loan_application.json"))?;
    definition.validate()?;
    Ok(definition)
}

fn loan_claims() -> Result<Vec<Claim>> {
    fixture(include_str!("fixtures/loan_claims.json"))
}

fn age_definition(filter: Json) -> PresentationDefinition {
    PresentationDefinition::new(
        "age-check",
        InputDescriptor::new(
            "adult",
            Constraints::new().add_constraint(
                ConstraintsField::new("$.vc.credentialSubject.age").set_filter(filter),
            ),
        )
        .set_format(
            serde_json::from_value(json!({ "jwt_vc_json": { "alg": ["ES256"] } }))
                .expect("valid format map"),
        ),
    )
}

fn age_claim(format: &str, age: Json) -> Claim {
    Claim::new(
        "license",
        format,
        json!({ "vc": { "credentialSubject": { "age": age } } }),
    )
}

/// Accepts every value, so any rejection must come from elsewhere.
struct AcceptAll;

impl SchemaValidation for AcceptAll {
    fn is_valid(&self, _: &Json, _: &Json) -> bool {
        true
    }
}

/// Resolves paths as JSON pointers instead of JSONPath expressions.
struct PointerQuery;

impl DocumentQuery for PointerQuery {
    fn query<'a>(&self, document: &'a Json, path: &str) -> Vec<&'a Json> {
        document.pointer(path).into_iter().collect()
    }
}

#[test]
fn adult_claim_matches() {
    init_tracing();

    let definition = age_definition(json!({ "type": "number", "minimum": 18 }));
    let claims = [age_claim("jwt_vc_json", json!(21))];

    let Match::Matched { matches } = PresentationMatcher::new().match_claims(&claims, &definition)
    else {
        panic!("expected a match");
    };

    assert_eq!(matches.keys().collect::<Vec<_>>(), ["adult"]);
    assert_eq!(matches["adult"].keys().collect::<Vec<_>>(), ["license"]);

    let InputDescriptorEvaluation::CandidateClaim { matches: fields } = &matches["adult"]["license"]
    else {
        panic!("expected a candidate claim");
    };
    assert_eq!(
        fields.iter().map(|m| &m.outcome).collect::<Vec<_>>(),
        [&CandidateField::Found {
            path: "$.vc.credentialSubject.age".into(),
            content: "21".into()
        }]
    );
}

#[test]
fn unsupported_format_is_dropped_from_the_verdict() {
    let definition = age_definition(json!({ "type": "number", "minimum": 18 }));
    let claims = [age_claim("ldp_vc", json!(21))];
    let matcher = PresentationMatcher::new();

    let evaluation = matcher.evaluate_claims(&claims, &definition);
    assert_eq!(
        evaluation["license"]["adult"],
        InputDescriptorEvaluation::UnsupportedFormat
    );

    assert_eq!(
        matcher.match_claims(&claims, &definition),
        Match::NotMatched {
            details: Default::default()
        }
    );
}

#[test]
fn rejected_filter_is_a_near_miss() {
    let definition = age_definition(json!({ "type": "number", "minimum": 18 }));
    let claims = [age_claim("jwt_vc_json", json!(16))];

    let Match::NotMatched { details } =
        PresentationMatcher::new().match_claims(&claims, &definition)
    else {
        panic!("expected no match");
    };

    assert_eq!(
        details["adult"]["license"],
        InputDescriptorEvaluation::NotMatchedFieldConstraints
    );
}

#[test]
fn invalid_calendar_date_is_rejected() {
    let definition = PresentationDefinition::new(
        "birthday",
        InputDescriptor::new(
            "born",
            Constraints::new().add_constraint(
                ConstraintsField::new("$.vc.credentialSubject.birthDate")
                    .set_filter(json!({ "type": "string", "format": "date" })),
            ),
        ),
    );
    let claim = |date: &str| {
        Claim::new(
            "id-card",
            "jwt_vc_json",
            json!({ "vc": { "credentialSubject": { "birthDate": date } } }),
        )
    };

    // Schema validation accepts everything here, so only the date check
    // can reject.
    let matcher = PresentationMatcher::with_capabilities(JsonPathQuery, AcceptAll);

    assert!(!matcher
        .match_claims(&[claim("2024-02-30")], &definition)
        .is_matched());
    assert!(matcher
        .match_claims(&[claim("2024-02-29")], &definition)
        .is_matched());
}

#[test]
fn every_descriptor_needs_a_candidate() {
    let definition = PresentationDefinition::new(
        "identity",
        InputDescriptor::new(
            "name",
            Constraints::new().add_constraint(ConstraintsField::new("$.givenName")),
        ),
    )
    .add_input_descriptors(InputDescriptor::new(
        "address",
        Constraints::new().add_constraint(ConstraintsField::new("$.address.locality")),
    ));

    let name = Claim::new("pid", "dc+sd-jwt", json!({ "givenName": "Ada" }));
    let address = Claim::new(
        "utility-bill",
        "ldp_vc",
        json!({ "address": { "locality": "London" } }),
    );
    let matcher = PresentationMatcher::new();

    assert!(matcher
        .match_claims(&[name.clone(), address], &definition)
        .is_matched());

    let Match::NotMatched { details } = matcher.match_claims(&[name], &definition) else {
        panic!("expected no match");
    };
    assert_eq!(details.keys().collect::<Vec<_>>(), ["address"]);
    assert_eq!(details["address"].keys().collect::<Vec<_>>(), ["pid"]);
}

#[test]
fn matching_is_idempotent() -> Result<()> {
    let definition = loan_application()?;
    let claims = loan_claims()?;
    let matcher = PresentationMatcher::new();

    assert_eq!(
        matcher.match_claims(&claims, &definition),
        matcher.match_claims(&claims, &definition)
    );
    Ok(())
}

#[test]
fn missing_optional_field_keeps_the_match() {
    let required = ConstraintsField::new("$.vc.credentialSubject.age");
    let optional = ConstraintsField::new("$.vc.credentialSubject.nickname").set_optional(true);
    let definition = PresentationDefinition::new(
        "age-check",
        InputDescriptor::new(
            "adult",
            Constraints::new()
                .add_constraint(required.clone())
                .add_constraint(optional.clone()),
        ),
    );
    let claims = [age_claim("jwt_vc_json", json!(30))];

    let Match::Matched { matches } = PresentationMatcher::new().match_claims(&claims, &definition)
    else {
        panic!("expected a match");
    };
    let InputDescriptorEvaluation::CandidateClaim { matches: fields } = &matches["adult"]["license"]
    else {
        panic!("expected a candidate claim");
    };

    assert!(fields.get(&required).is_some_and(CandidateField::is_found));
    assert_eq!(
        fields.get(&optional),
        Some(&CandidateField::OptionalFieldNotFound)
    );
}

#[test]
fn earlier_path_is_reported() {
    let document = json!({
        "vc": { "credentialSubject": { "givenName": "Ada" } },
        "credentialSubject": { "givenName": "Augusta" }
    });
    let claims = [Claim::new("pid", "jwt_vc_json", document)];

    let reported = |first: &str, second: &str| {
        let field = ConstraintsField::new(first).add_path(second);
        let definition = PresentationDefinition::new(
            "name",
            InputDescriptor::new("name", Constraints::new().add_constraint(field.clone())),
        );
        match PresentationMatcher::new().match_claims(&claims, &definition) {
            Match::Matched { matches } => match &matches["name"]["pid"] {
                InputDescriptorEvaluation::CandidateClaim { matches } => matches.get(&field).cloned(),
                _ => None,
            },
            Match::NotMatched { .. } => None,
        }
    };

    assert_eq!(
        reported("$.vc.credentialSubject.givenName", "$.credentialSubject.givenName"),
        Some(CandidateField::Found {
            path: "$.vc.credentialSubject.givenName".into(),
            content: "Ada".into()
        })
    );
    assert_eq!(
        reported("$.credentialSubject.givenName", "$.vc.credentialSubject.givenName"),
        Some(CandidateField::Found {
            path: "$.credentialSubject.givenName".into(),
            content: "Augusta".into()
        })
    );
}

#[test]
fn submission_requirements_select_groups() -> Result<()> {
    init_tracing();

    let definition = loan_application()?;
    let claims = loan_claims()?;
    let matcher = PresentationMatcher::new();

    let evaluation = matcher.evaluate_claims(&claims, &definition);
    assert!(evaluation["badge"]
        .values()
        .all(|evaluation| *evaluation == InputDescriptorEvaluation::UnsupportedFormat));

    let Match::Matched { matches } = matcher.match_claims(&claims, &definition) else {
        panic!("expected a match");
    };

    // `passport` has a candidate but no requirement selects group C.
    assert_eq!(
        matches.keys().collect::<Vec<_>>(),
        ["bank_statement", "employment"]
    );
    assert_eq!(
        matches["bank_statement"].keys().collect::<Vec<_>>(),
        ["statement"]
    );
    assert_eq!(matches["employment"].keys().collect::<Vec<_>>(), ["payslip"]);
    Ok(())
}

fn debit_card() -> Result<Claim> {
    Claim::try_from(json!({
        "id": "debit-card",
        "format": "jwt_vc_json",
        "document": { "vc": { "credentialSubject": { "pan": "4111111111111111" } } }
    }))
}

#[test]
fn surplus_banking_credential_still_matches() -> Result<()> {
    let definition = loan_application()?;
    let mut claims = loan_claims()?;
    claims.push(debit_card()?);

    // Both banking descriptors have candidates while `count: 1` asks for one.
    let Match::Matched { matches } = PresentationMatcher::new().match_claims(&claims, &definition)
    else {
        panic!("a surplus banking credential must not fail `count: 1`");
    };
    assert_eq!(
        matches.keys().collect::<Vec<_>>(),
        ["bank_statement", "bank_card", "employment"]
    );
    assert_eq!(matches["bank_card"].keys().collect::<Vec<_>>(), ["debit-card"]);
    Ok(())
}

#[test]
fn pick_max_caps_the_selection_not_the_candidates() -> Result<()> {
    let mut value: Json = fixture(include_str!("fixtures/loan_application.json"))?;
    value["submission_requirements"][0] =
        json!({ "name": "Banking", "rule": "pick", "min": 1, "max": 1, "from": "A" });
    let definition = PresentationDefinition::try_from(value)?;

    let mut claims = loan_claims()?;
    let matcher = PresentationMatcher::new();
    assert!(matcher.match_claims(&claims, &definition).is_matched());

    claims.push(debit_card()?);
    assert!(matcher.match_claims(&claims, &definition).is_matched());
    Ok(())
}

#[test]
fn failed_requirements_report_selected_near_misses() -> Result<()> {
    let definition = loan_application()?;
    let claims: Vec<Claim> = loan_claims()?
        .into_iter()
        .filter(|claim| claim.id() != "payslip")
        .collect();

    let Match::NotMatched { details } =
        PresentationMatcher::new().match_claims(&claims, &definition)
    else {
        panic!("group B has no candidate");
    };

    // `passport` belongs to group C, which no requirement selects.
    assert_eq!(
        details.keys().collect::<Vec<_>>(),
        ["bank_statement", "bank_card", "employment"]
    );
    assert!(details
        .values()
        .all(|per_claim| !per_claim.contains_key("badge")));
    assert_eq!(
        details["bank_card"].keys().collect::<Vec<_>>(),
        ["statement", "passport"]
    );
    Ok(())
}

#[test]
fn reject_policy_never_matches_submission_requirements() -> Result<()> {
    let definition = loan_application()?;
    let claims = loan_claims()?;
    let config: MatcherConfig = serde_json::from_value(json!({
        "submission_requirements": "reject"
    }))?;
    assert_eq!(
        config.submission_requirements,
        SubmissionRequirementsPolicy::Reject
    );

    assert_eq!(
        PresentationMatcher::from_config(config).match_claims(&claims, &definition),
        Match::NotMatched {
            details: Default::default()
        }
    );
    Ok(())
}

#[test]
fn custom_query_capability() {
    let definition = PresentationDefinition::new(
        "age-check",
        InputDescriptor::new(
            "adult",
            Constraints::new().add_constraint(
                ConstraintsField::new("/vc/credentialSubject/age")
                    .set_filter(json!({ "type": "number", "minimum": 18 })),
            ),
        ),
    );
    let claims = [age_claim("jwt_vc_json", json!(21))];

    assert!(
        PresentationMatcher::with_capabilities(PointerQuery, JsonSchemaValidation)
            .match_claims(&claims, &definition)
            .is_matched()
    );
    assert!(!PresentationMatcher::new()
        .match_claims(&claims, &definition)
        .is_matched());
}

#[test]
fn verdict_serialization() -> Result<()> {
    let definition = age_definition(json!({ "type": "number", "minimum": 18 }));
    let matcher = PresentationMatcher::new();

    let matched = serde_json::to_value(
        matcher.match_claims(&[age_claim("jwt_vc_json", json!(21))], &definition),
    )?;
    assert_eq!(matched["match"], "matched");
    assert_eq!(
        matched["matches"]["adult"]["license"]["evaluation"],
        "candidate_claim"
    );
    assert_eq!(
        matched["matches"]["adult"]["license"]["matches"][0]["outcome"],
        json!({
            "outcome": "found",
            "path": "$.vc.credentialSubject.age",
            "content": "21"
        })
    );

    let not_matched = serde_json::to_value(
        matcher.match_claims(&[age_claim("jwt_vc_json", json!(16))], &definition),
    )?;
    assert_eq!(
        not_matched,
        json!({
            "match": "not_matched",
            "details": {
                "adult": { "license": { "evaluation": "not_matched_field_constraints" } }
            }
        })
    );
    Ok(())
}

#[test]
fn duplicate_descriptor_ids_are_rejected() {
    let error = PresentationDefinition::try_from(json!({
        "id": "duplicates",
        "input_descriptors": [
            { "id": "same", "constraints": {} },
            { "id": "same", "constraints": {} }
        ]
    }))
    .unwrap_err();

    assert!(error.to_string().contains("same"));
}
