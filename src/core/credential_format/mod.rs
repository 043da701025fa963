use core::fmt;
use std::{borrow::Cow, collections::HashMap, str::FromStr};

use serde::{Deserialize, Serialize};

const FORMAT_JWT: &str = "jwt";
const FORMAT_JWT_VC: &str = "jwt_vc";
const FORMAT_JWT_VP: &str = "jwt_vp";
const FORMAT_JWT_VC_JSON: &str = "jwt_vc_json";
const FORMAT_JWT_VP_JSON: &str = "jwt_vp_json";
const FORMAT_LDP: &str = "ldp";
const FORMAT_LDP_VC: &str = "ldp_vc";
const FORMAT_LDP_VP: &str = "ldp_vp";
const FORMAT_DC_SD_JWT: &str = "dc+sd-jwt";
const FORMAT_MSO_MDOC: &str = "mso_mdoc";

/// A JSON object of accepted claim formats, keyed by designation.
///
/// Both the presentation definition and each input descriptor may carry one.
/// The matcher only looks at the keys: a claim is format-compatible when its
/// designation is one of them. The payloads (algorithms, proof types) are
/// kept so a definition survives a serialization round trip untouched.
pub type ClaimFormatMap = HashMap<ClaimFormatDesignation, ClaimFormatPayload>;

/// The algorithm constraints attached to an accepted claim format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ClaimFormatPayload {
    #[serde(rename = "alg")]
    Alg(Vec<String>),
    /// Used by `jwt_vc_json` and `jwt_vp_json` in OID4VP metadata.
    #[serde(rename = "alg_values_supported")]
    AlgValuesSupported(Vec<String>),
    #[serde(rename = "proof_type")]
    ProofType(Vec<String>),
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl ClaimFormatPayload {
    /// Return the algorithm or proof type identifiers of the payload, if any.
    pub fn identifiers(&self) -> &[String] {
        match self {
            Self::Alg(values) | Self::AlgValuesSupported(values) | Self::ProofType(values) => {
                values
            }
            Self::Other(_) => &[],
        }
    }
}

/// The designation of a claim format, e.g. `jwt_vc_json` or `ldp_vc`.
///
/// Registry of claim format designations: <https://identity.foundation/claim-format-registry/#registry>
///
/// Unknown designations are preserved verbatim in [`ClaimFormatDesignation::Other`],
/// so format gating compares them by name like any registered one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClaimFormatDesignation {
    /// A JSON Web Token as defined by RFC7519.
    Jwt,

    /// A W3C Verifiable Credential secured as a JWT.
    JwtVc,

    /// A W3C Verifiable Presentation secured as a JWT.
    JwtVp,

    JwtVcJson,

    JwtVpJson,

    /// A Linked-Data Proof submitted as an object.
    Ldp,

    /// A W3C Verifiable Credential secured with a Linked Data Proof.
    LdpVc,

    LdpVp,

    /// An IETF SD-JWT Verifiable Credential.
    DcSdJwt,

    /// An ISO/IEC 18013-5 mobile document.
    MsoMDoc,

    /// Any designation not listed above, kept by name.
    Other(String),
}

impl ClaimFormatDesignation {
    pub fn from_name(name: Cow<str>) -> Self {
        match name.as_ref() {
            FORMAT_JWT => Self::Jwt,
            FORMAT_JWT_VC => Self::JwtVc,
            FORMAT_JWT_VP => Self::JwtVp,
            FORMAT_JWT_VC_JSON => Self::JwtVcJson,
            FORMAT_JWT_VP_JSON => Self::JwtVpJson,
            FORMAT_LDP => Self::Ldp,
            FORMAT_LDP_VC => Self::LdpVc,
            FORMAT_LDP_VP => Self::LdpVp,
            FORMAT_DC_SD_JWT => Self::DcSdJwt,
            FORMAT_MSO_MDOC => Self::MsoMDoc,
            _ => Self::Other(name.into_owned()),
        }
    }

    /// Return the registered name of the designation.
    pub fn name(&self) -> &str {
        match self {
            Self::Jwt => FORMAT_JWT,
            Self::JwtVc => FORMAT_JWT_VC,
            Self::JwtVp => FORMAT_JWT_VP,
            Self::JwtVcJson => FORMAT_JWT_VC_JSON,
            Self::JwtVpJson => FORMAT_JWT_VP_JSON,
            Self::Ldp => FORMAT_LDP,
            Self::LdpVc => FORMAT_LDP_VC,
            Self::LdpVp => FORMAT_LDP_VP,
            Self::DcSdJwt => FORMAT_DC_SD_JWT,
            Self::MsoMDoc => FORMAT_MSO_MDOC,
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for ClaimFormatDesignation {
    fn from(s: &str) -> Self {
        Self::from_name(Cow::Borrowed(s))
    }
}

impl From<String> for ClaimFormatDesignation {
    fn from(value: String) -> Self {
        Self::from_name(Cow::Owned(value))
    }
}

impl FromStr for ClaimFormatDesignation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.into())
    }
}

impl From<ClaimFormatDesignation> for String {
    fn from(format: ClaimFormatDesignation) -> Self {
        match format {
            ClaimFormatDesignation::Other(other) => other,
            registered => registered.name().to_owned(),
        }
    }
}

impl fmt::Display for ClaimFormatDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl Serialize for ClaimFormatDesignation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.name().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ClaimFormatDesignation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Into::into)
    }
}
