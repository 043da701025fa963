use super::credential_format::ClaimFormatDesignation;

use anyhow::{Context, Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

/// The identifier of a [Claim], chosen by the holder.
pub type ClaimId = String;

/// A credential offered by the holder for matching.
///
/// The `document` is the already-decoded credential payload, e.g. the claims
/// set of a `jwt_vc_json` credential or the expanded object of an `ldp_vc`.
/// Field constraint paths are evaluated against it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claim {
    id: ClaimId,
    format: ClaimFormatDesignation,
    document: Json,
}

impl Claim {
    pub fn new(
        id: impl Into<ClaimId>,
        format: impl Into<ClaimFormatDesignation>,
        document: Json,
    ) -> Self {
        Self {
            id: id.into(),
            format: format.into(),
            document,
        }
    }

    pub fn id(&self) -> &ClaimId {
        &self.id
    }

    pub fn format(&self) -> &ClaimFormatDesignation {
        &self.format
    }

    pub fn document(&self) -> &Json {
        &self.document
    }
}

impl TryFrom<Json> for Claim {
    type Error = Error;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        serde_json::from_value(value).context("Failed to deserialize claim.")
    }
}
