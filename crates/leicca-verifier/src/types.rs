//! Shared request/response shapes for the VerifierClient (§4.2).

use serde::{Deserialize, Serialize};

/// Reconciled outcome of `verify_credential`, uniform across every HTTP
/// response shape the verifier can return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierResult {
    pub verified: bool,
    pub said_valid: bool,
    pub qvi_chain_valid: bool,
    pub registry_checked: bool,
    pub errors: Vec<String>,
}

/// Internal state-machine states for a single `verify_credential` call
/// (§4.2 state machine). Not exposed past the crate boundary — callers only
/// see the reconciled [`VerifierResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum VerifierState {
    Submitted(String),
    Authorized,
    Unauthorized(Vec<String>),
    CryptoFailed(Vec<String>),
    NotFound,
    Errored(Vec<String>),
}

#[derive(Debug, Serialize)]
pub(crate) struct OobiRequest {
    #[serde(rename = "oobi")]
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PresentationAccepted {
    pub aid: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VerifierErrorBody {
    #[serde(default)]
    pub msg: String,
    #[serde(default, rename = "info")]
    pub info: String,
}
