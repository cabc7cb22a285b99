//! ACDC credential types (§3 Data Model: ACDC Credential).

use serde::{Deserialize, Serialize};

/// `a.registeredAddress` sub-object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredAddress {
    pub country: String,
}

/// `a` — the attributes block. Every field but `d`, `i`, `dt` is optional:
/// OOR (Official Organizational Role) credentials omit `LEI`, for example.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub d: String,
    pub i: String,
    pub dt: String,
    #[serde(rename = "LEI", skip_serializing_if = "Option::is_none")]
    pub lei: Option<String>,
    #[serde(
        rename = "personLegalName",
        skip_serializing_if = "Option::is_none"
    )]
    pub person_legal_name: Option<String>,
    #[serde(
        rename = "engagementContextRole",
        skip_serializing_if = "Option::is_none"
    )]
    pub engagement_context_role: Option<String>,
    #[serde(
        rename = "legalJurisdiction",
        skip_serializing_if = "Option::is_none"
    )]
    pub legal_jurisdiction: Option<String>,
    #[serde(
        rename = "registeredAddress",
        skip_serializing_if = "Option::is_none"
    )]
    pub registered_address: Option<RegisteredAddress>,
}

/// `e` — endorsements block (QVI chain-of-trust).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endorsements {
    pub d: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qvi: Option<serde_json::Value>,
}

/// `r` — rules block (usage/issuance disclaimers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub d: String,
    #[serde(
        rename = "usageDisclaimer",
        skip_serializing_if = "Option::is_none"
    )]
    pub usage_disclaimer: Option<String>,
    #[serde(
        rename = "issuanceDisclaimer",
        skip_serializing_if = "Option::is_none"
    )]
    pub issuance_disclaimer: Option<String>,
}

/// A fully-typed ACDC credential. See [`crate::parser::ParsedCredential`] for
/// the lenient, partially-populated form used while a credential is still
/// being validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acdc {
    pub v: String,
    pub d: String,
    pub i: String,
    pub ri: String,
    pub s: String,
    pub a: Attributes,
    pub e: Endorsements,
    pub r: Rules,
}
