//! Audit Capsule v1.0.0 data model (§3 Audit Capsule, §3 Public Tags).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use leicca_core::types::{ClassificationResult, EvidenceFile, VerificationResult};

pub const CAPSULE_VERSION: &str = "1.0.0";
pub const PROJECT: &str = "leicca-vlei-classifier";
pub const BASKET: &str = "leicca-vlei-audit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapsuleMetadata {
    pub timestamp: DateTime<Utc>,
    pub project: String,
    pub basket: String,
    #[serde(rename = "recordId")]
    pub record_id: String,
}

/// What gets sealed into the envelope and anchored. Evidence bytes never
/// appear here — only their hashes (`EvidenceFile::sha256_hex`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditCapsule {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<ClassificationResult>,
    pub evidence: Vec<EvidenceFile>,
    pub metadata: CapsuleMetadata,
}

/// Attached to the anchoring transaction's output. Never contains credential
/// bodies or anything from `classification` beyond what's already public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicTags {
    #[serde(rename = "type")]
    pub tag_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lei: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "recordId")]
    pub record_id: String,
}
