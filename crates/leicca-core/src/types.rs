//! Shared domain records produced by the verifier (L3) and decision engine
//! (L4), consumed by the capsule builder (L5).
//!
//! These stay in `leicca-core` rather than their producing crate so that
//! `leicca-capsule` does not have to depend on `leicca-verifier` /
//! `leicca-decision` just to name the shapes it seals into a capsule —
//! mirroring how `vex-core::audit::AuditEvent` is a shared record type that
//! several higher crates (`vex-api`, `vex-persist`) build on without
//! depending on each other.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hash::Hash;

/// Outcome of KEL-state capture for an issuer AID (CredentialParser, L2).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KelState {
    pub issuer_did: String,
    pub sequence_number: u64,
    pub last_event_said: String,
    pub captured_at: DateTime<Utc>,
}

/// Verification status, the coarse outcome surfaced to the decision engine
/// and capsule builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Invalid,
    Revoked,
}

/// The four checks a presentation/authorization round runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationChecks {
    pub said_validation: bool,
    pub qvi_chain: bool,
    pub registry_check: bool,
    pub timestamp: bool,
}

/// Result of running a credential through the VerifierClient (L3) protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub verified: bool,
    pub status: VerificationStatus,
    /// Open mapping escape hatch: whatever summary fields the verifier or
    /// caller chooses to attach (LEI, jurisdiction, legal name, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_summary: Option<serde_json::Value>,
    pub checks: VerificationChecks,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kel_state: Option<KelState>,
}

/// One step of a decision-tree traversal (DecisionEngine, L4).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPathEntry {
    pub node_id: String,
    pub node_text: String,
    pub answer: String,
}

/// Terminal outcome of a decision-tree traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub panel_id: String,
    pub classification: String,
    pub category: String,
    pub description: String,
    pub success: bool,
    pub decision_path: Vec<DecisionPathEntry>,
}

/// An evidence file's provenance — only the hash is ever persisted to chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceFile {
    pub filename: String,
    pub size: u64,
    pub mimetype: String,
    pub sha256_hex: String,
    pub uploaded_at: DateTime<Utc>,
}

impl EvidenceFile {
    /// Hash `bytes` and build the evidence record. `sha256_hex` is always a
    /// 64-char lowercase hex string.
    pub fn from_bytes(filename: impl Into<String>, mimetype: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            filename: filename.into(),
            size: bytes.len() as u64,
            mimetype: mimetype.into(),
            sha256_hex: Hash::digest(bytes).to_hex(),
            uploaded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evidence_file_hash_is_64_hex_chars() {
        let file = EvidenceFile::from_bytes("report.pdf", "application/pdf", b"contents");
        assert_eq!(file.sha256_hex.len(), 64);
        assert_eq!(file.size, 8);
    }

    #[test]
    fn verification_result_round_trips_through_json() {
        let result = VerificationResult {
            verified: true,
            status: VerificationStatus::Verified,
            credential_summary: Some(serde_json::json!({"LEI": "5493001KJTIIGC8Y1R12"})),
            checks: VerificationChecks {
                said_validation: true,
                qvi_chain: true,
                registry_check: true,
                timestamp: true,
            },
            errors: vec![],
            kel_state: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: VerificationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status, VerificationStatus::Verified);
        assert!(back.verified);
    }
}
