//! CapsuleBuilder (§4.4): assemble audit capsules, extract public tags,
//! serialize canonically, and hash evidence.

use chrono::Utc;
use tokio::io::AsyncRead;

use leicca_core::types::{ClassificationResult, EvidenceFile, VerificationResult};
use leicca_core::Hash;

use crate::error::CapsuleError;
use crate::types::{AuditCapsule, CapsuleMetadata, PublicTags, BASKET, CAPSULE_VERSION, PROJECT};

/// Stamps `metadata.timestamp` with the current UTC time and the project /
/// basket constants; copies `verification`/`classification`/`evidence` by
/// reference ownership transfer, no deep-cloning.
pub fn create_audit_capsule(
    verification: Option<VerificationResult>,
    classification: Option<ClassificationResult>,
    evidence: Vec<EvidenceFile>,
    record_id: impl Into<String>,
) -> AuditCapsule {
    AuditCapsule {
        version: CAPSULE_VERSION.to_string(),
        verification,
        classification,
        evidence,
        metadata: CapsuleMetadata {
            timestamp: Utc::now(),
            project: PROJECT.to_string(),
            basket: BASKET.to_string(),
            record_id: record_id.into(),
        },
    }
}

/// Pulls `LEI` and `jurisdiction` out of the verification's open
/// `credential_summary` mapping, if present. Never includes anything from
/// `classification` beyond what's already public (recordId/timestamp).
pub fn extract_public_tags(capsule: &AuditCapsule) -> PublicTags {
    let summary = capsule.verification.as_ref().and_then(|v| v.credential_summary.as_ref());

    let lei = summary
        .and_then(|s| s.get("LEI"))
        .and_then(|v| v.as_str())
        .map(str::to_string);
    let jurisdiction = summary
        .and_then(|s| s.get("jurisdiction"))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    PublicTags {
        tag_type: "LEICCA-Classification".to_string(),
        lei,
        jurisdiction,
        timestamp: capsule.metadata.timestamp,
        record_id: capsule.metadata.record_id.clone(),
    }
}

/// Canonical compact JSON (RFC 8785) — the exact bytes the envelope
/// encrypts. Re-serializing after decryption must yield an equal structural
/// object (round-trip law); JCS is what makes the byte-for-byte half of that
/// law hold.
pub fn serialize_capsule(capsule: &AuditCapsule) -> Result<Vec<u8>, CapsuleError> {
    Ok(serde_jcs::to_vec(capsule)?)
}

/// SHA-256 of in-memory evidence bytes, lowercase hex.
pub fn hash_evidence(bytes: &[u8]) -> String {
    Hash::digest(bytes).to_hex()
}

/// SHA-256 of a streamed evidence file, for evidence too large to buffer
/// whole.
pub async fn hash_evidence_stream<R: AsyncRead + Unpin>(reader: R) -> Result<String, CapsuleError> {
    Ok(Hash::digest_stream(reader).await?.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leicca_core::types::{KelState, VerificationChecks, VerificationStatus};

    fn sample_verification() -> VerificationResult {
        VerificationResult {
            verified: true,
            status: VerificationStatus::Verified,
            credential_summary: Some(serde_json::json!({"LEI": "5493001KJTIIGC8Y1R12", "jurisdiction": "ENW"})),
            checks: VerificationChecks {
                said_validation: true,
                qvi_chain: true,
                registry_check: true,
                timestamp: true,
            },
            errors: vec![],
            kel_state: None::<KelState>,
        }
    }

    #[test]
    fn create_audit_capsule_stamps_project_and_basket_constants() {
        let capsule = create_audit_capsule(None, None, vec![], "rec-1");
        assert_eq!(capsule.version, CAPSULE_VERSION);
        assert_eq!(capsule.metadata.project, PROJECT);
        assert_eq!(capsule.metadata.basket, BASKET);
        assert_eq!(capsule.metadata.record_id, "rec-1");
    }

    #[test]
    fn extract_public_tags_pulls_lei_and_jurisdiction() {
        let capsule = create_audit_capsule(Some(sample_verification()), None, vec![], "rec-1");
        let tags = extract_public_tags(&capsule);
        assert_eq!(tags.tag_type, "LEICCA-Classification");
        assert_eq!(tags.lei.as_deref(), Some("5493001KJTIIGC8Y1R12"));
        assert_eq!(tags.jurisdiction.as_deref(), Some("ENW"));
        assert_eq!(tags.record_id, "rec-1");
    }

    #[test]
    fn extract_public_tags_tolerates_missing_verification() {
        let capsule = create_audit_capsule(None, None, vec![], "rec-2");
        let tags = extract_public_tags(&capsule);
        assert!(tags.lei.is_none());
        assert!(tags.jurisdiction.is_none());
    }

    #[test]
    fn serialize_capsule_is_compact_with_no_whitespace() {
        let capsule = create_audit_capsule(None, None, vec![], "rec-1");
        let bytes = serialize_capsule(&capsule).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains('\n'));
        assert!(!text.contains("  "));
    }

    #[test]
    fn serialize_then_deserialize_round_trips_structurally() {
        let capsule = create_audit_capsule(Some(sample_verification()), None, vec![], "rec-1");
        let bytes = serialize_capsule(&capsule).unwrap();
        let restored: AuditCapsule = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(restored.metadata.record_id, capsule.metadata.record_id);
        assert_eq!(restored.version, capsule.version);
    }

    #[test]
    fn hash_evidence_matches_known_sha256() {
        let hash = hash_evidence(b"hello world");
        assert_eq!(hash, "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde");
    }

    #[tokio::test]
    async fn hash_evidence_stream_matches_hash_evidence() {
        let data = b"streamed capsule evidence".to_vec();
        let streamed = hash_evidence_stream(&data[..]).await.unwrap();
        assert_eq!(streamed, hash_evidence(&data));
    }
}
