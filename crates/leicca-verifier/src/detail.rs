//! Verifier error-message detail tables (§4.2): translate the raw `msg`/
//! `info` strings the verifier returns into the specific hints and reasons
//! the state machine surfaces.

/// Translate an HTTP 400 `msg` into actionable crypto-failure hints.
pub fn crypto_failure_hints(msg: &str) -> Vec<String> {
    let lower = msg.to_lowercase();

    if lower.contains("said") && lower.contains("mismatch") {
        return vec!["credential data may have been tampered with after signing".to_string()];
    }

    if lower.contains("did not cryptographically verify") {
        return vec![
            "credential data may have been tampered with".to_string(),
            "KEL/TEL attachments may be missing from the submitted CESR".to_string(),
            "issuer signature is from an unknown or unrecognized key".to_string(),
        ];
    }

    if lower.contains("invalid content type") {
        return vec!["submit the credential as CESR, not plain JSON".to_string()];
    }

    vec![msg.to_string()]
}

/// Translate an HTTP 401 `info:` clause into the specific policy-rejection
/// reasons the spec names.
pub fn unauthorized_reasons(info: &str) -> Vec<String> {
    const KNOWN: &[&str] = &[
        "QVI AID must be delegated",
        "ECR chain validation failed",
        "ECR_AUTH chain validation failed",
        "LE chain validation failed",
        "unknown issuer",
    ];

    let mut reasons: Vec<String> = KNOWN
        .iter()
        .filter(|needle| info.contains(*needle))
        .map(|s| s.to_string())
        .collect();

    if let Some(idx) = info.find("LEI") {
        if info[idx..].contains("not allowed") {
            reasons.push(format!("{} not allowed", &info[idx..].split(';').next().unwrap_or("LEI").trim()));
        }
    }

    if reasons.is_empty() {
        reasons.push(info.to_string());
    }

    reasons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn said_mismatch_hint() {
        let hints = crypto_failure_hints("SAID mismatch detected in payload");
        assert_eq!(hints, vec!["credential data may have been tampered with after signing"]);
    }

    #[test]
    fn crypto_verify_failure_splits_into_three_hints() {
        let hints = crypto_failure_hints("credential did not cryptographically verify");
        assert_eq!(hints.len(), 3);
    }

    #[test]
    fn invalid_content_type_hint() {
        let hints = crypto_failure_hints("invalid content type for this endpoint");
        assert_eq!(hints, vec!["submit the credential as CESR, not plain JSON"]);
    }

    #[test]
    fn unknown_message_is_passed_through() {
        let hints = crypto_failure_hints("some unrelated server error");
        assert_eq!(hints, vec!["some unrelated server error"]);
    }

    #[test]
    fn unauthorized_known_reason_is_extracted() {
        let reasons = unauthorized_reasons("info: ECR chain validation failed for this credential");
        assert_eq!(reasons, vec!["ECR chain validation failed"]);
    }

    #[test]
    fn unauthorized_lei_not_allowed() {
        let reasons = unauthorized_reasons("LEI 5493001KJTIIGC8Y1R12 not allowed; jurisdiction blocked");
        assert!(reasons.iter().any(|r| r.contains("not allowed")));
    }

    #[test]
    fn unauthorized_unknown_falls_back_to_raw_info() {
        let reasons = unauthorized_reasons("completely unfamiliar rejection text");
        assert_eq!(reasons, vec!["completely unfamiliar rejection text"]);
    }
}
