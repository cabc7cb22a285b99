//! Entry point for the CredentialParser (§4.1): a lenient `parse()` that
//! only fails when the input has no extractable credential at all, plus the
//! `ParsedCredential` record showing what did and did not survive.

use serde::{Deserialize, Serialize};

use crate::acdc::{Attributes, Endorsements, Rules};
use crate::cesr::{self, InputKind};
use crate::error::CredentialError;
use crate::validation::{validate_all_saids, validate_structure};
use leicca_core::types::KelState;

/// A parsed credential, populated as far as the input allowed.
///
/// `parse()` never rejects a credential merely for missing fields or
/// malformed SAIDs — those are reported via `structural_problems` and
/// `saids_valid` so the caller can display exactly what was rejected and
/// why, rather than losing the rest of the extractable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedCredential {
    pub raw: serde_json::Value,
    pub said: Option<String>,
    pub issuer_aid: Option<String>,
    pub registry: Option<String>,
    pub schema: Option<String>,
    pub attributes: Option<Attributes>,
    pub endorsements: Option<Endorsements>,
    pub rules: Option<Rules>,
    pub kel_state: Option<KelState>,
    pub structural_problems: Vec<CredentialError>,
    pub saids_valid: bool,
}

/// Parse `input`, accepting either a single JSON-ACDC mapping or a CESR
/// stream carrying one or more ACDC frames (the last frame is the target
/// credential). Fails only with `InvalidJson` (no JSON, no CESR frames) or
/// `NoACDCFrame` (recognized as CESR but no ACDC frame was found in it).
pub fn parse(input: &str) -> Result<ParsedCredential, CredentialError> {
    let target = match cesr::classify(input) {
        Some(InputKind::JsonAcdc) => {
            serde_json::from_str::<serde_json::Value>(input.trim()).map_err(|_| CredentialError::InvalidJson)?
        }
        Some(InputKind::CesrStream) => {
            let frames = cesr::extract_acdcs(input)?;
            let last = frames.last().expect("extract_acdcs never returns an empty Vec on Ok");
            serde_json::from_str::<serde_json::Value>(&last.json_text).map_err(|_| CredentialError::InvalidJson)?
        }
        None => return Err(CredentialError::InvalidJson),
    };

    let said = field_str(&target, "d");
    let issuer_aid = field_str(&target, "i");
    let registry = field_str(&target, "ri");
    let schema = field_str(&target, "s");

    let attributes = target.get("a").and_then(|v| serde_json::from_value(v.clone()).ok());
    let endorsements = target.get("e").and_then(|v| serde_json::from_value(v.clone()).ok());
    let rules = target.get("r").and_then(|v| serde_json::from_value(v.clone()).ok());

    let kel_state = issuer_aid
        .as_deref()
        .and_then(|aid| cesr::extract_kel_state(input, aid));

    let structural_problems = validate_structure(&target);
    let saids_valid = validate_all_saids(&target);

    if !structural_problems.is_empty() || !saids_valid {
        tracing::warn!(
            said = said.as_deref().unwrap_or("<none>"),
            problems = structural_problems.len(),
            saids_valid,
            "credential parsed with structural or SAID problems"
        );
    } else {
        tracing::debug!(said = said.as_deref().unwrap_or("<none>"), "credential parsed cleanly");
    }

    Ok(ParsedCredential {
        raw: target,
        said,
        issuer_aid,
        registry,
        schema,
        attributes,
        endorsements,
        rules,
        kel_state,
        structural_problems,
        saids_valid,
    })
}

fn field_str(value: &serde_json::Value, field: &str) -> Option<String> {
    value.get(field)?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_acdc_json() -> String {
        serde_json::json!({
            "v": "ACDC10JSON0001a3_",
            "d": "Etop0000000000000000000000000000000000000",
            "i": "Eissuer000000000000000000000000000000000000",
            "ri": "Eregistry00000000000000000000000000000000",
            "s": "Eschema000000000000000000000000000000000000",
            "a": {
                "d": "Eattr0000000000000000000000000000000000000",
                "i": "Eaid00000000000000000000000000000000000000",
                "dt": "2025-01-01T00:00:00Z",
                "LEI": "5493001KJTIIGC8Y1R12",
            },
            "e": { "d": "Eend0000000000000000000000000000000000000" },
            "r": { "d": "Erule000000000000000000000000000000000000" },
        })
        .to_string()
    }

    #[test]
    fn parses_single_json_acdc() {
        let parsed = parse(&valid_acdc_json()).unwrap();
        assert_eq!(parsed.said.as_deref(), Some("Etop0000000000000000000000000000000000000"));
        assert!(parsed.structural_problems.is_empty());
        assert!(parsed.saids_valid);
        assert_eq!(parsed.attributes.unwrap().lei.as_deref(), Some("5493001KJTIIGC8Y1R12"));
    }

    #[test]
    fn incomplete_credential_is_still_returned() {
        let mut value: serde_json::Value = serde_json::from_str(&valid_acdc_json()).unwrap();
        value["r"].as_object_mut().unwrap().remove("d");
        let parsed = parse(&value.to_string()).unwrap();
        assert!(!parsed.structural_problems.is_empty());
        assert!(!parsed.saids_valid);
        // the rest of the credential is still populated
        assert!(parsed.said.is_some());
        assert!(parsed.attributes.is_some());
    }

    #[test]
    fn garbage_input_is_invalid_json() {
        let err = parse("not json, not cesr, just text").unwrap_err();
        assert_eq!(err, CredentialError::InvalidJson);
    }

    #[test]
    fn cesr_stream_picks_last_frame_as_target() {
        let second = serde_json::json!({
            "v": "ACDC10JSON0001a3_",
            "d": "Esecond00000000000000000000000000000000000",
            "i": "Eissuer2000000000000000000000000000000000000",
            "ri": "Eregistry00000000000000000000000000000000",
            "s": "Eschema000000000000000000000000000000000000",
            "a": {
                "d": "Eattr0000000000000000000000000000000000000",
                "i": "Eaid00000000000000000000000000000000000000",
                "dt": "2025-01-01T00:00:00Z",
            },
            "e": { "d": "Eend0000000000000000000000000000000000000" },
            "r": { "d": "Erule000000000000000000000000000000000000" },
        })
        .to_string();
        let stream = format!("{}{}{}", valid_acdc_json(), "}-IABsomeattachmentbytes", second);
        let parsed = parse(&stream).unwrap();
        assert_eq!(parsed.said.as_deref(), Some("Esecond00000000000000000000000000000000000"));
    }
}
