//! CESR stream framing: locate ACDC/KERI JSON frames inside a stream that
//! interleaves them with non-JSON CESR attachment blocks (§3 CESR Stream,
//! §4.1 CredentialParser).

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::CredentialError;
use crate::kel::KelEvent;
use leicca_core::types::KelState;

const ACDC_MARKER: &str = "{\"v\":\"ACDC10JSON";
const KERI_MARKER: &str = "{\"v\":\"KERI10JSON";

/// One ACDC frame located inside a CESR stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcdcFrame {
    pub json_text: String,
    pub said: String,
}

/// Whether `text` looks like a single JSON-ACDC mapping or a multi-frame
/// CESR stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    JsonAcdc,
    CesrStream,
}

/// Classify raw input text as a single ACDC JSON mapping or a CESR stream.
///
/// A text that parses whole as one JSON value is `JsonAcdc`; anything else
/// that contains an ACDC/KERI frame marker is a `CesrStream`.
pub fn classify(text: &str) -> Option<InputKind> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') && serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Some(InputKind::JsonAcdc);
    }
    if trimmed.contains(ACDC_MARKER) || trimmed.contains(KERI_MARKER) {
        return Some(InputKind::CesrStream);
    }
    None
}

/// Scan `text` starting at the `{` at byte offset `start`, tracking brace
/// depth (ignoring braces inside JSON string literals) until the matching
/// close brace. Returns the balanced slice, including both braces.
fn scan_balanced_json(text: &str, start: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'{') {
        return None;
    }

    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == b'\\' {
                escaped = true;
            } else if c == b'"' {
                in_string = false;
            }
            continue;
        }

        match c {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Find every occurrence of `marker` in `text` and balanced-brace-scan each
/// into a full JSON object slice, in stream order.
fn scan_frames<'a>(text: &'a str, marker: &str) -> Vec<&'a str> {
    let mut frames = Vec::new();
    let mut search_from = 0usize;
    while let Some(rel) = text[search_from..].find(marker) {
        let start = search_from + rel;
        match scan_balanced_json(text, start) {
            Some(frame) => {
                search_from = start + frame.len();
                frames.push(frame);
            }
            None => break,
        }
    }
    frames
}

/// Extract every ACDC frame from a CESR stream, in stream order. The last
/// element is always the target credential for verification — this
/// tie-break is load-bearing (§4.1, testable property 3).
pub fn extract_acdcs(cesr: &str) -> Result<Vec<AcdcFrame>, CredentialError> {
    let frames: Vec<AcdcFrame> = scan_frames(cesr, ACDC_MARKER)
        .into_iter()
        .filter_map(|frame| {
            let value: serde_json::Value = serde_json::from_str(frame).ok()?;
            let said = value.get("d")?.as_str()?.to_string();
            Some(AcdcFrame {
                json_text: frame.to_string(),
                said,
            })
        })
        .collect();

    if frames.is_empty() {
        Err(CredentialError::NoACDCFrame)
    } else {
        Ok(frames)
    }
}

/// Extract the KEL state for `issuer_aid`: the highest-sequence `icp`/`ixn`
/// event authored by that AID (§3 KEL State, testable property 4).
pub fn extract_kel_state(cesr: &str, issuer_aid: &str) -> Option<KelState> {
    scan_frames(cesr, KERI_MARKER)
        .into_iter()
        .filter_map(|frame| serde_json::from_str::<KelEvent>(frame).ok())
        .filter(|evt| evt.is_state_forming() && evt.i == issuer_aid)
        .filter_map(|evt| {
            let seq = evt.sequence_number()?;
            Some((seq, evt))
        })
        .max_by_key(|(seq, _)| *seq)
        .map(|(seq, evt)| KelState {
            issuer_did: evt.i,
            sequence_number: seq,
            last_event_said: evt.d,
            captured_at: Utc::now(),
        })
}

/// Compare the first `"d":"<said>"` literal found in `cesr` against the
/// externally supplied `url_said`; returns a human-readable mismatch
/// message if they differ, `None` if they match or none was found.
pub fn extract_said_mismatch(cesr: &str, url_said: &str) -> Option<String> {
    let found = leicca_core::extract_said_field(cesr)?;
    if found.as_str() == url_said {
        None
    } else {
        Some(format!(
            "SAID mismatch: requested {} but credential declares {}",
            url_said,
            found.as_str()
        ))
    }
}
