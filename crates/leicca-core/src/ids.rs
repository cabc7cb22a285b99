//! CESR identifier shapes: Autonomic IDentifiers (AID) and Self-Addressing
//! IDentifiers (SAID).
//!
//! Both render as a string beginning with `E` followed by base64url
//! characters. Strict SAIDs (real vLEI credentials) are exactly 44 chars
//! (`E` + 43); relaxed SAIDs (test fixtures) only need `E` + at least 20.
//! Both shapes MUST be accepted per spec.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static STRICT_SAID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^E[A-Za-z0-9_-]{43}$").unwrap());
static RELAXED_SAID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^E[A-Za-z0-9_-]{20,}$").unwrap());

/// True if `s` matches the strict (44-char) or relaxed (>=21-char) CESR SAID
/// shape. Both must be accepted: strict for production credentials, relaxed
/// for test fixtures.
pub fn is_valid_said_shape(s: &str) -> bool {
    STRICT_SAID.is_match(s) || RELAXED_SAID.is_match(s)
}

/// A validated CESR Self-Addressing Identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Said(String);

/// A validated CESR Autonomic Identifier (same shape as a SAID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Aid(String);

/// Error returned when a string does not have the CESR SAID/AID shape.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid CESR identifier shape: {0:?}")]
pub struct ShapeError(pub String);

macro_rules! cesr_id {
    ($ty:ident) => {
        impl $ty {
            pub fn new(s: impl Into<String>) -> Result<Self, ShapeError> {
                let s = s.into();
                if is_valid_said_shape(&s) {
                    Ok(Self(s))
                } else {
                    Err(ShapeError(s))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ShapeError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> String {
                v.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

cesr_id!(Said);
cesr_id!(Aid);

/// Extract the first `"i":"E..."` AID literal from raw CESR or JSON text.
///
/// Used both by the credential parser (issuer AID extraction) and the
/// verifier client (deciding whether to resolve an issuer OOBI before
/// submitting a presentation).
pub fn extract_issuer_aid(text: &str) -> Option<Aid> {
    static ISSUER_FIELD: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#""i"\s*:\s*"(E[A-Za-z0-9_-]{20,})""#).unwrap());
    let caps = ISSUER_FIELD.captures(text)?;
    Aid::new(caps.get(1)?.as_str()).ok()
}

/// Extract the first `"d":"..."` SAID literal from raw CESR or JSON text.
pub fn extract_said_field(text: &str) -> Option<Said> {
    static SAID_FIELD: Lazy<Regex> =
        Lazy::new(|| Regex::new(r#""d"\s*:\s*"(E[A-Za-z0-9_-]{20,})""#).unwrap());
    let caps = SAID_FIELD.captures(text)?;
    Said::new(caps.get(1)?.as_str()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: &str = "EABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmno12"; // E + 43
    const RELAXED: &str = "Eabcdefghijklmnopqrst"; // E + 20

    #[test]
    fn accepts_both_strict_and_relaxed_shapes() {
        assert!(is_valid_said_shape(STRICT));
        assert_eq!(STRICT.len(), 44);
        assert!(is_valid_said_shape(RELAXED));
        assert_eq!(RELAXED.len(), 21);
    }

    #[test]
    fn rejects_wrong_prefix_or_too_short() {
        assert!(!is_valid_said_shape("Fabcdefghijklmnopqrst"));
        assert!(!is_valid_said_shape("Eabc"));
        assert!(!is_valid_said_shape(""));
    }

    #[test]
    fn said_newtype_roundtrips_through_serde() {
        let said = Said::new(RELAXED).unwrap();
        let json = serde_json::to_string(&said).unwrap();
        let back: Said = serde_json::from_str(&json).unwrap();
        assert_eq!(said, back);
    }

    #[test]
    fn extract_issuer_aid_from_json_fragment() {
        let text = format!(r#"{{"i":"{}","other":"field"}}"#, RELAXED);
        assert_eq!(extract_issuer_aid(&text).unwrap().as_str(), RELAXED);
    }

    #[test]
    fn extract_said_field_takes_first_match() {
        let text = format!(r#"{{"d":"{}","e":{{"d":"{}"}}}}"#, STRICT, RELAXED);
        assert_eq!(extract_said_field(&text).unwrap().as_str(), STRICT);
    }
}
