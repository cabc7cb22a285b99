//! Structural and SAID-shape validation, kept separate from `parse()`
//! (§4.1 CredentialParser): a credential that fails these checks is still
//! returned by `parse()` so the caller can show what was rejected.

use leicca_core::is_valid_said_shape;

use crate::error::CredentialError;

/// Check presence of every required field path. Optional fields (`a.LEI`,
/// `e.qvi`, `r.usageDisclaimer`, `r.issuanceDisclaimer`) are never checked.
/// Returns one `MissingField(path)` entry per absent field, in field order.
pub fn validate_structure(value: &serde_json::Value) -> Vec<CredentialError> {
    let mut problems = Vec::new();

    let mut require = |path: &str| {
        if resolve_path(value, path).is_none() {
            problems.push(CredentialError::MissingField(path.to_string()));
        }
    };

    require("v");
    require("d");
    require("i");
    require("ri");
    require("s");
    require("a.d");
    require("a.i");
    require("a.dt");
    require("e.d");
    require("r.d");

    problems
}

/// True only if `d`, `a.d`, `e.d` and `r.d` are all present AND each has a
/// valid CESR SAID shape.
pub fn validate_all_saids(value: &serde_json::Value) -> bool {
    ["d", "a.d", "e.d", "r.d"]
        .iter()
        .all(|path| matches!(resolve_path(value, path), Some(s) if is_valid_said_shape(s)))
}

fn resolve_path<'a>(value: &'a serde_json::Value, path: &str) -> Option<&'a str> {
    let mut current = value;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    current.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete() -> serde_json::Value {
        json!({
            "v": "ACDC10JSON0001a3_",
            "d": "Etop0000000000000000000000000000000000000",
            "i": "Eissuer000000000000000000000000000000000000",
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
    }

    #[test]
    fn complete_credential_has_no_structural_problems() {
        assert!(validate_structure(&complete()).is_empty());
    }

    #[test]
    fn missing_lei_is_not_a_structural_problem() {
        // LEI is optional (OOR credentials omit it); absence must not surface.
        assert!(validate_structure(&complete()).is_empty());
    }

    #[test]
    fn missing_attribute_block_field_is_reported() {
        let mut value = complete();
        value["a"].as_object_mut().unwrap().remove("dt");
        let problems = validate_structure(&value);
        assert_eq!(problems, vec![CredentialError::MissingField("a.dt".to_string())]);
    }

    #[test]
    fn missing_top_level_field_is_reported() {
        let mut value = complete();
        value.as_object_mut().unwrap().remove("ri");
        let problems = validate_structure(&value);
        assert_eq!(problems, vec![CredentialError::MissingField("ri".to_string())]);
    }

    #[test]
    fn all_saids_valid_on_complete_credential() {
        assert!(validate_all_saids(&complete()));
    }

    #[test]
    fn invalid_said_shape_fails_validation() {
        let mut value = complete();
        value["d"] = json!("not-a-said");
        assert!(!validate_all_saids(&value));
    }

    #[test]
    fn missing_said_field_fails_validation() {
        let mut value = complete();
        value["e"].as_object_mut().unwrap().remove("d");
        assert!(!validate_all_saids(&value));
    }
}
