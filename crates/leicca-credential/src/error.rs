//! Error kinds for credential parsing and structural validation.
//!
//! These serve two contracts at once: `parse()` returns at most one of
//! these (practically only `InvalidJson`/`NoACDCFrame` — a credential that
//! merely has missing/malformed fields is still returned so the caller can
//! inspect what survived), while `validate_structure()`/`validate_all_saids()`
//! return the full list of problems found.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("input is not valid JSON")]
    InvalidJson,
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("field {0} does not have a valid SAID shape")]
    InvalidSAIDShape(String),
    #[error("no ACDC frame found in CESR stream")]
    NoACDCFrame,
}
