//! Typed failure kinds for every VerifierClient operation (§4.2).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("verifier service unreachable: {0}")]
    Unreachable(String),
    #[error("verifier call timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("SAID mismatch: {0}")]
    SaidMismatch(String),
    #[error("cryptographic verification failed: {0}")]
    CryptoFailure(String),
    #[error("unauthorized: {0:?}")]
    Unauthorized(Vec<String>),
    #[error("verifier is busy")]
    Busy,
    #[error("unexpected verifier response: {0}")]
    Unknown(String),
}
