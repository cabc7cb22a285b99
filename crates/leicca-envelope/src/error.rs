//! Typed failure kinds for the EnvelopeCryptor (§4.5).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("missing key: {0}")]
    MissingKey(String),
    #[error("ciphertext is corrupt or does not authenticate")]
    CorruptCiphertext,
    #[error("this receiver's private key does not match any wrapped key in the envelope")]
    WrongReceiver,
    #[error("envelope version mismatch")]
    EnvelopeVersionMismatch,
}
