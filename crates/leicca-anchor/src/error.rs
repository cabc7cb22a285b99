//! Typed failure kinds for the AnchoringPipeline (§4.6).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnchorError {
    #[error("anchoring pipeline is not initialized")]
    WalletNotInitialized,
    #[error("insufficient funds at {address}: need {need} sat, have {have} sat")]
    InsufficientFunds { address: String, need: u64, have: u64 },
    #[error("chain scanner unavailable: {0}")]
    ChainScannerUnavailable(String),
    #[error("broadcast failed: {0}")]
    BroadcastFailed(String),
    #[error("SPV proof unavailable for this transaction")]
    ProofUnavailable,
    #[error("key missing: {0}")]
    KeyMissing(String),
    #[error("raw ciphertext is not valid hex or is not a well-formed envelope")]
    InvalidFormat,
    #[error("envelope failed to decrypt: {0}")]
    DecryptionFailed(String),
}
