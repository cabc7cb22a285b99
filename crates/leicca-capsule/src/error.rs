//! Typed failure kinds for capsule serialization and evidence hashing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapsuleError {
    #[error("capsule serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("evidence stream read failed: {0}")]
    Io(#[from] std::io::Error),
}
