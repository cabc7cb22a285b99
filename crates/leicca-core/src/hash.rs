//! SHA-256 hashing over bytes, files and streams (CryptoPrimitives, L1).

use sha2::{Digest, Sha256};
use std::fmt;
use tokio::io::{AsyncRead, AsyncReadExt};

/// A SHA-256 digest (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash arbitrary in-memory bytes.
    pub fn digest(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Hash an async byte stream (evidence files too large to buffer whole).
    pub async fn digest_stream<R: AsyncRead + Unpin>(mut reader: R) -> std::io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Self(hasher.finalize().into()))
    }

    /// Lowercase hex representation, always 64 chars.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a lowercase (or mixed-case) hex string into a 32-byte hash.
    pub fn from_hex(s: &str) -> Result<Self, HexError> {
        let bytes = hex::decode(s).map_err(|_| HexError::InvalidHex)?;
        let arr: [u8; 32] = bytes.try_into().map_err(|_| HexError::WrongLength)?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Errors decoding a hex string into hash/key bytes.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HexError {
    #[error("invalid hex string")]
    InvalidHex,
    #[error("hex string decodes to the wrong byte length")]
    WrongLength,
}

/// Encode bytes as lowercase hex.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode a hex string to bytes.
pub fn from_hex(s: &str) -> Result<Vec<u8>, HexError> {
    hex::decode(s).map_err(|_| HexError::InvalidHex)
}

/// Size in bytes of a Bitcoin-style CompactSize varint encoding `n`.
///
/// `1` for `n < 253`, `3` for `n < 65536`, `5` otherwise (the pipeline never
/// needs the 9-byte u64 form since script/tx sizes fit comfortably in u32).
pub fn varint_size(n: u64) -> usize {
    if n < 253 {
        1
    } else if n < 65536 {
        3
    } else {
        5
    }
}
