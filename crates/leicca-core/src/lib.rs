//! # LEICCA Core
//!
//! Foundational types shared by every other LEICCA crate: SHA-256 hashing
//! (`hash`), CESR identifier shapes (`ids`), and the verification /
//! classification / evidence record types that the verifier, decision
//! engine and capsule builder all need without depending on each other.
//!
//! ## Quick start
//!
//! ```rust
//! use leicca_core::Hash;
//!
//! let h = Hash::digest(b"evidence bytes");
//! assert_eq!(h.to_hex().len(), 64);
//! ```

pub mod hash;
pub mod ids;
pub mod types;

pub use hash::{from_hex, to_hex, varint_size, Hash, HexError};
pub use ids::{extract_issuer_aid, extract_said_field, is_valid_said_shape, Aid, Said, ShapeError};
pub use types::{
    ClassificationResult, DecisionPathEntry, EvidenceFile, KelState, VerificationChecks,
    VerificationResult, VerificationStatus,
};
