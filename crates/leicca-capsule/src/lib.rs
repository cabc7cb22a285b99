//! # LEICCA Capsule
//!
//! Assembles the `AuditCapsule` sealed into every anchored record: the
//! verification result, classification result, evidence hashes and
//! metadata, serialized to the canonical bytes the envelope encrypts.

pub mod builder;
pub mod error;
pub mod types;

pub use builder::{create_audit_capsule, extract_public_tags, hash_evidence, hash_evidence_stream, serialize_capsule};
pub use error::CapsuleError;
pub use types::{AuditCapsule, CapsuleMetadata, PublicTags, BASKET, CAPSULE_VERSION, PROJECT};
