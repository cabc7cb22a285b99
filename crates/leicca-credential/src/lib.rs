//! # LEICCA Credential
//!
//! ACDC/CESR credential parsing (`parser`, `cesr`), the typed credential
//! shape (`acdc`), KEL event/state derivation (`kel`), and the structural
//! and SAID-shape validation rules a parsed credential is checked against
//! (`validation`).
//!
//! ```rust
//! use leicca_credential::parse;
//!
//! let json = r#"{"v":"ACDC10JSON0001a3_","d":"Etop0000000000000000000000000000000000000",
//!   "i":"Eissuer000000000000000000000000000000000000","ri":"Eregistry00000000000000000000000000000",
//!   "s":"Eschema000000000000000000000000000000000000","a":{"d":"Eattr0000000000000000000000000000000000000",
//!   "i":"Eaid00000000000000000000000000000000000000","dt":"2025-01-01T00:00:00Z"},
//!   "e":{"d":"Eend0000000000000000000000000000000000000"},"r":{"d":"Erule000000000000000000000000000000000000"}}"#;
//! let parsed = parse(json).unwrap();
//! assert!(parsed.saids_valid);
//! ```

pub mod acdc;
pub mod cesr;
pub mod error;
pub mod kel;
pub mod parser;
pub mod validation;

pub use acdc::{Acdc, Attributes, Endorsements, RegisteredAddress, Rules};
pub use cesr::{extract_acdcs, extract_kel_state, extract_said_mismatch, classify, AcdcFrame, InputKind};
pub use error::CredentialError;
pub use kel::KelEvent;
pub use parser::{parse, ParsedCredential};
pub use validation::{validate_all_saids, validate_structure};
