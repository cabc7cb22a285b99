//! # LEICCA Verifier
//!
//! Drives the external vLEI verifier's OOBI resolution, Root-of-Trust
//! configuration and presentation/authorization protocol, reconciling its
//! HTTP responses into a uniform [`VerifierResult`].

mod client;
mod detail;
mod error;
mod oobi;
mod types;

pub use client::VerifierClient;
pub use error::VerifierError;
pub use oobi::{controller_oobi_url, schema_oobi_url, OobiCache};
pub use types::VerifierResult;
