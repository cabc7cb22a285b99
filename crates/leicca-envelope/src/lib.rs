pub mod envelope;
pub mod error;
pub mod script;

pub use envelope::{open, seal, EnvelopeMetadata, OpenedEnvelope, SealedEnvelope, ITERATIONS};
pub use error::EnvelopeError;
pub use script::{build_op_return_script, build_op_return_script_hex};
