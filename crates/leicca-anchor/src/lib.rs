//! # LEICCA Anchor
//!
//! The UTXO anchoring pipeline (§4.6 AnchoringPipeline): wallet sync, input
//! selection, deterministic fee calculation, output/action construction,
//! and SPV-based confirmation polling, sitting on top of the envelope
//! cryptor and capsule builder.

pub mod error;
pub mod fee;
pub mod pipeline;
pub mod scanner;
pub mod wallet;

pub use error::AnchorError;
pub use pipeline::{AnchoringPipeline, AnchoringRecord, TransactionStatus, AUDIT_RECEIVER_PUBLIC_KEY_HEX};
pub use scanner::{ChainScanner, MerkleProof, MockChainScanner, ScannedUtxo};
pub use wallet::{MockWallet, Wallet, WalletOutput};
