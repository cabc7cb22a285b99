//! The `Wallet` contract consumed by the AnchoringPipeline, plus an
//! in-memory mock implementation in the shape of
//! `vex_persist::backend::MemoryBackend` — a `RwLock`-guarded map standing
//! in for a real key/UTXO-tracking SDK.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::AnchorError;

/// A spendable output as the wallet reports it (subset of `listOutputs`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletOutput {
    pub outpoint: String,
    pub satoshis: u64,
    pub locking_script_hex: String,
    pub basket: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionInput {
    pub outpoint: String,
    pub source_txid: String,
    pub source_output_index: u32,
    pub unlocking_script_hex: String,
    pub input_description: String,
    pub sequence_number: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutput {
    pub locking_script_hex: String,
    pub satoshis: u64,
    pub output_description: String,
    pub basket: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_instructions: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOptions {
    pub sign_and_process: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActionRequest {
    pub description: String,
    pub labels: Vec<String>,
    pub inputs: Vec<ActionInput>,
    pub outputs: Vec<ActionOutput>,
    pub options: ActionOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActionResult {
    pub txid: String,
    pub tx_hex: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertionRemittance {
    pub basket: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalizeOutput {
    pub output_index: u32,
    pub protocol: String,
    pub insertion_remittance: InsertionRemittance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalizeActionRequest {
    pub tx_hex: String,
    pub description: String,
    pub labels: Vec<String>,
    pub outputs: Vec<InternalizeOutput>,
}

/// The wallet SDK surface the pipeline needs. A production implementation
/// wraps a real BSV wallet/SPV client; `MockWallet` below is the
/// deterministic in-memory stand-in used for development and tests.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// The `signing` private key (Ed25519), used to sign the envelope's
    /// ciphertext and, conceptually, the anchoring transaction.
    async fn signing_key(&self) -> Result<SigningKey, AnchorError>;
    /// The `deriving` public key (X25519), the wallet's self-receiver.
    async fn deriving_public_key(&self) -> Result<[u8; 32], AnchorError>;
    /// The `deriving` private key, for opening capsules sealed to this wallet.
    async fn deriving_private_key(&self) -> Result<[u8; 32], AnchorError>;
    async fn master_address(&self) -> Result<String, AnchorError>;
    async fn get_height(&self) -> Result<u32, AnchorError>;
    async fn list_outputs(&self, basket: &str) -> Result<Vec<WalletOutput>, AnchorError>;
    async fn create_action(&self, request: CreateActionRequest) -> Result<CreateActionResult, AnchorError>;
    async fn internalize_action(&self, request: InternalizeActionRequest) -> Result<(), AnchorError>;
}

/// Deterministic in-memory `Wallet`. Outputs live in a basket-keyed map
/// guarded by a single `RwLock`, mirroring `MemoryBackend`'s one-map-one-lock
/// shape rather than per-basket locks.
pub struct MockWallet {
    signing_key: SigningKey,
    deriving_private: [u8; 32],
    deriving_public: [u8; 32],
    master_address: String,
    height: AtomicU64,
    outputs: RwLock<HashMap<String, Vec<WalletOutput>>>,
    action_seq: AtomicU64,
}

impl MockWallet {
    /// Takes only the `deriving` private key; the public half is derived
    /// from it via X25519 so `seal`'s wrap and `open`'s re-derived receiver
    /// key always agree on the same self-receiver keypair.
    pub fn new(signing_key: SigningKey, deriving_private: [u8; 32], master_address: impl Into<String>) -> Self {
        let deriving_public = x25519_dalek::PublicKey::from(&x25519_dalek::StaticSecret::from(deriving_private));
        Self {
            signing_key,
            deriving_private,
            deriving_public: deriving_public.to_bytes(),
            master_address: master_address.into(),
            height: AtomicU64::new(0),
            outputs: RwLock::new(HashMap::new()),
            action_seq: AtomicU64::new(0),
        }
    }

    /// Seed a basket with outputs, as a chain-scanner sync would.
    pub async fn seed_outputs(&self, basket: &str, outputs: Vec<WalletOutput>) {
        self.outputs.write().await.insert(basket.to_string(), outputs);
    }
}

#[async_trait]
impl Wallet for MockWallet {
    async fn signing_key(&self) -> Result<SigningKey, AnchorError> {
        Ok(self.signing_key.clone())
    }

    async fn deriving_public_key(&self) -> Result<[u8; 32], AnchorError> {
        Ok(self.deriving_public)
    }

    async fn deriving_private_key(&self) -> Result<[u8; 32], AnchorError> {
        Ok(self.deriving_private)
    }

    async fn master_address(&self) -> Result<String, AnchorError> {
        Ok(self.master_address.clone())
    }

    async fn get_height(&self) -> Result<u32, AnchorError> {
        Ok(self.height.load(Ordering::SeqCst) as u32)
    }

    async fn list_outputs(&self, basket: &str) -> Result<Vec<WalletOutput>, AnchorError> {
        Ok(self.outputs.read().await.get(basket).cloned().unwrap_or_default())
    }

    async fn create_action(&self, request: CreateActionRequest) -> Result<CreateActionResult, AnchorError> {
        let seq = self.action_seq.fetch_add(1, Ordering::SeqCst);
        let txid = format!("{:064x}", seq + 1);

        let spent: std::collections::HashSet<&str> = request.inputs.iter().map(|i| i.outpoint.as_str()).collect();
        let mut outputs = self.outputs.write().await;
        for bucket in outputs.values_mut() {
            bucket.retain(|o| !spent.contains(o.outpoint.as_str()));
        }

        for (index, output) in request.outputs.iter().enumerate() {
            let bucket = outputs.entry(output.basket.clone()).or_default();
            bucket.push(WalletOutput {
                outpoint: format!("{txid}.{index}"),
                satoshis: output.satoshis,
                locking_script_hex: output.locking_script_hex.clone(),
                basket: output.basket.clone(),
                tags: output.tags.clone(),
                custom_instructions: output.custom_instructions.clone(),
            });
        }

        tracing::debug!(txid = %txid, inputs = request.inputs.len(), outputs = request.outputs.len(), "mock action created");
        Ok(CreateActionResult { txid, tx_hex: String::new() })
    }

    async fn internalize_action(&self, _request: InternalizeActionRequest) -> Result<(), AnchorError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn wallet() -> MockWallet {
        MockWallet::new(SigningKey::generate(&mut OsRng), [7u8; 32], "1LeiccaMasterAddressXXXXXXXXXXXXXX")
    }

    #[tokio::test]
    async fn seeded_outputs_are_listed_and_consumed_by_create_action() {
        let w = wallet();
        w.seed_outputs(
            "satoshis",
            vec![WalletOutput {
                outpoint: "aa.0".to_string(),
                satoshis: 10_000,
                locking_script_hex: "76a914...88ac".to_string(),
                basket: "satoshis".to_string(),
                tags: vec![],
                custom_instructions: None,
            }],
        )
        .await;

        let outs = w.list_outputs("satoshis").await.unwrap();
        assert_eq!(outs.len(), 1);

        let result = w
            .create_action(CreateActionRequest {
                description: "test".to_string(),
                labels: vec![],
                inputs: vec![ActionInput {
                    outpoint: "aa.0".to_string(),
                    source_txid: "aa".to_string(),
                    source_output_index: 0,
                    unlocking_script_hex: String::new(),
                    input_description: "spend".to_string(),
                    sequence_number: Some(0xFFFFFFFF),
                }],
                outputs: vec![],
                options: ActionOptions { sign_and_process: true },
            })
            .await
            .unwrap();
        assert!(!result.txid.is_empty());

        let remaining = w.list_outputs("satoshis").await.unwrap();
        assert!(remaining.is_empty());
    }

    #[tokio::test]
    async fn deriving_public_key_matches_x25519_of_private() {
        let w = wallet();
        let private = w.deriving_private_key().await.unwrap();
        let public = w.deriving_public_key().await.unwrap();
        let expected = x25519_dalek::PublicKey::from(&x25519_dalek::StaticSecret::from(private));
        assert_eq!(public, expected.to_bytes());
    }
}
