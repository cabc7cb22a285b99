//! The `ChainScanner` contract (external, SPV-capable) and a deterministic
//! mock used for development and tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AnchorError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannedUtxo {
    pub tx_hash: String,
    pub tx_pos: u32,
    pub height: Option<u32>,
    pub satoshis: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MerkleProof {
    pub block_height: u32,
    pub merkle_root: String,
    pub path: Vec<String>,
    pub index: u32,
}

#[async_trait]
pub trait ChainScanner: Send + Sync {
    async fn list_address_utxos(&self, address: &str, include_unconfirmed: bool) -> Result<Vec<ScannedUtxo>, AnchorError>;
    async fn get_transaction_hex(&self, tx_hash: &str) -> Result<Option<String>, AnchorError>;
    async fn get_merkle_proof(&self, txid: &str) -> Result<Option<MerkleProof>, AnchorError>;
    async fn current_height(&self) -> Result<u32, AnchorError>;
}

/// Fixed, address-independent mock: returns whatever UTXO set and proof it
/// was seeded with, standing in for a real Electrum-style SPV scanner.
pub struct MockChainScanner {
    utxos: tokio::sync::RwLock<Vec<ScannedUtxo>>,
    proofs: tokio::sync::RwLock<std::collections::HashMap<String, MerkleProof>>,
    height: std::sync::atomic::AtomicU32,
}

impl Default for MockChainScanner {
    fn default() -> Self {
        Self {
            utxos: tokio::sync::RwLock::new(Vec::new()),
            proofs: tokio::sync::RwLock::new(std::collections::HashMap::new()),
            height: std::sync::atomic::AtomicU32::new(0),
        }
    }
}

impl MockChainScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_utxos(&self, utxos: Vec<ScannedUtxo>) {
        *self.utxos.write().await = utxos;
    }

    pub async fn seed_merkle_proof(&self, txid: impl Into<String>, proof: MerkleProof) {
        self.proofs.write().await.insert(txid.into(), proof);
    }

    pub fn set_height(&self, height: u32) {
        self.height.store(height, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainScanner for MockChainScanner {
    async fn list_address_utxos(&self, _address: &str, _include_unconfirmed: bool) -> Result<Vec<ScannedUtxo>, AnchorError> {
        Ok(self.utxos.read().await.clone())
    }

    async fn get_transaction_hex(&self, _tx_hash: &str) -> Result<Option<String>, AnchorError> {
        Ok(None)
    }

    async fn get_merkle_proof(&self, txid: &str) -> Result<Option<MerkleProof>, AnchorError> {
        Ok(self.proofs.read().await.get(txid).cloned())
    }

    async fn current_height(&self) -> Result<u32, AnchorError> {
        Ok(self.height.load(std::sync::atomic::Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_utxos_round_trip() {
        let scanner = MockChainScanner::new();
        scanner
            .seed_utxos(vec![ScannedUtxo {
                tx_hash: "aa".to_string(),
                tx_pos: 0,
                height: Some(100),
                satoshis: 10_000,
            }])
            .await;

        let utxos = scanner.list_address_utxos("addr", true).await.unwrap();
        assert_eq!(utxos.len(), 1);
        assert_eq!(utxos[0].satoshis, 10_000);
    }

    #[tokio::test]
    async fn merkle_proof_lookup_by_txid() {
        let scanner = MockChainScanner::new();
        scanner
            .seed_merkle_proof(
                "deadbeef",
                MerkleProof { block_height: 800_000, merkle_root: "root".to_string(), path: vec![], index: 0 },
            )
            .await;
        scanner.set_height(800_005);

        assert!(scanner.get_merkle_proof("deadbeef").await.unwrap().is_some());
        assert!(scanner.get_merkle_proof("missing").await.unwrap().is_none());
        assert_eq!(scanner.current_height().await.unwrap(), 800_005);
    }
}
