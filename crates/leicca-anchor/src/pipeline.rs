//! AnchoringPipeline (§4.6): the critical path from a sealed audit capsule
//! to a broadcast UTXO transaction, plus decryption and SPV status lookup.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use leicca_capsule::{AuditCapsule, PublicTags};
use leicca_envelope::EnvelopeError;

use crate::error::AnchorError;
use crate::fee::{self, P2PKH_LOCKING_SCRIPT_LEN};
use crate::scanner::ChainScanner;
use crate::wallet::{
    ActionInput, ActionOptions, ActionOutput, CreateActionRequest, InsertionRemittance, InternalizeActionRequest,
    InternalizeOutput, Wallet,
};

/// A fixed audit-infrastructure receiver public key, included in every
/// capsule in addition to the wallet's own self-receiver key (§4.5), so the
/// audit org can decrypt capsules without ever touching a wallet private key.
pub const AUDIT_RECEIVER_PUBLIC_KEY_HEX: &str = "f3a1c9de2b7d8e4a6c1f9b0d3e5a7c2f8b4d6e1a9c3f7b5d2e8a4c6f1b9d3e7a";

const SATOSHIS_BASKET: &str = "satoshis";
const AUDIT_BASKET: &str = "leicca-vlei-audit";
const OP_RETURN_SENTINEL_SATOSHIS: u64 = 1;
const UNLOCKING_TEMPLATE: &str = "p2pkh";

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnchoringRecord {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    pub basket: String,
    pub timestamp: chrono::DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    pub raw_ciphertext_hex: String,
    pub errors: Vec<String>,
}

impl AnchoringRecord {
    fn failure(errors: Vec<String>) -> Self {
        Self {
            success: false,
            txid: None,
            basket: AUDIT_BASKET.to_string(),
            timestamp: Utc::now(),
            explorer_url: None,
            raw_ciphertext_hex: String::new(),
            errors,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TransactionStatus {
    pub confirmed: bool,
    pub confirmations: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u32>,
}

/// Holds the initialized wallet and chain scanner references plus the
/// single mutex that serializes the select-input -> create-action critical
/// section per wallet instance (§5).
pub struct AnchoringPipeline {
    wallet: Arc<dyn Wallet>,
    scanner: Arc<dyn ChainScanner>,
    initialized: AtomicBool,
    critical_section: Mutex<()>,
}

impl AnchoringPipeline {
    pub fn new(wallet: Arc<dyn Wallet>, scanner: Arc<dyn ChainScanner>) -> Self {
        Self { wallet, scanner, initialized: AtomicBool::new(false), critical_section: Mutex::new(()) }
    }

    /// Idempotent: a second call is a no-op. `token` is the SDK credential a
    /// production wallet client needs; the mock wallet doesn't use it.
    pub fn initialize(&self, token: &str) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!(token_len = token.len(), "anchoring pipeline initialized");
    }

    pub fn is_ready(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub async fn anchor_audit_capsule(&self, capsule: &AuditCapsule, public_tags: &PublicTags) -> AnchoringRecord {
        if !self.is_ready() {
            return AnchoringRecord::failure(vec![AnchorError::WalletNotInitialized.to_string()]);
        }

        match self.anchor_inner(capsule, public_tags).await {
            Ok(record) => record,
            Err(e) => AnchoringRecord::failure(vec![e.to_string()]),
        }
    }

    async fn anchor_inner(&self, capsule: &AuditCapsule, public_tags: &PublicTags) -> Result<AnchoringRecord, AnchorError> {
        // 1. Key acquisition.
        let signing_key = self.wallet.signing_key().await?;
        let deriving_public = self.wallet.deriving_public_key().await?;
        let audit_public = decode_audit_receiver_key()?;

        // 2. Seal.
        let serialized = leicca_capsule::serialize_capsule(capsule).map_err(|e| {
            tracing::warn!(error = %e, "capsule serialization failed before seal");
            AnchorError::InvalidFormat
        })?;
        let sealed = leicca_envelope::seal(
            &serialized,
            &signing_key,
            &[deriving_public, audit_public],
            format!("{}.json", capsule.metadata.record_id),
            "application/json",
            None,
        )
        .map_err(envelope_error_to_anchor_error)?;
        let raw_ciphertext_hex = hex::encode(&sealed.raw_ciphertext_bytes);

        // 3. Wallet sync.
        let master_address = self.wallet.master_address().await?;
        self.sync_wallet_from_scanner(&master_address).await?;

        // 4-7. Serialize the mutating critical section per wallet instance.
        let _guard = self.critical_section.lock().await;

        let outputs = self.wallet.list_outputs(SATOSHIS_BASKET).await?;
        let mut sorted = outputs;
        sorted.sort_by(|a, b| b.satoshis.cmp(&a.satoshis));
        let chosen = sorted
            .into_iter()
            .next()
            .ok_or_else(|| AnchorError::InsufficientFunds { address: master_address.clone(), need: fee::BASELINE_FEE_SAT, have: 0 })?;

        fee::check_covers_baseline(chosen.satoshis, &master_address)?;

        let op_return_script_len = sealed.op_return_script_hex.len() / 2;
        let output_script_lens = vec![P2PKH_LOCKING_SCRIPT_LEN, op_return_script_len];
        let size = fee::estimate_transaction_size(&[fee::unlock_len(UNLOCKING_TEMPLATE)], &output_script_lens);
        let tx_fee = fee::calculate_fee(size);

        if chosen.satoshis < tx_fee {
            return Err(AnchorError::InsufficientFunds { address: master_address, need: tx_fee, have: chosen.satoshis });
        }
        let change = chosen.satoshis - tx_fee;

        let mut action_outputs = Vec::with_capacity(2);
        if change > 0 {
            action_outputs.push(ActionOutput {
                locking_script_hex: String::new(), // paid to master_address; real wallet resolves this internally
                satoshis: change,
                output_description: "change".to_string(),
                basket: SATOSHIS_BASKET.to_string(),
                tags: vec![],
                custom_instructions: None,
            });
        }
        action_outputs.push(ActionOutput {
            locking_script_hex: sealed.op_return_script_hex.clone(),
            satoshis: OP_RETURN_SENTINEL_SATOSHIS,
            output_description: "audit anchor".to_string(),
            basket: AUDIT_BASKET.to_string(),
            tags: vec![
                "audit-trail".to_string(),
                format!("lei:{}", public_tags.lei.as_deref().unwrap_or("unknown")),
                format!("jurisdiction:{}", public_tags.jurisdiction.as_deref().unwrap_or("unknown")),
                format!("record:{}", public_tags.record_id),
            ],
            custom_instructions: None,
        });

        let (source_txid, source_output_index) = split_outpoint(&chosen.outpoint);
        let request = CreateActionRequest {
            description: "leicca audit anchor".to_string(),
            labels: vec!["leicca-audit".to_string(), "vlei-verification".to_string()],
            inputs: vec![ActionInput {
                outpoint: chosen.outpoint.clone(),
                source_txid,
                source_output_index,
                unlocking_script_hex: String::new(),
                input_description: "spend funding utxo".to_string(),
                sequence_number: Some(0xFFFFFFFF),
            }],
            outputs: action_outputs,
            options: ActionOptions { sign_and_process: true },
        };

        let result = self.wallet.create_action(request).await.map_err(|e| AnchorError::BroadcastFailed(e.to_string()))?;

        Ok(AnchoringRecord {
            success: true,
            txid: Some(result.txid.clone()),
            basket: AUDIT_BASKET.to_string(),
            timestamp: Utc::now(),
            explorer_url: Some(format!("https://whatsonchain.com/tx/{}", result.txid)),
            raw_ciphertext_hex,
            errors: vec![],
        })
    }

    async fn sync_wallet_from_scanner(&self, master_address: &str) -> Result<(), AnchorError> {
        let utxos = self
            .scanner
            .list_address_utxos(master_address, true)
            .await
            .map_err(|e| AnchorError::ChainScannerUnavailable(e.to_string()))?;

        // group by tx_hash so one on-chain tx never produces duplicate action records
        let mut by_tx: std::collections::BTreeMap<String, Vec<_>> = std::collections::BTreeMap::new();
        for utxo in utxos {
            by_tx.entry(utxo.tx_hash.clone()).or_default().push(utxo);
        }
        for (tx_hash, group) in by_tx {
            let outputs = group
                .into_iter()
                .map(|u| InternalizeOutput {
                    output_index: u.tx_pos,
                    protocol: "basket insertion".to_string(),
                    insertion_remittance: InsertionRemittance { basket: SATOSHIS_BASKET.to_string(), tags: vec![] },
                })
                .collect();
            self.wallet
                .internalize_action(InternalizeActionRequest {
                    tx_hex: tx_hash,
                    description: "wallet sync".to_string(),
                    labels: vec!["leicca-sync".to_string()],
                    outputs,
                })
                .await?;
        }
        Ok(())
    }

    pub async fn decrypt_audit_capsule(&self, raw_ciphertext_hex: &str) -> Result<AuditCapsule, AnchorError> {
        if !self.is_ready() {
            return Err(AnchorError::WalletNotInitialized);
        }

        let deriving_private = self.wallet.deriving_private_key().await.map_err(|_| AnchorError::KeyMissing("deriving".to_string()))?;
        let raw_bytes = hex::decode(raw_ciphertext_hex).map_err(|_| AnchorError::InvalidFormat)?;
        let opened = leicca_envelope::open(&raw_bytes, &deriving_private).map_err(|e| match e {
            EnvelopeError::WrongReceiver => AnchorError::DecryptionFailed("no wrapped key for this receiver".to_string()),
            other => AnchorError::DecryptionFailed(other.to_string()),
        })?;
        let text = String::from_utf8(opened.plaintext_bytes).map_err(|_| AnchorError::InvalidFormat)?;
        serde_json::from_str(&text).map_err(|_| AnchorError::InvalidFormat)
    }

    pub async fn get_transaction_status(&self, txid: &str) -> Result<TransactionStatus, AnchorError> {
        let proof = self
            .scanner
            .get_merkle_proof(txid)
            .await
            .map_err(|e| AnchorError::ChainScannerUnavailable(e.to_string()))?
            .ok_or(AnchorError::ProofUnavailable)?;
        let current_height =
            self.scanner.current_height().await.map_err(|e| AnchorError::ChainScannerUnavailable(e.to_string()))?;

        let confirmations = current_height.saturating_sub(proof.block_height).saturating_add(1);
        Ok(TransactionStatus { confirmed: confirmations >= 6, confirmations, block_height: Some(proof.block_height) })
    }
}

fn decode_audit_receiver_key() -> Result<[u8; 32], AnchorError> {
    let bytes = hex::decode(AUDIT_RECEIVER_PUBLIC_KEY_HEX).map_err(|_| AnchorError::KeyMissing("audit".to_string()))?;
    bytes.try_into().map_err(|_| AnchorError::KeyMissing("audit".to_string()))
}

fn envelope_error_to_anchor_error(e: EnvelopeError) -> AnchorError {
    match e {
        EnvelopeError::MissingKey(name) => AnchorError::KeyMissing(name),
        other => AnchorError::BroadcastFailed(other.to_string()),
    }
}

fn split_outpoint(outpoint: &str) -> (String, u32) {
    match outpoint.rsplit_once('.') {
        Some((txid, idx)) => (txid.to_string(), idx.parse().unwrap_or(0)),
        None => (outpoint.to_string(), 0),
    }
}
