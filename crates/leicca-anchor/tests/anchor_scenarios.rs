//! End-to-end scenarios for the anchoring pipeline against mock wallet and
//! chain scanner implementations.

use std::sync::Arc;

use leicca_anchor::{AnchoringPipeline, MockChainScanner, MockWallet, ScannedUtxo};
use leicca_capsule::{create_audit_capsule, extract_public_tags};
use rand::rngs::OsRng;

fn new_wallet() -> MockWallet {
    MockWallet::new(ed25519_dalek::SigningKey::generate(&mut OsRng), [3u8; 32], "1LeiccaMasterAddressXXXXXXXXXXXXXX")
}

#[tokio::test]
async fn happy_path_anchor_produces_two_outputs_and_nonempty_ciphertext() {
    let wallet = Arc::new(new_wallet());
    wallet
        .seed_outputs(
            "satoshis",
            vec![leicca_anchor::WalletOutput {
                outpoint: "aa.0".to_string(),
                satoshis: 10_000,
                locking_script_hex: "76a914000000000000000000000000000000000000000088ac".to_string(),
                basket: "satoshis".to_string(),
                tags: vec![],
                custom_instructions: None,
            }],
        )
        .await;

    let scanner = Arc::new(MockChainScanner::new());
    scanner
        .seed_utxos(vec![ScannedUtxo { tx_hash: "aa".to_string(), tx_pos: 0, height: None, satoshis: 10_000 }])
        .await;

    let pipeline = AnchoringPipeline::new(wallet, scanner);
    pipeline.initialize("test-token");

    let capsule = create_audit_capsule(None, None, vec![], "rec-1");
    let tags = extract_public_tags(&capsule);

    let record = pipeline.anchor_audit_capsule(&capsule, &tags).await;

    assert!(record.success, "errors: {:?}", record.errors);
    assert!(record.txid.is_some());
    assert!(!record.raw_ciphertext_hex.is_empty());
    assert!(record.errors.is_empty());
}

#[tokio::test]
async fn insufficient_funds_surfaces_funding_address_in_error() {
    let wallet = Arc::new(new_wallet());
    wallet
        .seed_outputs(
            "satoshis",
            vec![leicca_anchor::WalletOutput {
                outpoint: "aa.0".to_string(),
                satoshis: 100,
                locking_script_hex: String::new(),
                basket: "satoshis".to_string(),
                tags: vec![],
                custom_instructions: None,
            }],
        )
        .await;

    let scanner = Arc::new(MockChainScanner::new());
    scanner.seed_utxos(vec![ScannedUtxo { tx_hash: "aa".to_string(), tx_pos: 0, height: None, satoshis: 100 }]).await;

    let pipeline = AnchoringPipeline::new(wallet, scanner);
    pipeline.initialize("test-token");

    let capsule = create_audit_capsule(None, None, vec![], "rec-2");
    let tags = extract_public_tags(&capsule);

    let record = pipeline.anchor_audit_capsule(&capsule, &tags).await;

    assert!(!record.success);
    assert_eq!(record.errors.len(), 1);
    assert!(record.errors[0].contains("1LeiccaMasterAddressXXXXXXXXXXXXXX"));
}

#[tokio::test]
async fn anchor_before_initialize_fails_fast() {
    let wallet = Arc::new(new_wallet());
    let scanner = Arc::new(MockChainScanner::new());
    let pipeline = AnchoringPipeline::new(wallet, scanner);

    let capsule = create_audit_capsule(None, None, vec![], "rec-3");
    let tags = extract_public_tags(&capsule);

    let record = pipeline.anchor_audit_capsule(&capsule, &tags).await;
    assert!(!record.success);
    assert!(!pipeline.is_ready());
}

#[tokio::test]
async fn seal_then_decrypt_round_trips_the_capsule() {
    let wallet = Arc::new(new_wallet());
    wallet
        .seed_outputs(
            "satoshis",
            vec![leicca_anchor::WalletOutput {
                outpoint: "bb.0".to_string(),
                satoshis: 10_000,
                locking_script_hex: String::new(),
                basket: "satoshis".to_string(),
                tags: vec![],
                custom_instructions: None,
            }],
        )
        .await;
    let scanner = Arc::new(MockChainScanner::new());
    scanner.seed_utxos(vec![ScannedUtxo { tx_hash: "bb".to_string(), tx_pos: 0, height: None, satoshis: 10_000 }]).await;

    let pipeline = AnchoringPipeline::new(wallet, scanner);
    pipeline.initialize("test-token");

    let capsule = create_audit_capsule(None, None, vec![], "rec-4");
    let tags = extract_public_tags(&capsule);
    let record = pipeline.anchor_audit_capsule(&capsule, &tags).await;
    assert!(record.success);

    let decrypted = pipeline.decrypt_audit_capsule(&record.raw_ciphertext_hex).await.unwrap();
    assert_eq!(decrypted.metadata.record_id, "rec-4");
}

#[tokio::test]
async fn initialize_is_idempotent() {
    let wallet = Arc::new(new_wallet());
    let scanner = Arc::new(MockChainScanner::new());
    let pipeline = AnchoringPipeline::new(wallet, scanner);

    pipeline.initialize("first-token");
    assert!(pipeline.is_ready());
    pipeline.initialize("second-token");
    assert!(pipeline.is_ready());
}

#[tokio::test]
async fn transaction_status_confirms_after_six_confirmations() {
    let wallet = Arc::new(new_wallet());
    let scanner = Arc::new(MockChainScanner::new());
    scanner
        .seed_merkle_proof(
            "deadbeef",
            leicca_anchor::MerkleProof { block_height: 800_000, merkle_root: "root".to_string(), path: vec![], index: 0 },
        )
        .await;
    scanner.set_height(800_005);

    let pipeline = AnchoringPipeline::new(wallet, scanner);
    let status = pipeline.get_transaction_status("deadbeef").await.unwrap();
    assert_eq!(status.confirmations, 6);
    assert!(status.confirmed);

    let pipeline2_scanner = Arc::new(MockChainScanner::new());
    pipeline2_scanner
        .seed_merkle_proof(
            "deadbeef2",
            leicca_anchor::MerkleProof { block_height: 800_000, merkle_root: "root".to_string(), path: vec![], index: 0 },
        )
        .await;
    pipeline2_scanner.set_height(800_002);
    let pipeline2 = AnchoringPipeline::new(Arc::new(new_wallet()), pipeline2_scanner);
    let status2 = pipeline2.get_transaction_status("deadbeef2").await.unwrap();
    assert_eq!(status2.confirmations, 3);
    assert!(!status2.confirmed);
}
