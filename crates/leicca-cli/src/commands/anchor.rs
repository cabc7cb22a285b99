//! Anchor command - seal an audit capsule into a DocV1 envelope and anchor
//! it on-chain via the UTXO pipeline.
//!
//! Usage:
//! ```bash
//! leicca anchor --capsule capsule.json
//! ```
//!
//! No production BSV wallet SDK is vendored into this workspace (spec.md
//! treats the wallet/chain-scanner as external collaborators), so this
//! command drives the pipeline against a freshly-seeded [`MockWallet`] /
//! [`MockChainScanner`] pair. A real deployment swaps these two
//! constructions for a client wired to the operator's wallet and chain
//! indexer; the rest of the pipeline is unaffected.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rand::rngs::OsRng;

use leicca_anchor::{AnchoringPipeline, MockChainScanner, MockWallet, ScannedUtxo, WalletOutput};
use leicca_capsule::{extract_public_tags, AuditCapsule};
use ed25519_dalek::SigningKey;

use crate::config::LeiccaConfig;
use crate::{print_error, print_info, print_success};

const DEV_MASTER_ADDRESS: &str = "1LeiccaMasterAddressXXXXXXXXXXXXXX";
const DEV_FUNDING_SATOSHIS: u64 = 50_000;

/// Arguments for the anchor command
#[derive(Args)]
pub struct AnchorArgs {
    /// Path to the audit capsule JSON to seal and anchor
    #[arg(long, short = 'c', value_name = "FILE")]
    capsule: PathBuf,
}

/// Run the anchor command
pub async fn run(args: AnchorArgs) -> Result<()> {
    println!("{}", "LEICCA Audit Anchoring".bold().cyan());
    println!("{}", "═".repeat(40).cyan());
    println!();

    let content = std::fs::read_to_string(&args.capsule)
        .with_context(|| format!("failed to read capsule file: {}", args.capsule.display()))?;
    let capsule: AuditCapsule = serde_json::from_str(&content).with_context(|| "capsule file is not a valid AuditCapsule")?;
    let public_tags = extract_public_tags(&capsule);

    let config = LeiccaConfig::from_env().with_context(|| "failed to load configuration")?;

    print_info("using a development wallet and chain scanner pending real wallet SDK integration");

    let wallet = Arc::new(MockWallet::new(SigningKey::generate(&mut OsRng), [3u8; 32], DEV_MASTER_ADDRESS));
    wallet
        .seed_outputs(
            "satoshis",
            vec![WalletOutput {
                outpoint: "devfund.0".to_string(),
                satoshis: DEV_FUNDING_SATOSHIS,
                locking_script_hex: String::new(),
                basket: "satoshis".to_string(),
                tags: vec![],
                custom_instructions: None,
            }],
        )
        .await;

    let scanner = Arc::new(MockChainScanner::new());
    scanner
        .seed_utxos(vec![ScannedUtxo { tx_hash: "devfund".to_string(), tx_pos: 0, height: None, satoshis: DEV_FUNDING_SATOSHIS }])
        .await;

    let pipeline = AnchoringPipeline::new(wallet, scanner);
    pipeline.initialize(&config.mintblue_sdk_token);

    let record = pipeline.anchor_audit_capsule(&capsule, &public_tags).await;

    println!("  {} {}", "Record ID:".dimmed(), capsule.metadata.record_id);
    println!("  {} {}", "Basket:".dimmed(), record.basket);
    println!();

    if record.success {
        print_success(&format!("anchored as txid {}", record.txid.as_deref().unwrap_or("<none>")));
        if let Some(url) = &record.explorer_url {
            println!("  {} {}", "Explorer:".dimmed(), url.underline());
        }
        println!("  {} {}", "Ciphertext (hex):".dimmed(), truncate(&record.raw_ciphertext_hex, 64));
    } else {
        print_error("anchoring failed");
        for e in &record.errors {
            println!("    {} {}", "-".red(), e);
        }
        std::process::exit(1);
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max])
    }
}
