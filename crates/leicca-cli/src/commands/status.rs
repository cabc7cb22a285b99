//! Status command - check the SPV confirmation depth of an anchored
//! transaction.
//!
//! Usage:
//! ```bash
//! leicca status --txid <txid>
//! ```
//!
//! As with `anchor`, no production chain scanner is vendored into this
//! workspace; this command drives [`MockChainScanner`] directly. Point a
//! real deployment at a live SPV/indexer-backed `ChainScanner` instead.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rand::rngs::OsRng;
use std::sync::Arc;

use ed25519_dalek::SigningKey;
use leicca_anchor::{AnchoringPipeline, MerkleProof, MockChainScanner, MockWallet};

use crate::print_success;

/// Arguments for the status command
#[derive(Args)]
pub struct StatusArgs {
    /// Transaction id to check
    #[arg(long, short = 't')]
    txid: String,

    /// Block height the transaction was mined at (development scanner has
    /// no chain to query; supply this to simulate a confirmed proof)
    #[arg(long)]
    block_height: Option<u32>,

    /// Current chain tip height (development scanner has no chain to query)
    #[arg(long)]
    current_height: Option<u32>,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    println!("{}", "LEICCA Transaction Status".bold().cyan());
    println!("{}", "═".repeat(40).cyan());
    println!();

    let wallet = Arc::new(MockWallet::new(SigningKey::generate(&mut OsRng), [0u8; 32], "1LeiccaStatusOnlyXXXXXXXXXXXXXXXXX"));
    let scanner = Arc::new(MockChainScanner::new());

    if let Some(block_height) = args.block_height {
        scanner
            .seed_merkle_proof(&args.txid, MerkleProof { block_height, merkle_root: String::new(), path: vec![], index: 0 })
            .await;
    }
    scanner.set_height(args.current_height.unwrap_or(0));

    let pipeline = AnchoringPipeline::new(wallet, scanner);
    let status = pipeline.get_transaction_status(&args.txid).await.with_context(|| "transaction status lookup failed")?;

    println!("  {} {}", "Txid:".dimmed(), args.txid);
    println!("  {} {}", "Block height:".dimmed(), status.block_height.map(|h| h.to_string()).unwrap_or_else(|| "<none>".to_string()));
    println!("  {} {}", "Confirmations:".dimmed(), status.confirmations);
    println!();

    if status.confirmed {
        print_success("transaction confirmed (>= 6 confirmations)");
    } else {
        println!("{}", format!("⚠ transaction has {} confirmation(s), not yet final", status.confirmations).yellow().bold());
    }

    Ok(())
}
