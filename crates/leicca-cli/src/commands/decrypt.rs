//! Decrypt command - open a sealed audit capsule given a receiver's
//! deriving private key.
//!
//! Usage:
//! ```bash
//! leicca decrypt --ciphertext capsule.hex --key <hex-private-key>
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use leicca_capsule::AuditCapsule;

use crate::{print_error, print_success};

/// Arguments for the decrypt command
#[derive(Args)]
pub struct DecryptArgs {
    /// Path to a file containing the hex-encoded raw ciphertext
    #[arg(long, short = 'c', value_name = "FILE")]
    ciphertext: PathBuf,

    /// The receiver's deriving private key, as 64 hex chars (32 bytes)
    #[arg(long, short = 'k', env = "DERIVING_PRIVATE_KEY_HEX")]
    key: String,
}

/// Run the decrypt command
pub async fn run(args: DecryptArgs) -> Result<()> {
    println!("{}", "LEICCA Capsule Decryption".bold().cyan());
    println!("{}", "═".repeat(40).cyan());
    println!();

    let raw_hex = std::fs::read_to_string(&args.ciphertext)
        .with_context(|| format!("failed to read ciphertext file: {}", args.ciphertext.display()))?;
    let raw_bytes = hex::decode(raw_hex.trim()).with_context(|| "ciphertext is not valid hex")?;

    let key_bytes = hex::decode(args.key.trim()).with_context(|| "key is not valid hex")?;
    let deriving_private: [u8; 32] = key_bytes.try_into().map_err(|_| anyhow::anyhow!("key must be exactly 32 bytes"))?;

    let opened = match leicca_envelope::open(&raw_bytes, &deriving_private) {
        Ok(opened) => opened,
        Err(e) => {
            print_error(&format!("decryption failed: {e}"));
            std::process::exit(1);
        }
    };

    let text = String::from_utf8(opened.plaintext_bytes).with_context(|| "decrypted plaintext is not valid UTF-8")?;
    let capsule: AuditCapsule = serde_json::from_str(&text).with_context(|| "decrypted plaintext is not a valid AuditCapsule")?;

    print_success("capsule decrypted");
    println!("  {} {}", "Filename:".dimmed(), opened.metadata.filename);
    println!();
    println!("{}", serde_json::to_string_pretty(&capsule)?);

    Ok(())
}
