//! Verify command - check a vLEI credential against the external verifier.
//!
//! Usage:
//! ```bash
//! leicca verify --credential qvi.cesr
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use leicca_credential::parse;
use leicca_verifier::VerifierClient;

use crate::config::LeiccaConfig;
use crate::{print_error, print_info, print_success};

/// Arguments for the verify command
#[derive(Args)]
pub struct VerifyArgs {
    /// Path to the CESR stream or single-JSON ACDC credential
    #[arg(long, short = 'c', value_name = "FILE")]
    credential: PathBuf,

    /// Skip OOBI resolution and go straight to submitting the presentation
    #[arg(long)]
    skip_oobi: bool,
}

/// Run the verify command
pub async fn run(args: VerifyArgs) -> Result<()> {
    println!("{}", "LEICCA Credential Verification".bold().cyan());
    println!("{}", "═".repeat(40).cyan());
    println!();

    let content = std::fs::read_to_string(&args.credential)
        .with_context(|| format!("failed to read credential file: {}", args.credential.display()))?;

    let parsed = parse(&content).with_context(|| "credential has no extractable ACDC frame")?;

    let said = parsed.said.clone().unwrap_or_else(|| "<unknown>".to_string());
    println!("  {} {}", "SAID:".dimmed(), said);
    println!("  {} {}", "Issuer AID:".dimmed(), parsed.issuer_aid.as_deref().unwrap_or("<none>"));
    println!("  {} {}", "Structural problems:".dimmed(), parsed.structural_problems.len());
    println!();

    if !parsed.saids_valid {
        print_error("SAID self-addressing check failed before submission");
    }

    let config = LeiccaConfig::from_env().with_context(|| "failed to load configuration")?;
    let client = VerifierClient::new(config.vlei_verifier_url.clone(), config.schema_server_url.clone(), config.keria_agent_url.clone());

    if !args.skip_oobi {
        if let Some(schema) = &parsed.schema {
            print_info(&format!("resolving schema OOBI for {schema}"));
            client.resolve_schema_oobi(schema).await.with_context(|| "schema OOBI resolution failed")?;
        }
    }

    let result = client
        .verify_credential(&content, &said)
        .await
        .with_context(|| "verifier round-trip failed")?;

    println!("{}", "Checks:".bold());
    println!("  {} {}", check_glyph(result.said_valid), "SAID valid");
    println!("  {} {}", check_glyph(result.qvi_chain_valid), "QVI chain valid");
    println!("  {} {}", check_glyph(result.registry_checked), "Registry checked");
    println!();

    if result.verified {
        print_success("credential verified");
    } else {
        print_error("credential verification failed");
        for e in &result.errors {
            println!("    {} {}", "-".red(), e);
        }
        std::process::exit(1);
    }

    Ok(())
}

fn check_glyph(ok: bool) -> colored::ColoredString {
    if ok {
        "✓".green()
    } else {
        "✗".red()
    }
}
