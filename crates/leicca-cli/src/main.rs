//! LEICCA CLI - operator tool for vLEI verification, Basel III
//! classification, and audit-capsule anchoring.
//!
//! # Usage
//!
//! ```bash
//! # Verify a vLEI credential against the external verifier
//! leicca verify --credential qvi.cesr
//!
//! # Walk a Basel III decision panel interactively
//! leicca classify --panels panels.json --jurisdiction ENW
//!
//! # Anchor a sealed audit capsule on-chain
//! leicca anchor --capsule capsule.json
//!
//! # Check anchoring confirmation depth
//! leicca status --txid <txid>
//!
//! # Decrypt a previously anchored capsule
//! leicca decrypt --ciphertext capsule.hex
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod config;

use commands::{anchor, classify, decrypt, status, verify};

/// LEICCA - Legal Entity Identification, Classification & Chain Anchoring
///
/// Verifies vLEI credentials, classifies legal entities under Basel III,
/// and anchors the resulting audit capsule on a BSV blockchain.
#[derive(Parser)]
#[command(
    name = "leicca",
    version,
    about = "LEICCA CLI - vLEI Audit-Anchoring Engine",
    long_about = "LEICCA verifies vLEI credentials, classifies legal entities under\n\
                  Basel III decision trees, and anchors the resulting audit capsule\n\
                  on-chain as an encrypted, tamper-evident record."
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify a vLEI credential against the external verifier
    #[command(name = "verify")]
    Verify(verify::VerifyArgs),

    /// Walk a Basel III decision panel to classify a legal entity
    #[command(name = "classify")]
    Classify(classify::ClassifyArgs),

    /// Seal and anchor an audit capsule on-chain
    #[command(name = "anchor")]
    Anchor(anchor::AnchorArgs),

    /// Decrypt a previously anchored audit capsule
    #[command(name = "decrypt")]
    Decrypt(decrypt::DecryptArgs),

    /// Check the confirmation status of an anchoring transaction
    #[command(name = "status")]
    Status(status::StatusArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Verify(args) => verify::run(args).await,
        Commands::Classify(args) => classify::run(args).await,
        Commands::Anchor(args) => anchor::run(args).await,
        Commands::Decrypt(args) => decrypt::run(args).await,
        Commands::Status(args) => status::run(args).await,
    }
}

/// Setup logging based on verbosity level
fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

/// Print a success message with a checkmark
pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print an error message with an X
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("{} {}", "⚠".yellow().bold(), msg);
}

/// Print an info message
pub fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}
