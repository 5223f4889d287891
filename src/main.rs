//! ARC-20 token issuer.
//!
//! Issues one fungible token on Algorand TestNet:
//!
//! ```text
//! ISSUER_MNEMONIC ──▶ derive key ──▶ balance gate ──▶ suggested params
//!                                                          │
//!   arc20_token_info.json ◀── confirm ◀── submit ◀── sign ◀┘
//! ```
//!
//! Exit status is 0 when the token was created and recorded, 1 otherwise.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::Instrument;

use arc20_issuer::blockchain::types::format_units;
use arc20_issuer::config::{load_or_default, IssuerConfig};
use arc20_issuer::issuance::{secret_from_env, IssuanceError, IssuanceRecord, IssuanceWorkflow};
use arc20_issuer::observability::init_logging;

const RULE: &str = "============================================================";

#[derive(Parser)]
#[command(name = "arc20-issuer")]
#[command(about = "Issue an ARC-20 fungible token on Algorand TestNet", long_about = None)]
struct Cli {
    /// Optional TOML file overriding the built-in token and node settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the issuance record
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(output) = cli.output {
        config.issuance.output_path = output.display().to_string();
    }

    init_logging(&config.observability);

    println!("{}", RULE);
    println!(" {} ARC-20 Token Creator", config.token.asset_name);
    println!("{}\n", RULE);

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("issuance", run_id = %run_id);

    match issue(&config).instrument(span).await {
        Ok(record) => {
            print_success(&config, &record);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_failure(&config, &e);
            ExitCode::FAILURE
        }
    }
}

async fn issue(config: &IssuerConfig) -> Result<IssuanceRecord, IssuanceError> {
    let phrase = secret_from_env()?;
    let mut workflow = IssuanceWorkflow::connect(config)?;
    workflow.run(&phrase).await
}

fn print_success(config: &IssuerConfig, record: &IssuanceRecord) {
    println!("\n SUCCESS! ARC-20 Token Created!");
    println!("   Asset ID: {}", record.asset_id);
    println!("   Name: {} ({})", record.asset_name, record.unit_name);
    println!(
        "   Total Supply: {} {}",
        format_units(record.total_supply, record.decimals),
        record.unit_name
    );
    println!("   Creator: {}", record.creator);
    println!("   Transaction ID: {}", record.txid);
    println!(
        "   Explorer: {}{}",
        config.issuance.explorer_asset_url, record.asset_id
    );
    println!("\n Token info saved to: {}", config.issuance.output_path);

    println!("\n{}", RULE);
    println!("Token creation complete!");
    println!("   Use this Asset ID in your smart contract");
    println!("{}", RULE);
}

fn print_failure(config: &IssuerConfig, error: &IssuanceError) {
    eprintln!("\n Error creating token: {}", error);
    if let IssuanceError::InsufficientBalance { required, .. } = error {
        eprintln!(
            "   Need at least {} ALGO for token creation.",
            format_units(*required, 6)
        );
        eprintln!("   Fund your account at: {}", config.issuance.dispenser_url);
    }
}
