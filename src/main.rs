//! USDT Withdrawal Agent
//!
//! Command-line front end for the custodial withdrawal agent.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────────────────┐
//!                  │                   WITHDRAWAL AGENT                       │
//!                  │                                                          │
//!  withdraw        │  ┌──────────────┐   ┌──────────┐   ┌──────────────────┐  │
//!  ────────────────┼─▶│ precondition │──▶│   fees   │──▶│ transaction      │  │
//!                  │  │ allowance/bal│   │ price/gas│   │ nonce/build/sign │  │
//!                  │  └──────────────┘   └──────────┘   └────────┬─────────┘  │
//!                  │                                            │            │
//!                  │                                            ▼            │
//!  (ok, message)   │  ┌──────────────┐   ┌──────────────┐  ┌──────────┐       │
//!  ◀───────────────┼──│   outcome    │◀──│ confirmation │◀─│broadcast │───────┼──▶ RPC
//!                  │  └──────────────┘   └──────────────┘  └──────────┘       │
//!                  │                                                          │
//!                  │  config · observability · blockchain (client, wallet)    │
//!                  └──────────────────────────────────────────────────────────┘
//! ```

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use usdt_withdrawal_agent::blockchain::{BlockchainClient, Wallet};
use usdt_withdrawal_agent::config::load_config;
use usdt_withdrawal_agent::observability::{logging, metrics};
use usdt_withdrawal_agent::withdrawal::Withdrawer;

#[derive(Parser)]
#[command(name = "withdrawal-agent")]
#[command(about = "Custodial USDT withdrawal agent (transferFrom of approved funds)", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "agent.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull approved tokens from a wallet into the agent address
    Withdraw {
        /// Source wallet that approved the agent
        #[arg(long)]
        from: String,
        /// Amount in whole tokens, e.g. 200 or 12.5
        #[arg(long)]
        amount: Decimal,
    },
    /// Show a wallet's token balance
    Balance { address: String },
    /// Show the allowance a wallet granted to the agent
    Allowance { owner: String },
    /// Check RPC connectivity
    Health,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;
    logging::init(&config.observability)?;

    tracing::info!(
        config = %cli.config.display(),
        rpc_url = %config.chain.rpc_url,
        chain_id = config.chain.chain_id,
        token = %config.token.symbol,
        "withdrawal-agent v0.1.0 starting"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let client = BlockchainClient::from_config(&config).await?;

    if let Commands::Health = cli.command {
        let healthy = client.is_healthy().await;
        println!("{}", if healthy { "RPC healthy" } else { "RPC unreachable" });
        return Ok(healthy);
    }

    let wallet = Wallet::from_env(config.chain.chain_id)?;
    let withdrawer = Withdrawer::new(Arc::new(client), wallet, &config)?;

    match cli.command {
        Commands::Withdraw { from, amount } => {
            let (ok, message) = withdrawer.withdraw(&from, amount).await;
            println!("{}", message);
            Ok(ok)
        }
        Commands::Balance { address } => {
            let balance = withdrawer.token_balance(&address).await?;
            println!("{} {}", balance, withdrawer.symbol());
            Ok(true)
        }
        Commands::Allowance { owner } => {
            let allowance = withdrawer.allowance(&owner).await?;
            println!(
                "{} {} approved to {}",
                allowance,
                withdrawer.symbol(),
                withdrawer.agent_address()
            );
            Ok(true)
        }
        Commands::Health => Ok(true),
    }
}
