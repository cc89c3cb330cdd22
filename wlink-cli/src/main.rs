//! wlink - mnemonic wallets for Solana and Ethereum.
//!
//! Wallets are derived from BIP39 mnemonics and kept in a password-sealed
//! vault on disk. Set `RUST_LOG=debug` to trace RPC calls and send states.

mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use commands::{Cli, Commands, Context};
use tracing_subscriber::EnvFilter;
use wlink::Chain;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_warning(&e) => {
            eprintln!("{} {e}", "warning:".yellow().bold());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = &cli.settings;
    match cli.command {
        Commands::Solana(cmd) => cmd.execute(Chain::Solana, &Context::load(settings)?).await?,
        Commands::Ethereum(cmd) => cmd.execute(Chain::Ethereum, &Context::load(settings)?).await?,
        Commands::Vault(cmd) => cmd.execute(&Context::load(settings)?).await?,
        Commands::Mnemonic(cmd) => cmd.execute()?,
    }
    Ok(())
}

/// Bad input the user can correct; reported without a failing exit code.
fn is_warning(err: &anyhow::Error) -> bool {
    if let Some(e) = err.downcast_ref::<wlink::Error>() {
        return e.is_warning();
    }
    if let Some(e) = err.downcast_ref::<wlink::vault::Error>() {
        return e.is_warning();
    }
    if let Some(e) = err.downcast_ref::<wlink::transfer::Error>() {
        return e.is_warning();
    }
    false
}
