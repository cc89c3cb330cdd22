//! Per-chain wallet commands, shared by `wlink sol` and `wlink eth`.

use anyhow::Result;
use clap::{Args, Subcommand};
use colored::Colorize;
use wlink::transfer::{Amount, ChainProvider, Sender};
use wlink::{Chain, Session, WalletRecord};

use super::Context;

/// Wallet operations for one chain.
#[derive(Args)]
pub struct WalletCommand {
    #[command(subcommand)]
    command: WalletSubcommand,
}

#[derive(Subcommand)]
enum WalletSubcommand {
    /// Create a wallet and store it in the vault.
    New {
        /// Display name.
        #[arg(short, long)]
        name: String,

        /// BIP39 mnemonic to derive from; a new one is generated if omitted.
        #[arg(short, long, default_value = "")]
        mnemonic: String,
    },

    /// List stored wallets.
    List,

    /// Remove the wallet at INDEX. Later wallets shift down by one.
    Delete {
        /// Position shown by `list`.
        index: usize,
    },

    /// Show the on-chain balance.
    Balance {
        /// Position shown by `list`.
        index: usize,
    },

    /// Show recent transactions.
    History {
        /// Position shown by `list`.
        index: usize,
    },

    /// Send the native asset.
    Send {
        /// Position shown by `list`.
        index: usize,

        /// Recipient address.
        #[arg(long)]
        to: String,

        /// Amount in SOL or ETH, e.g. 0.25.
        #[arg(long)]
        amount: String,
    },

    /// Sign a text message with the wallet's key.
    Sign {
        /// Position shown by `list`.
        index: usize,

        /// Message to sign.
        #[arg(short, long)]
        message: String,
    },
}

impl WalletCommand {
    /// Execute the command for `chain`.
    pub async fn execute(self, chain: Chain, ctx: &Context) -> Result<()> {
        match self.command {
            WalletSubcommand::New { name, mnemonic } => {
                let mut session = Session::new();
                let index = session.next_index(chain);
                let record = session.generate(chain, &mnemonic, &name)?;
                let count = ctx.open_vault().await?.add(record.clone()).await?;
                print_created(&record, &wlink::path(chain, index), count - 1);
            }
            WalletSubcommand::List => {
                let records = ctx.open_vault().await?.list(chain).await?;
                print_list(chain, &records);
            }
            WalletSubcommand::Delete { index } => {
                let removed = ctx.open_vault().await?.delete(chain, index).await?;
                println!();
                println!("      {}      {}", "Deleted".cyan().bold(), removed.wallet_name());
                println!("      {}      {}", "Address".cyan().bold(), removed.public_key().dimmed());
                println!();
            }
            WalletSubcommand::Balance { index } => {
                let record = ctx.record(chain, index).await?;
                match chain {
                    Chain::Solana => print_balance(&ctx.solana()?, &record).await?,
                    Chain::Ethereum => print_balance(&ctx.ethereum()?, &record).await?,
                }
            }
            WalletSubcommand::History { index } => {
                let record = ctx.record(chain, index).await?;
                match chain {
                    Chain::Solana => print_history(&ctx.solana()?, &record).await?,
                    Chain::Ethereum => print_history(&ctx.ethereum()?, &record).await?,
                }
            }
            WalletSubcommand::Send { index, to, amount } => {
                let record = ctx.record(chain, index).await?;
                match chain {
                    Chain::Solana => send(&ctx.solana()?, &record, &to, &amount).await?,
                    Chain::Ethereum => send(&ctx.ethereum()?, &record, &to, &amount).await?,
                }
            }
            WalletSubcommand::Sign { index, message } => {
                let record = ctx.record(chain, index).await?;
                let signature = sign(&record, message.as_bytes())?;
                println!();
                println!("      {}      {}", "Address".cyan().bold(), record.public_key());
                println!("      {}    {}", "Signature".cyan().bold(), signature.green());
                println!();
            }
        }
        Ok(())
    }
}

/// Detached ed25519 signature in base58, or an EIP-191 `r||s||v` in hex.
fn sign(record: &WalletRecord, message: &[u8]) -> Result<String> {
    match record {
        WalletRecord::Solana(entry) => {
            let keypair = wlink::sol::Keypair::from_hex(&entry.secret_key)?;
            Ok(bs58::encode(keypair.sign_message(message)).into_string())
        }
        WalletRecord::Ethereum(entry) => {
            let signer = wlink::eth::Signer::from_hex(&entry.secret_key)?;
            let rsv = signer.sign_message(message)?.to_rsv();
            Ok(format!("0x{}", hex::encode(rsv)))
        }
    }
}

async fn send<P: ChainProvider>(provider: &P, record: &WalletRecord, to: &str, amount: &str) -> Result<()> {
    let mut sender = Sender::new(provider);
    let result = sender.send(record, to, amount).await;

    let trail: Vec<String> = sender.visited().iter().map(ToString::to_string).collect();
    tracing::info!(states = %trail.join(" -> "), "send finished");

    let receipt = result?;
    println!();
    println!("      {}       {}", "Amount".cyan().bold(), receipt.amount);
    println!("      {}           {}", "To".cyan().bold(), receipt.to);
    println!("      {}  {}", "Transaction".cyan().bold(), receipt.id.green());
    println!("      {}       {}", "Status".cyan().bold(), sender.state());
    println!();
    Ok(())
}

async fn print_balance<P: ChainProvider>(provider: &P, record: &WalletRecord) -> Result<()> {
    let balance = provider.balance(record.public_key()).await?;
    let amount = Amount::new(provider.chain(), balance);
    println!();
    println!("      {}      {}", "Address".cyan().bold(), record.public_key());
    println!("      {}      {}", "Balance".cyan().bold(), amount.to_string().green());
    println!();
    Ok(())
}

async fn print_history<P: ChainProvider>(provider: &P, record: &WalletRecord) -> Result<()> {
    let entries = provider.history(record.public_key()).await?;
    println!();
    if entries.is_empty() {
        println!("      {}", "No transactions".dimmed());
    }
    for entry in &entries {
        let block = entry.block.map_or_else(|| "-".to_string(), |b| b.to_string());
        let status = if entry.failed { "failed".red() } else { "ok".green() };
        println!("      {:>10}  {}  {}", block.dimmed(), status, entry.id);
    }
    println!();
    Ok(())
}

#[rustfmt::skip]
fn print_created(record: &WalletRecord, path: &str, index: usize) {
    println!();
    println!("      {}         {}", "Name".cyan().bold(), record.wallet_name());
    println!("      {}        {}", "Index".cyan().bold(), index);
    println!("      {}     {}", "Mnemonic".cyan().bold(), record.mnemonic());
    println!("      {}         {}", "Path".cyan().bold(), path);
    println!("      {}      {}", "Address".cyan().bold(), record.public_key().green());
    println!();
}

#[rustfmt::skip]
fn print_list(chain: Chain, records: &[WalletRecord]) {
    println!();
    if records.is_empty() {
        println!("      {}", format!("No {chain} wallets").dimmed());
    }
    for (i, record) in records.iter().enumerate() {
        println!("      {}  {:<16}  {}", format!("[{i}]").dimmed(), record.wallet_name(), record.public_key().green());
    }
    println!();
}
