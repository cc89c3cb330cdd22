//! CLI command definitions and handlers.

mod mnemonic;
mod vault;
mod wallet;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use wlink::transfer::{EthereumProvider, HttpRpcClient, SolanaProvider};
use wlink::vault::{FileStorage, Vault};
use wlink::{Chain, WalletRecord};

pub use mnemonic::MnemonicCommand;
pub use vault::VaultCommand;
pub use wallet::WalletCommand;

use crate::config::Config;

/// wlink - mnemonic wallets for Solana and Ethereum with a sealed local vault.
#[derive(Parser)]
#[command(name = "wlink")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args)]
pub struct Settings {
    /// Config file, created with defaults if missing.
    #[arg(short, long, global = true, env = "WLINK_CONFIG", default_value = "wlink.toml")]
    pub config: PathBuf,

    /// Vault password.
    #[arg(short, long, global = true, env = "WLINK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// RPC API key, overriding the config file.
    #[arg(long, global = true, env = "WLINK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Vault directory, overriding the config file.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Solana wallet operations.
    #[command(name = "sol", alias = "solana")]
    Solana(WalletCommand),

    /// Ethereum wallet operations.
    #[command(name = "eth", alias = "ethereum")]
    Ethereum(WalletCommand),

    /// Backup and restore.
    Vault(VaultCommand),

    /// Mnemonic utilities.
    Mnemonic(MnemonicCommand),
}

/// Resolved settings shared by every command.
pub struct Context {
    pub config: Config,
    password: Option<String>,
}

impl Context {
    /// Load the config file and apply command-line overrides.
    pub fn load(settings: &Settings) -> Result<Self> {
        let mut config = Config::load(&settings.config)?;
        if let Some(key) = &settings.api_key {
            config.rpc.api_key.clone_from(key);
        }
        if let Some(dir) = &settings.data_dir {
            config.data_dir.clone_from(dir);
        }
        Ok(Self {
            config,
            password: settings.password.clone(),
        })
    }

    /// Open the vault under the configured data directory.
    pub async fn open_vault(&self) -> Result<Vault<FileStorage>> {
        let password = self.password()?;
        let vault = Vault::new(FileStorage::open(self.config.data_dir.clone())?, self.config.vault);
        vault.open(password).await?;
        Ok(vault)
    }

    pub fn password(&self) -> Result<&str, wlink::vault::Error> {
        self.password
            .as_deref()
            .filter(|password| !password.is_empty())
            .ok_or(wlink::vault::Error::MissingCredential("password"))
    }

    /// The record at `index` in `chain`'s list.
    pub async fn record(&self, chain: Chain, index: usize) -> Result<WalletRecord> {
        let mut records = self.open_vault().await?.list(chain).await?;
        if index >= records.len() {
            return Err(wlink::vault::Error::NoSuchWallet { chain, index }.into());
        }
        Ok(records.swap_remove(index))
    }

    pub fn solana(&self) -> Result<SolanaProvider<HttpRpcClient>> {
        let config = &self.config;
        let client = HttpRpcClient::new(
            config.endpoint(&config.solana.rpc_url),
            config.request_timeout(),
        )?;
        Ok(SolanaProvider::new(client)
            .with_commitment(config.solana.commitment)
            .with_poll(config.poll()))
    }

    pub fn ethereum(&self) -> Result<EthereumProvider<HttpRpcClient>> {
        let config = &self.config;
        let client = HttpRpcClient::new(
            config.endpoint(&config.ethereum.rpc_url),
            config.request_timeout(),
        )?;
        Ok(EthereumProvider::new(client, config.ethereum.chain_id).with_poll(config.poll()))
    }
}
